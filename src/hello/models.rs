use serde::Serialize;
use serde_json::Value;

/// `data` of every `/api/hello` response
#[derive(Debug, Serialize)]
pub struct HelloPayload {
    /// The submitted body, present on POST only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo: Option<Value>,
    pub timestamp: String,
    pub method: &'static str,
}
