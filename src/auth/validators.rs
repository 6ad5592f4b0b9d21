use super::models::{AuthAction, SessionRequest};
use crate::common::ApiError;
use crate::services::Credentials;

pub const MISSING_FIELDS_MESSAGE: &str = "Email, password, and action are required";
pub const INVALID_ACTION_MESSAGE: &str = r#"Invalid action. Use "signin" or "signup""#;

/// Checks a create-session request and splits it into credentials and action.
///
/// Missing fields are reported before an unknown action.
pub fn validate_session_request(
    request: SessionRequest,
) -> Result<(Credentials, AuthAction), ApiError> {
    let (Some(email), Some(password), Some(action)) =
        (request.email, request.password, request.action)
    else {
        return Err(ApiError::BadRequest(MISSING_FIELDS_MESSAGE.to_string()));
    };

    let action = action
        .parse::<AuthAction>()
        .map_err(|_| ApiError::BadRequest(INVALID_ACTION_MESSAGE.to_string()))?;

    Ok((Credentials { email, password }, action))
}
