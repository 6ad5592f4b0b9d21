//! Authentication request/response models

use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;

use crate::common::validation::string_field;

/// Which provider operation a create-session request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    SignIn,
    SignUp,
}

impl FromStr for AuthAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signin" => Ok(AuthAction::SignIn),
            "signup" => Ok(AuthAction::SignUp),
            _ => Err(()),
        }
    }
}

impl AuthAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthAction::SignIn => "signin",
            AuthAction::SignUp => "signup",
        }
    }

    /// Confirmation message for a successful request
    pub fn success_message(&self) -> &'static str {
        match self {
            AuthAction::SignIn => "User signed in successfully",
            AuthAction::SignUp => "User signed up successfully",
        }
    }
}

/// Body of `POST /api/auth`
///
/// Fields are read leniently from arbitrary JSON: a missing, blank or
/// non-string value is `None`.
#[derive(Debug, Default)]
pub struct SessionRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub action: Option<String>,
}

impl SessionRequest {
    pub fn from_json(body: &Value) -> Self {
        let field = |key: &str| string_field(body, key).map(str::to_string);
        Self {
            email: field("email"),
            password: field("password"),
            action: field("action"),
        }
    }
}

/// `data` of a successful create-session response
#[derive(Debug, Serialize)]
pub struct SessionPayload {
    pub user: Value,
    pub session: Option<Value>,
}
