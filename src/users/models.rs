//! User data models

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::common::validation::string_field;

/// User as returned by `/api/users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Profile row of the SQL store
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub website: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Profile> for User {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            full_name: profile.full_name,
            created_at: Some(profile.created_at),
        }
    }
}

/// Body of `POST /api/users`, read leniently from arbitrary JSON
#[derive(Debug, Default)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl CreateUserRequest {
    pub fn from_json(body: &Value) -> Self {
        Self {
            email: string_field(body, "email").map(str::to_string),
            full_name: string_field(body, "fullName").map(str::to_string),
        }
    }
}

/// Validated input for `UserStore::create_user`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
}
