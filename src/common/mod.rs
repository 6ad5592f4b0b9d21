// Common module - shared types and utilities across all modules

pub mod config;
pub mod envelope;
pub mod error;
pub mod extractors;
pub mod fallback;
pub mod helpers;
pub mod id_generator;
pub mod migrations;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use envelope::ApiResponse;
pub use error::ApiError;
pub use extractors::{JsonBody, JsonBodyRejection};
pub use helpers::{now_rfc3339, safe_email_log};
pub use id_generator::{generate_time_id, generate_user_id};
pub use state::AppState;
pub use validation::{ValidationResult, Validator};
