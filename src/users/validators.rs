use super::models::{CreateUserRequest, NewUser};
use crate::common::{ApiError, ValidationResult, Validator};

impl Validator for CreateUserRequest {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.email.is_none() {
            result.add_error("email", "is required");
        }

        if self.full_name.is_none() {
            result.add_error("fullName", "is required");
        }

        result
    }
}

/// "email is required", "fullName is required" or "email and fullName are required"
pub fn missing_fields_message(result: &ValidationResult) -> String {
    let fields = result.fields();
    let verb = if fields.len() > 1 { "are" } else { "is" };
    format!("{} {} required", fields.join(" and "), verb)
}

/// Turn a create-user request into a `NewUser`, naming every missing field
pub fn validate_create_user(request: CreateUserRequest) -> Result<NewUser, ApiError> {
    let result = request.validate();
    match (request.email, request.full_name) {
        (Some(email), Some(full_name)) if result.is_valid => Ok(NewUser { email, full_name }),
        _ => Err(ApiError::BadRequest(missing_fields_message(&result))),
    }
}
