use std::collections::HashMap;

use crate::error::ApiError;

/// Organization names are human-chosen; only length is constrained.
pub fn validate_organization_name(name: &str) -> Result<(), String> {
    if name.chars().count() < 3 {
        return Err("Organization name must be at least 3 characters".to_string());
    }
    if name.chars().count() > 100 {
        return Err("Organization name must be at most 100 characters".to_string());
    }
    Ok(())
}

/// Basic email shape check
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    if !email.contains('@') || !email.contains('.') {
        return Err("Invalid email format".to_string());
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters".to_string());
    }
    Ok(())
}

/// Wrap a single-field failure in the standard validation error body.
pub fn reject(field: &str, message: String) -> ApiError {
    let mut field_errors = HashMap::new();
    field_errors.insert(field.to_string(), message.clone());
    ApiError::validation_error(message, Some(field_errors))
}
