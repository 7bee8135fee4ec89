//! Input validation for user payloads.

use crate::error::AppError;
use crate::model::{CreateUser, UpdateUser};

/// Column width of `name` and `email`.
pub const MAX_TEXT_LEN: usize = 255;

pub struct RequestValidator;

impl RequestValidator {
    /// All required fields must be present and fit their columns.
    pub fn validate_create(input: &CreateUser) -> Result<(), AppError> {
        validate_name(&input.name)?;
        validate_email(&input.email)?;
        Ok(())
    }

    /// Only the supplied fields are checked.
    pub fn validate_update(patch: &UpdateUser) -> Result<(), AppError> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(email) = &patch.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    check_length("name", name)
}

fn validate_email(email: &str) -> Result<(), AppError> {
    if email.trim().is_empty() {
        return Err(AppError::Validation("email is required".into()));
    }
    check_length("email", email)
}

fn check_length(field: &str, value: &str) -> Result<(), AppError> {
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, MAX_TEXT_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn create(name: &str, email: &str) -> CreateUser {
        CreateUser { name: name.into(), email: email.into(), age: None }
    }

    #[test]
    fn accepts_well_formed_input() {
        assert!(RequestValidator::validate_create(&create("John Doe", "john@example.com")).is_ok());
    }

    #[rstest]
    #[case("admin@localhost")]
    #[case("john")]
    fn email_is_free_text(#[case] email: &str) {
        assert!(RequestValidator::validate_create(&create("Admin", email)).is_ok());
    }

    #[rstest]
    #[case("", "john@example.com", "name is required")]
    #[case("   ", "john@example.com", "name is required")]
    #[case("John", "", "email is required")]
    #[case("John", "  ", "email is required")]
    fn rejects_bad_create(#[case] name: &str, #[case] email: &str, #[case] message: &str) {
        let err = RequestValidator::validate_create(&create(name, email)).unwrap_err();
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn rejects_overlong_name() {
        let long = "x".repeat(MAX_TEXT_LEN + 1);
        let err = RequestValidator::validate_create(&create(&long, "a@b.co")).unwrap_err();
        assert_eq!(err.to_string(), "name must be at most 255 characters");
    }

    #[test]
    fn rejects_overlong_email() {
        let long = format!("{}@example.com", "x".repeat(MAX_TEXT_LEN));
        let err = RequestValidator::validate_create(&create("John", &long)).unwrap_err();
        assert_eq!(err.to_string(), "email must be at most 255 characters");
    }

    #[test]
    fn update_checks_only_supplied_fields() {
        assert!(RequestValidator::validate_update(&UpdateUser::default()).is_ok());
        let patch = UpdateUser { email: Some("".into()), ..Default::default() };
        assert!(RequestValidator::validate_update(&patch).is_err());
        let patch = UpdateUser { name: Some(" ".into()), ..Default::default() };
        assert!(RequestValidator::validate_update(&patch).is_err());
    }
}
