//! Field validation rules for account-creation forms.
//!
//! Rules are fixed per identifier variant. Failures accumulate into an
//! ordered list, one message per field, so a form can report everything
//! wrong with a submission in a single round trip.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

use crate::account::IdentifierField;
use crate::error::FieldError;

pub(crate) const USERNAME_MIN_LENGTH: usize = 4;
pub(crate) const USERNAME_MAX_LENGTH: usize = 20;
pub(crate) const EMAIL_MAX_LENGTH: usize = 120;

/// Normalize an identifier before validation and lookup.
///
/// Emails are lowercased so lookups and uniqueness checks are
/// case-insensitive; usernames keep their case.
pub(crate) fn normalize_identifier(field: IdentifierField, value: &str) -> String {
    let trimmed = value.trim();
    match field {
        IdentifierField::Email => trimmed.to_lowercase(),
        IdentifierField::Username => trimmed.to_string(),
    }
}

/// Basic email format check on already-normalized input.
pub(crate) fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

/// Run the signup form rules, returning failures in form order:
/// identifier, password, password confirmation.
pub(crate) fn validate_signup(
    field: IdentifierField,
    identifier: &str,
    password: &SecretString,
    password_confirmation: &SecretString,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(message) = identifier_error(field, identifier) {
        errors.push(FieldError {
            field: field.as_str(),
            message,
        });
    }

    let password_value = password.expose_secret();
    if password_value.is_empty() {
        errors.push(FieldError {
            field: "password",
            message: "The password field is required.".to_string(),
        });
    } else if password_value != password_confirmation.expose_secret() {
        errors.push(FieldError {
            field: "password",
            message: "The password field does not match the password confirmation field."
                .to_string(),
        });
    }

    if password_confirmation.expose_secret().is_empty() {
        errors.push(FieldError {
            field: "passwordconf",
            message: "The password confirmation field is required.".to_string(),
        });
    }

    errors
}

/// First failing rule for the identifier, if any.
fn identifier_error(field: IdentifierField, value: &str) -> Option<String> {
    match field {
        IdentifierField::Username => {
            let length = value.chars().count();
            if value.is_empty() {
                Some("The username field is required.".to_string())
            } else if length < USERNAME_MIN_LENGTH {
                Some(format!(
                    "The username field must be at least {USERNAME_MIN_LENGTH} characters in length."
                ))
            } else if length > USERNAME_MAX_LENGTH {
                Some(format!(
                    "The username field cannot exceed {USERNAME_MAX_LENGTH} characters in length."
                ))
            } else {
                None
            }
        }
        IdentifierField::Email => {
            if value.is_empty() {
                Some("The email field is required.".to_string())
            } else if value.chars().count() > EMAIL_MAX_LENGTH {
                Some(format!(
                    "The email field cannot exceed {EMAIL_MAX_LENGTH} characters in length."
                ))
            } else if !valid_email(value) {
                Some("The email field must contain a valid email address.".to_string())
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn email_normalization_trims_and_lowercases() {
        assert_eq!(
            normalize_identifier(IdentifierField::Email, "  A@X.Com "),
            "a@x.com"
        );
        assert_eq!(
            normalize_identifier(IdentifierField::Username, " Alice "),
            "Alice"
        );
    }

    #[test]
    fn email_format_check() {
        assert!(valid_email("a@x.com"));
        assert!(valid_email("first.last@sub.example.org"));
        assert!(!valid_email("a@x"));
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("two@@x.com"));
        assert!(!valid_email("spaced user@x.com"));
    }

    #[test]
    fn short_username_gets_a_min_length_error() {
        let errors = validate_signup(
            IdentifierField::Username,
            "ab",
            &secret("secret1"),
            &secret("secret1"),
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "username");
        assert!(errors[0].message.contains("at least 4"));
    }

    #[test]
    fn four_character_username_passes_length_rules() {
        let errors = validate_signup(
            IdentifierField::Username,
            "abcd",
            &secret("secret1"),
            &secret("secret1"),
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn username_over_twenty_characters_is_rejected() {
        let errors = validate_signup(
            IdentifierField::Username,
            "abcdefghijklmnopqrstu",
            &secret("secret1"),
            &secret("secret1"),
        );
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("cannot exceed 20"));
    }

    #[test]
    fn overlong_email_is_rejected_before_the_format_check() {
        let local = "a".repeat(118);
        let email = format!("{local}@x.com");
        let errors = validate_signup(
            IdentifierField::Email,
            &email,
            &secret("secret1"),
            &secret("secret1"),
        );
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("cannot exceed 120"));
    }

    #[test]
    fn failures_accumulate_in_form_order() {
        let errors = validate_signup(IdentifierField::Email, "nope", &secret(""), &secret(""));
        let fields: Vec<&str> = errors.iter().map(|error| error.field).collect();
        assert_eq!(fields, vec!["email", "password", "passwordconf"]);
    }

    #[test]
    fn password_mismatch_is_reported_on_the_password_field() {
        let errors = validate_signup(
            IdentifierField::Email,
            "a@x.com",
            &secret("secret1"),
            &secret("secret2"),
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");
        assert!(errors[0].message.contains("does not match"));
    }
}
