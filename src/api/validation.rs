//! Input validation for API requests.
//!
//! Pure checks over request bodies. Handlers turn a failed check into an
//! `ApiError::validation` carrying the message returned here.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

lazy_static! {
    /// Loose shape check for email addresses (local@domain.tld)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[^\s@]+@[^\s@]+\.[^\s@]+$"
    ).unwrap();
}

/// Fields a user update may touch
pub const ACCEPTED_USER_FIELDS: [&str; 4] = ["name", "email", "password", "building_id"];

/// Message returned when `POST /users` lacks a required property
pub fn missing_user_field_message(field: &str) -> String {
    format!(
        "Expected format: {{ name: <String>, email: <String>, password: <String>, building_id: <Integer> }}. You're missing a \"{}\" property.",
        field
    )
}

/// First key of an update body that is outside the accepted set.
pub fn first_unaccepted_field<'a>(body: &'a Map<String, Value>, accepted: &[&str]) -> Option<&'a str> {
    body.keys()
        .map(String::as_str)
        .find(|key| !accepted.contains(key))
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(format!("{} is not a valid email address.", email));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_user_field_message() {
        let message = missing_user_field_message("email");
        assert!(message.starts_with("Expected format: { name: <String>"));
        assert!(message.ends_with("You're missing a \"email\" property."));
    }

    #[test]
    fn test_first_unaccepted_field() {
        let ok = json!({ "name": "A", "building_id": 2 });
        assert_eq!(
            first_unaccepted_field(ok.as_object().unwrap(), &ACCEPTED_USER_FIELDS),
            None
        );

        let bad = json!({ "name": "A", "is_admin": true });
        assert_eq!(
            first_unaccepted_field(bad.as_object().unwrap(), &ACCEPTED_USER_FIELDS),
            Some("is_admin")
        );
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("gray@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());

        assert!(validate_email("gray").is_err());
        assert!(validate_email("gray@example").is_err());
        assert!(validate_email("gray smith@example.com").is_err());
        assert!(validate_email(&format!("{}@example.com", "a".repeat(250))).is_err());
    }
}
