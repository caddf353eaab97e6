//! Validation utilities.
//!
//! Field errors are collected into [`FieldErrors`], a map from field name to
//! the human-readable messages for that field. Messages are rendered from
//! `validator` error codes so DTOs only declare rules, not wording.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use validator::{Validate, ValidationErrors};

/// Per-field validation messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an error map holding one message.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Appends a message for a field, keeping insertion order within the field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Moves every message from `other` into `self`.
    pub fn merge(&mut self, other: Self) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// Returns true if no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the field has at least one error.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns the messages recorded for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Iterates over fields and their messages in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Returns `Ok(())` when empty, otherwise the errors themselves.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl From<ValidationErrors> for FieldErrors {
    /// A field that failed `required` reports only that message; its other
    /// rules would just restate that the value is missing.
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors = Self::new();
        for (field, errors) in errors.field_errors() {
            let field = field.to_string();
            if errors.iter().any(|e| e.code == "required") {
                field_errors.add(field.clone(), messages::required(&field));
                continue;
            }
            for error in errors {
                field_errors.add(field.clone(), messages::describe(&field, error));
            }
        }
        field_errors
    }
}

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns the collected field errors on failure.
    fn validate_fields(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(FieldErrors::from)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Human-readable validation messages.
pub mod messages {
    use serde_json::Value;
    use validator::ValidationError;

    fn label(field: &str) -> String {
        field.replace('_', " ")
    }

    fn param(error: &ValidationError, key: &str) -> Option<String> {
        error.params.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// `The {field} field is required.`
    #[must_use]
    pub fn required(field: &str) -> String {
        format!("The {} field is required.", label(field))
    }

    /// `The {field} field confirmation does not match.`
    #[must_use]
    pub fn confirmed(field: &str) -> String {
        format!("The {} field confirmation does not match.", label(field))
    }

    /// `The {field} field must be a string.`
    #[must_use]
    pub fn string(field: &str) -> String {
        format!("The {} field must be a string.", label(field))
    }

    /// `The {field} field must be true or false.`
    #[must_use]
    pub fn boolean(field: &str) -> String {
        format!("The {} field must be true or false.", label(field))
    }

    /// `The {field} has already been taken.`
    #[must_use]
    pub fn unique(field: &str) -> String {
        format!("The {} has already been taken.", label(field))
    }

    /// Renders a `validator` error as a sentence about `field`.
    ///
    /// An explicit message on the error wins over the code-derived one.
    #[must_use]
    pub fn describe(field: &str, error: &ValidationError) -> String {
        if let Some(message) = &error.message {
            return message.to_string();
        }

        let name = label(field);
        let min = param(error, "min");
        let max = param(error, "max");

        match error.code.as_ref() {
            "required" => required(field),
            "email" => format!("The {name} field must be a valid email address."),
            "length" => {
                let too_short = match (&min, error.params.get("value")) {
                    (Some(min), Some(Value::String(value))) => min
                        .parse::<usize>()
                        .is_ok_and(|min| value.chars().count() < min),
                    (Some(_), _) => max.is_none(),
                    (None, _) => false,
                };
                match (too_short, min, max) {
                    (true, Some(min), _) => {
                        format!("The {name} field must be at least {min} characters.")
                    }
                    (_, _, Some(max)) => {
                        format!("The {name} field must not be greater than {max} characters.")
                    }
                    _ => format!("The {name} field has an invalid length."),
                }
            }
            "digits_between" => match (min, max) {
                (Some(min), Some(max)) => {
                    format!("The {name} field must be between {min} and {max} digits.")
                }
                _ => format!("The {name} field must contain only digits."),
            },
            "boolean" => boolean(field),
            _ => format!("The {name} field is invalid."),
        }
    }
}

/// Common validation functions.
pub mod rules {
    use std::borrow::Cow;
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    ///
    /// Reported with the `required` code, since a blank value does not satisfy
    /// a required field.
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("required"));
        }
        Ok(())
    }

    /// Validates that a string is made only of ASCII digits and has a digit
    /// count within `min..=max`.
    pub fn digits_between(value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
        let len = value.len();
        if value.bytes().all(|b| b.is_ascii_digit()) && (min..=max).contains(&len) {
            return Ok(());
        }
        let mut error = ValidationError::new("digits_between");
        error.add_param(Cow::Borrowed("min"), &min);
        error.add_param(Cow::Borrowed("max"), &max);
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;
    use std::borrow::Cow;
    use validator::ValidationError;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
        assert_eq!(not_blank("").unwrap_err().code, "required");
    }

    #[test]
    fn test_digits_between() {
        assert!(digits_between("0812345678", 10, 15).is_ok());
        assert!(digits_between("081234567890123", 10, 15).is_ok());
        assert!(digits_between("123", 10, 15).is_err());
        assert!(digits_between("0812345678901234", 10, 15).is_err());
        assert!(digits_between("08123-45678", 10, 15).is_err());
        assert!(digits_between("+6281234567890", 10, 15).is_err());
        assert!(digits_between("", 10, 15).is_err());
    }

    #[test]
    fn test_describe_messages() {
        assert_eq!(
            messages::describe("name", &ValidationError::new("required")),
            "The name field is required."
        );
        assert_eq!(
            messages::describe("email", &ValidationError::new("email")),
            "The email field must be a valid email address."
        );
        assert_eq!(
            messages::describe("phone", &digits_between("1", 10, 15).unwrap_err()),
            "The phone field must be between 10 and 15 digits."
        );
        assert_eq!(
            messages::describe("is_active", &ValidationError::new("boolean")),
            "The is active field must be true or false."
        );
    }

    #[test]
    fn test_describe_length_messages() {
        let mut too_long = ValidationError::new("length");
        too_long.add_param(Cow::Borrowed("max"), &255);
        too_long.add_param(Cow::Borrowed("value"), &"x".repeat(256));
        assert_eq!(
            messages::describe("department", &too_long),
            "The department field must not be greater than 255 characters."
        );

        let mut too_short = ValidationError::new("length");
        too_short.add_param(Cow::Borrowed("min"), &8);
        too_short.add_param(Cow::Borrowed("value"), &"short");
        assert_eq!(
            messages::describe("password", &too_short),
            "The password field must be at least 8 characters."
        );
    }

    #[test]
    fn test_describe_prefers_explicit_message() {
        let error = ValidationError::new("custom").with_message(Cow::Borrowed("Nope."));
        assert_eq!(messages::describe("name", &error), "Nope.");
    }

    #[test]
    fn test_field_errors_accumulate_in_order() {
        let mut errors = FieldErrors::new();
        errors.add("email", messages::required("email"));
        errors.add("email", messages::unique("email"));
        errors.add("name", messages::required("name"));

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get("email").unwrap(),
            [
                "The email field is required.".to_string(),
                "The email has already been taken.".to_string()
            ]
        );
        assert!(errors.contains("name"));
        assert!(!errors.contains("phone"));
    }

    #[test]
    fn test_field_errors_merge_and_into_result() {
        assert!(FieldErrors::new().into_result().is_ok());

        let mut errors = FieldErrors::single("password", messages::confirmed("password"));
        errors.merge(FieldErrors::single("password", "second"));
        assert_eq!(errors.get("password").map(<[String]>::len), Some(2));
        assert!(errors.into_result().is_err());
    }

    #[derive(Validate)]
    struct Contact {
        #[validate(custom(function = "not_blank"), email)]
        email: Option<String>,
    }

    #[test]
    fn test_required_error_hides_other_rules() {
        let contact = Contact {
            email: Some(String::new()),
        };
        let errors = contact.validate_fields().unwrap_err();
        assert_eq!(
            errors.get("email").unwrap(),
            ["The email field is required.".to_string()]
        );

        let contact = Contact {
            email: Some("nope".to_string()),
        };
        let errors = contact.validate_fields().unwrap_err();
        assert_eq!(
            errors.get("email").unwrap(),
            ["The email field must be a valid email address.".to_string()]
        );
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let errors = FieldErrors::single("phone", "bad");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "phone": ["bad"] }));
    }
}
