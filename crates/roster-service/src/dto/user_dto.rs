//! User-related DTOs.
//!
//! Request fields are [`Field`]s so a missing, `null` or wrongly typed value
//! is reported as a field error instead of a deserialization failure.
//! Validation is pure: [`CreateUserRequest::into_validated`] and
//! [`UpdateUserRequest::into_validated`] only look at the request itself.
//! Store-dependent rules live in the service.

use super::Field;
use chrono::{DateTime, Utc};
use roster_core::rules::{digits_between, not_blank};
use roster_core::{messages, FieldErrors, User, UserId, ValidateExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Shortest accepted phone number, in digits.
pub const PHONE_MIN_DIGITS: usize = 10;
/// Longest accepted phone number, in digits.
pub const PHONE_MAX_DIGITS: usize = 15;

fn phone_number(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    digits_between(value, PHONE_MIN_DIGITS, PHONE_MAX_DIGITS)
}

/// Adds the confirmation error when a supplied password does not match.
fn check_confirmation(
    password: Option<&str>,
    confirmation: Option<&str>,
    errors: &mut FieldErrors,
) {
    let Some(password) = password else {
        return;
    };
    let required = messages::required("password");
    if errors
        .get("password")
        .is_some_and(|existing| existing.contains(&required))
    {
        return;
    }
    if confirmation != Some(password) {
        errors.add("password", messages::confirmed("password"));
    }
}

/// Folds rule failures into the type errors. A field that already has a
/// type error keeps only that.
fn with_rule_errors(mut errors: FieldErrors, rules: Result<(), FieldErrors>) -> FieldErrors {
    let Err(rule_errors) = rules else {
        return errors;
    };
    for (field, messages) in rule_errors.iter() {
        if errors.contains(field) {
            continue;
        }
        for message in messages {
            errors.add(field, message.clone());
        }
    }
    errors
}

/// Request to create a new user.
#[derive(Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateUserRequest {
    #[serde(skip_serializing_if = "Field::is_absent")]
    #[schema(value_type = String, example = "John Doe", max_length = 255)]
    pub name: Field,

    #[serde(skip_serializing_if = "Field::is_absent")]
    #[schema(value_type = String, example = "john@example.com", max_length = 255)]
    pub email: Field,

    #[serde(skip_serializing_if = "Field::is_absent")]
    #[schema(value_type = String, example = "081234567890", min_length = 10, max_length = 15)]
    pub phone: Field,

    #[serde(skip_serializing_if = "Field::is_absent")]
    #[schema(value_type = String, example = "IT", max_length = 255)]
    pub department: Field,

    #[serde(skip_serializing_if = "Field::is_absent")]
    #[schema(value_type = Option<bool>, example = true)]
    pub is_active: Field,

    #[serde(skip_serializing_if = "Field::is_absent")]
    #[schema(value_type = String, example = "password123", min_length = 8, format = Password)]
    pub password: Field,

    #[serde(skip_serializing_if = "Field::is_absent")]
    #[schema(value_type = String, example = "password123", format = Password)]
    pub password_confirmation: Field,
}

/// String fields of a create request, once their JSON types are known.
#[derive(Validate)]
struct CreateUserFields {
    #[validate(required, custom(function = "not_blank"), length(max = 255))]
    name: Option<String>,

    #[validate(required, custom(function = "not_blank"), email, length(max = 255))]
    email: Option<String>,

    #[validate(required, custom(function = "phone_number"))]
    phone: Option<String>,

    #[validate(required, custom(function = "not_blank"), length(max = 255))]
    department: Option<String>,

    #[validate(required, custom(function = "not_blank"), length(min = 8))]
    password: Option<String>,
}

/// A create request that passed every stateless rule.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidatedCreateUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub is_active: Option<bool>,
    pub password: String,
}

impl CreateUserRequest {
    /// Validates the request without touching the store.
    pub fn into_validated(self) -> Result<ValidatedCreateUser, FieldErrors> {
        let mut type_errors = FieldErrors::new();
        let confirmation = self.password_confirmation.as_str().map(str::to_owned);
        let fields = CreateUserFields {
            name: self.name.into_string("name", &mut type_errors),
            email: self.email.into_string("email", &mut type_errors),
            phone: self.phone.into_string("phone", &mut type_errors),
            department: self.department.into_string("department", &mut type_errors),
            password: self.password.into_string("password", &mut type_errors),
        };
        let is_active = self.is_active.into_bool("is_active", &mut type_errors);

        let mut errors = with_rule_errors(type_errors, fields.validate_fields());
        check_confirmation(
            fields.password.as_deref(),
            confirmation.as_deref(),
            &mut errors,
        );
        errors.into_result()?;

        match (fields.name, fields.email, fields.phone, fields.department, fields.password) {
            (Some(name), Some(email), Some(phone), Some(department), Some(password)) => {
                Ok(ValidatedCreateUser {
                    name,
                    email,
                    phone,
                    department,
                    is_active,
                    password,
                })
            }
            // Unreachable once `required` passed; reported rather than panicking.
            (name, email, phone, department, password) => {
                let mut missing = FieldErrors::new();
                for (field, absent) in [
                    ("name", name.is_none()),
                    ("email", email.is_none()),
                    ("phone", phone.is_none()),
                    ("department", department.is_none()),
                    ("password", password.is_none()),
                ] {
                    if absent {
                        missing.add(field, messages::required(field));
                    }
                }
                Err(missing)
            }
        }
    }
}

/// Request to update a user. Absent fields are left unchanged; a field sent
/// as `null` fails validation.
#[derive(Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Field::is_absent")]
    #[schema(value_type = Option<String>, example = "John Doe", max_length = 255)]
    pub name: Field,

    #[serde(skip_serializing_if = "Field::is_absent")]
    #[schema(value_type = Option<String>, example = "john@example.com", max_length = 255)]
    pub email: Field,

    #[serde(skip_serializing_if = "Field::is_absent")]
    #[schema(value_type = Option<String>, example = "081234567890", min_length = 10, max_length = 15)]
    pub phone: Field,

    #[serde(skip_serializing_if = "Field::is_absent")]
    #[schema(value_type = Option<String>, example = "IT", max_length = 255)]
    pub department: Field,

    #[serde(skip_serializing_if = "Field::is_absent")]
    #[schema(value_type = Option<bool>, example = true)]
    pub is_active: Field,

    #[serde(skip_serializing_if = "Field::is_absent")]
    #[schema(value_type = Option<String>, example = "password123", min_length = 8, format = Password)]
    pub password: Field,

    #[serde(skip_serializing_if = "Field::is_absent")]
    #[schema(value_type = Option<String>, example = "password123", format = Password)]
    pub password_confirmation: Field,
}

#[derive(Validate)]
struct UpdateUserFields {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    name: Option<String>,

    #[validate(custom(function = "not_blank"), email, length(max = 255))]
    email: Option<String>,

    #[validate(custom(function = "phone_number"))]
    phone: Option<String>,

    #[validate(custom(function = "not_blank"), length(max = 255))]
    department: Option<String>,

    #[validate(custom(function = "not_blank"), length(min = 8))]
    password: Option<String>,
}

/// An update request that passed every stateless rule.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ValidatedUpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    /// Validates only the supplied fields, without touching the store.
    pub fn into_validated(self) -> Result<ValidatedUpdateUser, FieldErrors> {
        let mut type_errors = FieldErrors::new();
        let confirmation = self.password_confirmation.as_str().map(str::to_owned);
        let fields = UpdateUserFields {
            name: self.name.into_string("name", &mut type_errors),
            email: self.email.into_string("email", &mut type_errors),
            phone: self.phone.into_string("phone", &mut type_errors),
            department: self.department.into_string("department", &mut type_errors),
            password: self.password.into_string("password", &mut type_errors),
        };
        let is_active = self.is_active.into_bool("is_active", &mut type_errors);

        let mut errors = with_rule_errors(type_errors, fields.validate_fields());
        check_confirmation(
            fields.password.as_deref(),
            confirmation.as_deref(),
            &mut errors,
        );
        errors.into_result()?;

        Ok(ValidatedUpdateUser {
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            department: fields.department,
            is_active,
            password: fields.password,
        })
    }
}

// Debug impls leave passwords out entirely so they never reach the logs.

impl fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("department", &self.department)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for UpdateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateUserRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("department", &self.department)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for ValidatedCreateUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedCreateUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("department", &self.department)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for ValidatedUpdateUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedUpdateUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("department", &self.department)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

/// User response DTO. Never carries the password or its hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john@example.com")]
    pub email: String,
    #[schema(example = "081234567890")]
    pub phone: String,
    #[schema(example = "IT")]
    pub department: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            department: user.department,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Plain message body, e.g. for deletions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "User deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    /// Creates a message body.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
