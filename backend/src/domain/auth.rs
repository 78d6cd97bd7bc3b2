//! Credential inputs: login credentials, new-user data, and registrations.
//!
//! Constructors validate raw strings before a handler talks to a port or
//! service, collecting every field failure into [`ValidationErrors`] instead
//! of stopping at the first one. Plaintext passwords live in
//! [`Zeroizing`] buffers and are wiped on drop.

use std::fmt;

use serde::Serialize;
use serde_json::json;
use zeroize::Zeroizing;

use super::{DisplayName, EmailAddress, Error, UserValidationError};

/// Minimum password length in characters.
pub const PASSWORD_MIN_CHARS: usize = 6;
/// bcrypt only consumes the first 72 bytes of its input.
pub const PASSWORD_MAX_BYTES: usize = 72;

/// Machine-readable reason attached to a [`FieldError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorCode {
    Required,
    InvalidEmail,
    TooLong,
    TooShort,
    Mismatch,
}

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub code: FieldErrorCode,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, code: FieldErrorCode, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }

    fn from_user_error(field: &'static str, error: &UserValidationError) -> Self {
        let code = match error {
            UserValidationError::EmptyEmail
            | UserValidationError::EmptyDisplayName
            | UserValidationError::EmptyId
            | UserValidationError::EmptyPasswordHash => FieldErrorCode::Required,
            UserValidationError::EmailTooLong { .. }
            | UserValidationError::DisplayNameTooLong { .. } => FieldErrorCode::TooLong,
            UserValidationError::InvalidEmail | UserValidationError::InvalidId => {
                FieldErrorCode::InvalidEmail
            }
        };
        Self::new(field, code, error.to_string())
    }
}

/// Every field failure found while validating one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }

    /// The collected field errors, in field order.
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Whether any error concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for Error {
    fn from(value: ValidationErrors) -> Self {
        let message = value
            .0
            .first()
            .map_or_else(|| "invalid request".to_owned(), |e| e.message.clone());
        Error::invalid_request(message).with_details(json!({ "errors": value.0 }))
    }
}

fn check_password(field: &'static str, password: &str, errors: &mut ValidationErrors) {
    if password.chars().count() < PASSWORD_MIN_CHARS {
        errors.push(FieldError::new(
            field,
            FieldErrorCode::TooShort,
            format!("{field} must be at least {PASSWORD_MIN_CHARS} characters"),
        ));
    } else if password.len() > PASSWORD_MAX_BYTES {
        errors.push(FieldError::new(
            field,
            FieldErrorCode::TooLong,
            format!("{field} must be at most {PASSWORD_MAX_BYTES} bytes"),
        ));
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised, so lookups are case-insensitive.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use authgate::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@Example.com", "secret").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let email = EmailAddress::new(email)
            .map_err(|err| errors.push(FieldError::from_user_error("email", &err)))
            .ok();
        if password.is_empty() {
            errors.push(FieldError::new(
                "password",
                FieldErrorCode::Required,
                "password must not be empty",
            ));
        }
        match email {
            Some(email) => errors.into_result(|| Self {
                email,
                password: Zeroizing::new(password.to_owned()),
            }),
            None => Err(errors),
        }
    }

    /// Normalised email used for the lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated data for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    email: EmailAddress,
    name: DisplayName,
    password: Zeroizing<String>,
}

impl NewUser {
    /// Validate raw inputs for a new account.
    pub fn try_from_parts(
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let parts = Self::collect(email, name, password, &mut errors);
        match parts {
            Some(new_user) if errors.0.is_empty() => Ok(new_user),
            _ => Err(errors),
        }
    }

    fn collect(
        email: &str,
        name: &str,
        password: &str,
        errors: &mut ValidationErrors,
    ) -> Option<Self> {
        let email = EmailAddress::new(email)
            .map_err(|err| errors.push(FieldError::from_user_error("email", &err)))
            .ok();
        let name = DisplayName::new(name)
            .map_err(|err| errors.push(FieldError::from_user_error("name", &err)))
            .ok();
        check_password("password", password, errors);
        Some(Self {
            email: email?,
            name: name?,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Display name.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Plaintext password to hash.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Self-service registration: new-user data plus the password confirmation.
///
/// Built by [`validate_registration`]. The confirmation is not compared here;
/// registration rejects a mismatch before anything else happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    new_user: NewUser,
    password_confirm: Zeroizing<String>,
}

impl Registration {
    /// Whether the confirmation equals the password byte for byte.
    pub fn passwords_match(&self) -> bool {
        self.new_user.password().as_bytes() == self.password_confirm.as_bytes()
    }

    /// The account data to create.
    pub fn new_user(&self) -> &NewUser {
        &self.new_user
    }

    /// Consume the registration, keeping the account data.
    pub fn into_new_user(self) -> NewUser {
        self.new_user
    }
}

/// Validate a registration form, reporting every failing field.
///
/// The confirmation is carried along unchecked; see [`Registration`].
///
/// # Examples
/// ```
/// use authgate::domain::validate_registration;
///
/// let errors = validate_registration("nope", "", "abc", "abc").unwrap_err();
/// assert!(errors.has_field("email"));
/// assert!(errors.has_field("name"));
/// assert!(errors.has_field("password"));
///
/// let registration = validate_registration("a@x.com", "Ada", "secret1", "secret2").unwrap();
/// assert!(!registration.passwords_match());
/// ```
pub fn validate_registration(
    email: &str,
    name: &str,
    password: &str,
    password_confirm: &str,
) -> Result<Registration, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let new_user = NewUser::collect(email, name, password, &mut errors);
    match new_user {
        Some(new_user) if errors.0.is_empty() => Ok(Registration {
            new_user,
            password_confirm: Zeroizing::new(password_confirm.to_owned()),
        }),
        _ => Err(errors),
    }
}

/// Field error for a confirmation that differs from the password.
pub(crate) fn password_mismatch() -> FieldError {
    FieldError::new(
        "passwordConfirm",
        FieldErrorCode::Mismatch,
        "passwords do not match",
    )
}

impl From<FieldError> for ValidationErrors {
    fn from(value: FieldError) -> Self {
        Self(vec![value])
    }
}
