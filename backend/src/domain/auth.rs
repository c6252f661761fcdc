//! Authentication primitives: validated login and registration payloads.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a store.

use std::fmt;

use zeroize::Zeroizing;

/// Minimum accepted password length at registration.
const MIN_PASSWORD_LEN: usize = 6;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty after trimming.
/// - `password` is non-empty but retains caller-provided whitespace to avoid
///   surprising credential comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Domain error returned when registration payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
    /// Password shorter than the accepted minimum.
    PasswordTooShort,
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort => {
                write!(f, "password must be at least {MIN_PASSWORD_LEN} characters")
            }
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

/// Validated registration payload.
///
/// ## Invariants
/// - `username` and `email` are trimmed and non-empty after trimming.
/// - `password` is at least [`MIN_PASSWORD_LEN`] characters and not all
///   whitespace; it is stored verbatim otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    username: String,
    email: String,
    password: Zeroizing<String>,
}

impl RegistrationRequest {
    /// Construct a registration request from raw inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(RegistrationValidationError::EmptyUsername);
        }
        let email = email.trim();
        if email.is_empty() {
            return Err(RegistrationValidationError::EmptyEmail);
        }
        // The password is stored verbatim but must not be all whitespace.
        if password.trim().is_empty() {
            return Err(RegistrationValidationError::EmptyPassword);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(RegistrationValidationError::PasswordTooShort);
        }
        Ok(Self {
            username: username.to_owned(),
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string stored against the new row.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Email string stored against the new row.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Plaintext password to be hashed by the user store.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
