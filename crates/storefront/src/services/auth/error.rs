//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during registration and login.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// A required form field was left blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Username failed validation.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] tienda_core::UsernameError),

    /// Email failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] tienda_core::EmailError),

    /// Username is already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// No registered user matches both username and password.
    #[error("invalid credentials")]
    InvalidCredentials,
}

impl AuthError {
    /// Whether this is a credential mismatch rather than bad form input.
    #[must_use]
    pub const fn is_credential_error(&self) -> bool {
        matches!(self, Self::InvalidCredentials)
    }

    /// Message suitable for showing to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingField(_) => "All fields are required.".to_string(),
            Self::InvalidUsername(e) => format!("Invalid username: {e}."),
            Self::InvalidEmail(_) => "Invalid email format.".to_string(),
            Self::UserAlreadyExists => "That username is already taken.".to_string(),
            Self::InvalidCredentials => "Incorrect username or password.".to_string(),
        }
    }
}
