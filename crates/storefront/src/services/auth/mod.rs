//! Simulated authentication.
//!
//! Registration and login against the local user registry. There is no
//! hashing: passwords are stored and compared as typed, which is only
//! acceptable because no real secret is ever at stake here.

mod error;

pub use error::AuthError;

use chrono::Utc;
use serde::Deserialize;

use tienda_core::{Email, Username};

use crate::models::{AuthSession, Password, UserRecord, UserRegistry};

/// Registration form data.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Login form data.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Authentication service.
///
/// Borrows the registry and the session it acts on; callers persist the
/// result afterwards.
pub struct AuthService<'a> {
    users: &'a mut UserRegistry,
    session: &'a mut AuthSession,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    pub fn new(users: &'a mut UserRegistry, session: &'a mut AuthSession) -> Self {
        Self { users, session }
    }

    /// Register a new shopper and sign them in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if any field is blank,
    /// `AuthError::UserAlreadyExists` if the username is taken, and
    /// `AuthError::InvalidEmail` if the email is malformed. The registry and
    /// session are untouched on error.
    pub fn register(&mut self, form: &RegisterForm) -> Result<Username, AuthError> {
        if form.username.trim().is_empty() {
            return Err(AuthError::MissingField("username"));
        }
        if form.password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        if form.email.trim().is_empty() {
            return Err(AuthError::MissingField("email"));
        }

        let username = Username::parse(&form.username)?;
        if self.users.contains(&username) {
            return Err(AuthError::UserAlreadyExists);
        }
        let email = Email::parse(&form.email)?;

        self.users.push(UserRecord {
            username: username.clone(),
            password: Password::new(form.password.as_str()),
            email,
            registered_at: Some(Utc::now()),
        });
        *self.session = AuthSession::Authenticated(username.clone());

        tracing::info!(username = %username, "User registered");
        Ok(username)
    }

    /// Sign in with an existing username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if a field is blank and
    /// `AuthError::InvalidCredentials` if no record matches both fields. The
    /// session is untouched on error.
    pub fn login(&mut self, form: &LoginForm) -> Result<Username, AuthError> {
        if form.username.trim().is_empty() {
            return Err(AuthError::MissingField("username"));
        }
        if form.password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        // A name that cannot be registered cannot match a record either.
        let Ok(username) = Username::parse(&form.username) else {
            tracing::warn!("Login failed");
            return Err(AuthError::InvalidCredentials);
        };
        if self
            .users
            .find_by_credentials(&username, &form.password)
            .is_none()
        {
            tracing::warn!(username = %username, "Login failed");
            return Err(AuthError::InvalidCredentials);
        }

        *self.session = AuthSession::Authenticated(username.clone());
        tracing::info!(username = %username, "User logged in");
        Ok(username)
    }

    /// Sign out. Returns the username that was signed in, if any.
    pub fn logout(&mut self) -> Option<Username> {
        let previous = std::mem::take(&mut *self.session);
        match previous {
            AuthSession::Authenticated(username) => {
                tracing::info!(username = %username, "User logged out");
                Some(username)
            }
            AuthSession::Anonymous => None,
        }
    }
}
