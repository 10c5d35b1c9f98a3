//! Account commands.
//!
//! # Usage
//!
//! ```bash
//! tienda auth register -u ana -p secret -e ana@example.com
//! tienda auth login -u ana -p secret
//! tienda auth whoami
//! tienda auth logout
//! ```

use tienda_storefront::services::Intent;
use tienda_storefront::services::auth::{LoginForm, RegisterForm};

use super::{CommandError, Profile};

/// Create an account and sign in as it.
///
/// # Errors
///
/// Returns `CommandError::Rejected` if a field is blank or invalid, or the
/// username is taken.
pub fn register(
    profile: &mut Profile,
    username: String,
    password: String,
    email: String,
) -> Result<(), CommandError> {
    profile.apply(Intent::Register(RegisterForm {
        username,
        password,
        email,
    }))?;
    Ok(())
}

/// Sign in to an existing account.
///
/// # Errors
///
/// Returns `CommandError::Rejected` if the credentials do not match.
pub fn login(profile: &mut Profile, username: String, password: String) -> Result<(), CommandError> {
    profile.apply(Intent::Login(LoginForm { username, password }))?;
    Ok(())
}

/// Sign out. Signing out while signed out does nothing.
///
/// # Errors
///
/// Returns `CommandError::Storage` if the profile cannot be written.
pub fn logout(profile: &mut Profile) -> Result<(), CommandError> {
    if !profile.shop().session().is_authenticated() {
        tracing::info!("Nobody is signed in.");
    }
    profile.apply(Intent::Logout)?;
    Ok(())
}

pub fn whoami(profile: &Profile) {
    match profile.shop().session().username() {
        Some(username) => tracing::info!("Signed in as {username}"),
        None => tracing::info!("Not signed in ({} registered user(s))", profile.shop().users().len()),
    }
}
