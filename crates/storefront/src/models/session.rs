//! Authentication session state.

use tienda_core::Username;

/// Who is signed in. There is at most one active username.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthSession {
    #[default]
    Anonymous,
    Authenticated(Username),
}

impl AuthSession {
    /// The signed-in username, if any.
    #[must_use]
    pub const fn username(&self) -> Option<&Username> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(username) => Some(username),
        }
    }

    /// Whether someone is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}
