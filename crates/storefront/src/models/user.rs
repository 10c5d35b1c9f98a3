//! Registered user types.
//!
//! The registry is a local, append-only list of shoppers. Passwords are kept
//! and compared verbatim: nothing here protects a real secret.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tienda_core::{Email, Username};

/// A shopper's password, as typed.
///
/// `Debug` is redacted so records can be logged safely.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    /// Wrap a password verbatim (no trimming).
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// Exact comparison against a candidate.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }

    /// Whether the password is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

/// A registered shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique key of the record.
    pub username: Username,
    pub password: Password,
    pub email: Email,
    /// When the record was created. Absent in records written before it existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<DateTime<Utc>>,
}

/// Append-only list of registered shoppers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRegistry {
    users: Vec<UserRecord>,
}

impl UserRegistry {
    /// Whether a username is already registered.
    #[must_use]
    pub fn contains(&self, username: &Username) -> bool {
        self.users.iter().any(|u| &u.username == username)
    }

    /// Find the record matching both username and password exactly.
    #[must_use]
    pub fn find_by_credentials(&self, username: &Username, password: &str) -> Option<&UserRecord> {
        self.users
            .iter()
            .find(|u| &u.username == username && u.password.matches(password))
    }

    /// Append a record. Callers must check [`Self::contains`] first.
    pub(crate) fn push(&mut self, record: UserRecord) {
        self.users.push(record);
    }

    /// Registered records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &UserRecord> {
        self.users.iter()
    }

    /// Number of registered records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether nobody has registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
