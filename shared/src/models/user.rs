//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered customer account
///
/// This is the persisted record; `pass_hash` is stored alongside the rest
/// of the fields. API responses never use this type directly — they use
/// the projections in [`crate::client`] which omit the hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub login: String,
    pub email: String,
    pub pass_hash: String,
    #[serde(default)]
    pub banned: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user record with a fresh id and timestamp
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        login: impl Into<String>,
        email: impl Into<String>,
        pass_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("u{}", Uuid::new_v4().simple()),
            name: name.into(),
            surname: surname.into(),
            login: login.into(),
            email: email.into(),
            pass_hash: pass_hash.into(),
            banned: false,
            created_at: Utc::now(),
        }
    }
}
