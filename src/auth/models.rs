//! Authentication Models
//! Mission: Define user, session and login data structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque numeric user identity (SQLite rowid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub created_at: i64,
}

/// Persisted session row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: i64,
}

impl Session {
    /// Expired at or after `expires_at`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

/// A freshly issued session, returned to the caller so it can set the cookie.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: i64,
}

/// Login and signup form body
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Data for the login/signup page
#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LoginView {
    pub signup_enabled: bool,
    pub show_signup: bool,
    pub error: Option<String>,
}

/// User response (sanitized)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub created_at: i64,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}
