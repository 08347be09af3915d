//! Session Manager
//! Mission: Issue, resolve and revoke opaque bearer tokens
//!
//! Tokens are random, server-side state only. Nothing is signed, so
//! revocation is a row delete. Expiry is checked lazily on read; expired
//! rows stay until logout or an explicit purge.

use crate::auth::error::{AuthError, AuthResult};
use crate::auth::models::{IssuedSession, Session, UserId};
use crate::db::Database;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use rusqlite::{params, OptionalExtension};
use tracing::debug;

/// Session cookie name
pub const SESSION_COOKIE: &str = "sess";

/// 256-bit tokens, hex encoded
const TOKEN_BYTES: usize = 32;

const DEFAULT_TTL_DAYS: i64 = 7;

pub struct SessionManager {
    db: Database,
    ttl: Duration,
    secure_cookie: bool,
}

impl SessionManager {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            ttl: Duration::days(DEFAULT_TTL_DAYS),
            secure_cookie: false,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Mark issued cookies `Secure` (serve over TLS only)
    pub fn with_secure_cookie(mut self, secure: bool) -> Self {
        self.secure_cookie = secure;
        self
    }

    /// Issue a new session for `user_id`. On error nothing was persisted
    /// and the caller must not set a cookie.
    pub fn create_session(&self, user_id: UserId) -> AuthResult<IssuedSession> {
        let token = generate_token();
        let expires_at = Utc::now().timestamp() + self.ttl.num_seconds();

        self.db.conn().execute(
            "INSERT INTO sessions (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
            params![token, user_id.0, expires_at],
        )?;

        debug!("Issued session for user {} (expires_at {})", user_id, expires_at);

        Ok(IssuedSession {
            token,
            user_id,
            expires_at,
        })
    }

    /// Resolve a token to its owner. Absent and expired tokens are
    /// indistinguishable to the caller.
    pub fn resolve_session(&self, token: &str) -> AuthResult<UserId> {
        self.resolve_session_at(token, Utc::now().timestamp())
    }

    pub(crate) fn resolve_session_at(&self, token: &str, now: i64) -> AuthResult<UserId> {
        if token.is_empty() {
            return Err(AuthError::Unauthenticated);
        }

        let session = self.get_session(token)?.ok_or(AuthError::Unauthenticated)?;
        if session.is_expired_at(now) {
            return Err(AuthError::Unauthenticated);
        }

        Ok(session.user_id)
    }

    /// Delete the session row. Unknown tokens are not an error.
    pub fn revoke_session(&self, token: &str) -> AuthResult<()> {
        if token.is_empty() {
            return Ok(());
        }

        let removed = self
            .db
            .conn()
            .execute("DELETE FROM sessions WHERE token = ?1", params![token])?;

        if removed > 0 {
            debug!("Revoked session");
        }
        Ok(())
    }

    /// Delete every expired session row. Returns the number removed.
    pub fn purge_expired(&self) -> AuthResult<usize> {
        self.purge_expired_at(Utc::now().timestamp())
    }

    pub(crate) fn purge_expired_at(&self, now: i64) -> AuthResult<usize> {
        let removed = self
            .db
            .conn()
            .execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])?;
        Ok(removed)
    }

    fn get_session(&self, token: &str) -> AuthResult<Option<Session>> {
        let session = self
            .db
            .conn()
            .query_row(
                "SELECT token, user_id, expires_at FROM sessions WHERE token = ?1",
                params![token],
                |row| {
                    Ok(Session {
                        token: row.get(0)?,
                        user_id: UserId(row.get(1)?),
                        expires_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(session)
    }

    /// Cookie carrying an issued session: `Path=/; HttpOnly; SameSite=Lax`
    pub fn session_cookie(&self, issued: &IssuedSession) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, issued.token.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookie)
            .build()
    }

    /// Cookie that clears the session cookie on the client
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, "")).path("/").build()
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
