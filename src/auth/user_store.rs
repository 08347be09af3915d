//! User Storage
//! Mission: Securely store user credentials with SQLite and bcrypt

use crate::auth::error::{AuthError, AuthResult};
use crate::auth::models::{User, UserId};
use crate::db::Database;
use bcrypt::{hash, verify};
use chrono::Utc;
use rusqlite::{params, ErrorCode, OptionalExtension};
use tracing::{debug, info};

// Hashed once per store so unknown usernames cost the same bcrypt work.
const DUMMY_PASSWORD: &str = "stockwatch-timing-equalizer";

/// Cost field of a modular-crypt bcrypt hash (`$2b$10$...`)
fn hash_cost(stored: &str) -> Option<u32> {
    stored.split('$').nth(2)?.parse().ok()
}

/// Credential store over the `users` table
pub struct UserStore {
    db: Database,
    cost: u32,
    dummy_hash: String,
}

impl UserStore {
    /// Create a user store with an explicit bcrypt cost (4..=31).
    ///
    /// The dummy hash takes the cost of the oldest stored hash when one
    /// exists, so accounts written at a different cost still verify in the
    /// same time as unknown usernames.
    pub fn with_cost(db: Database, cost: u32) -> AuthResult<Self> {
        let stored: Option<String> = db
            .conn()
            .query_row("SELECT pass_hash FROM users ORDER BY id LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        let dummy_cost = stored.as_deref().and_then(hash_cost).unwrap_or(cost);
        if dummy_cost != cost {
            debug!("Dummy hash cost {} follows stored hashes", dummy_cost);
        }

        let dummy_hash = hash(DUMMY_PASSWORD, dummy_cost)?;
        Ok(Self {
            db,
            cost,
            dummy_hash,
        })
    }

    /// Create a new user. The UNIQUE constraint on `username` is the
    /// source of truth for duplicates, including under concurrent inserts.
    pub fn create_user(&self, username: &str, password: &str) -> AuthResult<UserId> {
        let password_hash = hash(password, self.cost)?;
        let created_at = Utc::now().timestamp();

        let conn = self.db.conn();
        let inserted = conn.execute(
            "INSERT INTO users (username, pass_hash, created_at) VALUES (?1, ?2, ?3)",
            params![username, password_hash, created_at],
        );

        match inserted {
            Ok(_) => {
                let id = UserId(conn.last_insert_rowid());
                info!("✅ Created user: {} (id {})", username, id);
                Ok(id)
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                debug!("Duplicate username rejected: {}", username);
                Err(AuthError::DuplicateUsername)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Verify username and password. Both failure causes collapse into
    /// `InvalidCredentials`.
    pub fn verify_credentials(&self, username: &str, password: &str) -> AuthResult<UserId> {
        let row: Option<(i64, String)> = self
            .db
            .conn()
            .query_row(
                "SELECT id, pass_hash FROM users WHERE username = ?1",
                params![username],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((id, stored_hash)) => {
                // A corrupt stored hash is treated as a mismatch.
                if verify(password, &stored_hash).unwrap_or(false) {
                    Ok(UserId(id))
                } else {
                    Err(AuthError::InvalidCredentials)
                }
            }
            None => {
                let _ = verify(password, &self.dummy_hash);
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Number of accounts
    pub fn count_users(&self) -> AuthResult<u64> {
        let count: i64 = self
            .db
            .conn()
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Get user by id
    pub fn get_user(&self, id: UserId) -> AuthResult<Option<User>> {
        let user = self
            .db
            .conn()
            .query_row(
                "SELECT id, username, pass_hash, created_at FROM users WHERE id = ?1",
                params![id.0],
                |row| {
                    Ok(User {
                        id: UserId(row.get(0)?),
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }
}
