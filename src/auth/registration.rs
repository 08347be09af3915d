//! Self-service Registration
//! Mission: Optional signup behind a static switch; signup implies login

use crate::auth::error::{AuthError, AuthResult};
use crate::auth::models::IssuedSession;
use crate::auth::session::SessionManager;
use crate::auth::user_store::UserStore;
use std::sync::Arc;
use tracing::{info, warn};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

const VALIDATION_MESSAGE: &str =
    "username must be at least 3 characters and password at least 6";

pub struct Registration {
    allow_signup: bool,
    users: Arc<UserStore>,
    sessions: Arc<SessionManager>,
}

impl Registration {
    pub fn new(allow_signup: bool, users: Arc<UserStore>, sessions: Arc<SessionManager>) -> Self {
        Self {
            allow_signup,
            users,
            sessions,
        }
    }

    pub fn enabled(&self) -> bool {
        self.allow_signup
    }

    /// Fails with `RegistrationDisabled` whatever the input when signup is off
    pub fn ensure_enabled(&self) -> AuthResult<()> {
        if self.allow_signup {
            Ok(())
        } else {
            Err(AuthError::RegistrationDisabled)
        }
    }

    /// Create the account and log the caller in
    pub fn register(&self, username: &str, password: &str) -> AuthResult<IssuedSession> {
        self.ensure_enabled()?;
        validate(username, password)?;

        let user_id = self.users.create_user(username, password).map_err(|e| {
            warn!("Signup failed for {}: {}", username, e);
            e
        })?;

        let issued = self.sessions.create_session(user_id)?;
        info!("✅ Signup successful: {} (id {})", username, user_id);
        Ok(issued)
    }
}

fn validate(username: &str, password: &str) -> AuthResult<()> {
    if username.chars().count() < MIN_USERNAME_LEN || password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::ValidationFailed(VALIDATION_MESSAGE));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn create_registration(allow_signup: bool) -> (Registration, Arc<UserStore>, Arc<SessionManager>) {
        let db = Database::open_in_memory().unwrap();
        let users = Arc::new(UserStore::with_cost(db.clone(), 4).unwrap());
        let sessions = Arc::new(SessionManager::new(db));
        let registration = Registration::new(allow_signup, users.clone(), sessions.clone());
        (registration, users, sessions)
    }

    #[test]
    fn test_signup_disabled_always_rejected() {
        let (registration, users, _) = create_registration(false);

        assert!(matches!(
            registration.register("validuser", "validpassword"),
            Err(AuthError::RegistrationDisabled)
        ));
        assert!(matches!(
            registration.register("", ""),
            Err(AuthError::RegistrationDisabled)
        ));
        assert_eq!(users.count_users().unwrap(), 0);
    }

    #[test]
    fn test_signup_logs_user_in() {
        let (registration, users, sessions) = create_registration(true);

        let issued = registration.register("alice", "secretpw").unwrap();
        assert_eq!(sessions.resolve_session(&issued.token).unwrap(), issued.user_id);
        assert_eq!(users.verify_credentials("alice", "secretpw").unwrap(), issued.user_id);
    }

    #[test]
    fn test_signup_validation() {
        let (registration, users, _) = create_registration(true);

        assert!(matches!(
            registration.register("ab", "secretpw"),
            Err(AuthError::ValidationFailed(_))
        ));
        assert!(matches!(
            registration.register("alice", "12345"),
            Err(AuthError::ValidationFailed(_))
        ));
        assert_eq!(users.count_users().unwrap(), 0);

        // Boundary lengths are accepted
        assert!(registration.register("abc", "123456").is_ok());
    }

    #[test]
    fn test_signup_duplicate_username() {
        let (registration, users, _) = create_registration(true);

        registration.register("alice", "secretpw").unwrap();
        let err = registration.register("alice", "another1").unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername));
        assert!(!err.public_message().contains("alice"));
        assert_eq!(users.count_users().unwrap(), 1);
    }
}
