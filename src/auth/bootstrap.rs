//! Admin Bootstrap
//! Mission: Never lock out a fresh deployment, never touch an existing one

use crate::auth::error::AuthResult;
use crate::auth::models::UserId;
use crate::auth::user_store::UserStore;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created(UserId),
    /// Admin username or password missing from configuration
    NotConfigured,
    UsersExist,
}

/// Create the configured admin account when the user table is empty.
/// Blank values count as missing.
pub fn bootstrap_admin(
    users: &UserStore,
    admin_user: Option<&str>,
    admin_pass: Option<&str>,
) -> AuthResult<BootstrapOutcome> {
    let (Some(username), Some(password)) = (
        admin_user.filter(|u| !u.is_empty()),
        admin_pass.filter(|p| !p.is_empty()),
    ) else {
        debug!("Admin bootstrap skipped: ADMIN_USER/ADMIN_PASS not both set");
        return Ok(BootstrapOutcome::NotConfigured);
    };

    if users.count_users()? > 0 {
        debug!("Admin bootstrap skipped: users already exist");
        return Ok(BootstrapOutcome::UsersExist);
    }

    let id = users.create_user(username, password)?;
    info!("🔐 Bootstrap admin created: {}", username);
    Ok(BootstrapOutcome::Created(id))
}
