//! Authentication Module
//! Mission: Credentials, cookie sessions, admin bootstrap and signup policy

pub mod api;
pub mod bootstrap;
pub mod error;
pub mod middleware;
pub mod models;
pub mod registration;
pub mod session;
pub mod user_store;

pub use api::AuthState;
pub use bootstrap::{bootstrap_admin, BootstrapOutcome};
pub use error::{AuthError, AuthResult};
pub use middleware::{require_auth, CurrentUser};
pub use models::UserId;
pub use registration::Registration;
pub use session::{SessionManager, SESSION_COOKIE};
pub use user_store::UserStore;
