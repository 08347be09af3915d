//! Process Configuration
//! Mission: One explicit config object, from flags or environment

use clap::{ArgAction, Parser};
use std::net::SocketAddr;

pub const DEFAULT_COOKIE_SECRET: &str = "change-me";

#[derive(Parser, Debug, Clone)]
#[command(name = "stockwatch")]
#[command(about = "Stock watch-list manager - web front end")]
pub struct Config {
    /// SQLite database path (shared with the monitoring worker)
    #[arg(long, env = "DB_PATH", default_value = "/data/app.db")]
    pub db_path: String,

    /// Listen address
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// Reserved for cookie signing; sessions are server-side only
    #[arg(long, env = "COOKIE_SECRET", default_value = DEFAULT_COOKIE_SECRET, hide_env_values = true)]
    pub cookie_secret: String,

    /// Mark the session cookie Secure (enable when served over TLS)
    #[arg(long, env = "COOKIE_SECURE", default_value = "false", action = ArgAction::Set, value_parser = parse_flag)]
    pub cookie_secure: bool,

    /// Allow self-service signup
    #[arg(long, env = "ALLOW_SIGNUP", default_value = "false", action = ArgAction::Set, value_parser = parse_flag)]
    pub allow_signup: bool,

    /// Initial admin username, used only when no users exist
    #[arg(long, env = "ADMIN_USER")]
    pub admin_user: Option<String>,

    /// Initial admin password, used only when no users exist
    #[arg(long, env = "ADMIN_PASS", hide_env_values = true)]
    pub admin_pass: Option<String>,

    /// bcrypt cost factor
    #[arg(long, env = "BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST,
          value_parser = clap::value_parser!(u32).range(4..=31))]
    pub bcrypt_cost: u32,

    /// Expired-session sweep interval in seconds (0 = never sweep)
    #[arg(long, env = "SESSION_SWEEP_SECS", default_value = "0")]
    pub session_sweep_secs: u64,
}

impl Config {
    pub fn uses_default_secret(&self) -> bool {
        self.cookie_secret == DEFAULT_COOKIE_SECRET
    }
}

/// `1/true/on/yes` (any case) are true; everything else is false
pub fn parse_flag(v: &str) -> Result<bool, String> {
    Ok(matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        for v in ["1", "true", "TRUE", "On", " yes "] {
            assert_eq!(parse_flag(v), Ok(true), "{}", v);
        }
        for v in ["0", "false", "", "nope", "enabled"] {
            assert_eq!(parse_flag(v), Ok(false), "{}", v);
        }
    }

    #[test]
    fn test_config_from_flags() {
        let config = Config::try_parse_from([
            "stockwatch",
            "--db-path",
            "/tmp/test.db",
            "--allow-signup",
            "true",
            "--admin-user",
            "admin",
            "--admin-pass",
            "hunter22",
            "--bcrypt-cost",
            "4",
        ])
        .unwrap();

        assert_eq!(config.db_path, "/tmp/test.db");
        assert!(config.allow_signup);
        assert_eq!(config.admin_user.as_deref(), Some("admin"));
        assert_eq!(config.admin_pass.as_deref(), Some("hunter22"));
        assert_eq!(config.bcrypt_cost, 4);
    }

    #[test]
    fn test_bcrypt_cost_range_enforced() {
        let result = Config::try_parse_from(["stockwatch", "--bcrypt-cost", "2"]);
        assert!(result.is_err());
    }
}
