//! Stockwatch - Watch-list manager web front end
//! Mission: Serve the authenticated watch-list UI backed by the worker's SQLite file

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use std::path::Path;
use std::{sync::Arc, time::Duration};
use stockwatch::{auth::BootstrapOutcome, auth::SessionManager, App, Config, Database};
use tokio::{net::TcpListener, time::interval};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    let config = Config::parse();

    info!("🚀 Stockwatch web starting");

    if config.uses_default_secret() {
        warn!("⚠️  COOKIE_SECRET is the default value; set it before exposing this service");
    }

    let db = Database::open(&config.db_path)?;
    let app = App::new(&config, db)?;

    match app.bootstrap() {
        Ok(BootstrapOutcome::Created(id)) => info!("🔐 Admin account ready (id {})", id),
        Ok(outcome) => debug!("Admin bootstrap: {:?}", outcome),
        Err(e) => error!("Bootstrap admin failed: {}", e),
    }

    info!(
        "🔐 Signup {}",
        if config.allow_signup { "enabled" } else { "disabled" }
    );

    if config.session_sweep_secs > 0 {
        tokio::spawn(session_pruning_polling(
            app.auth.sessions.clone(),
            config.session_sweep_secs,
        ));
    }

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("🎯 Web listening on {}", config.bind_addr);

    axum::serve(listener, app.router())
        .await
        .context("Server error")?;

    Ok(())
}

/// Periodically delete expired session rows. Resolution never depends on
/// this; it only bounds table growth.
async fn session_pruning_polling(sessions: Arc<SessionManager>, poll_secs: u64) {
    info!("🧹 Session sweeper every {}s", poll_secs);
    let mut ticker = interval(Duration::from_secs(poll_secs));

    loop {
        ticker.tick().await;

        let sessions = sessions.clone();
        match tokio::task::spawn_blocking(move || sessions.purge_expired()).await {
            Ok(Ok(0)) => {}
            Ok(Ok(n)) => info!("🧹 Purged {} expired sessions", n),
            Ok(Err(e)) => warn!("Session purge failed: {}", e),
            Err(e) => warn!("Session purge task failed: {}", e),
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockwatch=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // 2) Also try the crate directory when launched from elsewhere
    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}
