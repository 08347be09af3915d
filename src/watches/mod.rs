//! Watch-list Storage
//! Mission: Persist watch targets and notification settings for the monitoring worker

pub mod models;
pub mod settings_store;
pub mod watch_store;

pub use models::{NewWatch, Settings, Watch};
pub use settings_store::SettingsStore;
pub use watch_store::WatchStore;
