//! Notification Settings Storage
//! Mission: Read and write the singleton bridge settings row

use crate::db::Database;
use crate::watches::models::Settings;
use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

pub struct SettingsStore {
    db: Database,
}

impl SettingsStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Current settings; NULL columns read as empty strings
    pub fn get(&self) -> Result<Settings> {
        let settings = self
            .db
            .conn()
            .query_row(
                "SELECT IFNULL(tg_token, ''), IFNULL(tg_chat_id, '') FROM settings WHERE id = 1",
                [],
                |row| {
                    Ok(Settings {
                        tg_token: row.get(0)?,
                        tg_chat_id: row.get(1)?,
                    })
                },
            )
            .optional()
            .context("Failed to read settings")?;

        Ok(settings.unwrap_or_default())
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        self.db
            .conn()
            .execute(
                "INSERT INTO settings (id, tg_token, tg_chat_id) VALUES (1, ?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET tg_token = excluded.tg_token, tg_chat_id = excluded.tg_chat_id",
                params![settings.tg_token, settings.tg_chat_id],
            )
            .context("Failed to save settings")?;
        Ok(())
    }
}
