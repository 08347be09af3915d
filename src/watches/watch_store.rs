//! Watch Storage
//! Mission: Keyed CRUD over the `watches` table

use crate::db::Database;
use crate::watches::models::{NewWatch, Watch};
use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

const WATCH_COLUMNS: &str = "id, url, model, count_regex, instock_regex, oos_regex, window, enabled,
     last_status, last_available, last_checked, last_notified";

pub struct WatchStore {
    db: Database,
}

impl WatchStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All watches, newest first
    pub fn list(&self) -> Result<Vec<Watch>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM watches ORDER BY id DESC",
            WATCH_COLUMNS
        ))?;

        let watches = stmt
            .query_map([], row_to_watch)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to list watches")?;

        Ok(watches)
    }

    pub fn get(&self, id: i64) -> Result<Option<Watch>> {
        let watch = self
            .db
            .conn()
            .query_row(
                &format!("SELECT {} FROM watches WHERE id = ?1", WATCH_COLUMNS),
                params![id],
                row_to_watch,
            )
            .optional()?;
        Ok(watch)
    }

    /// Insert an enabled watch and return its id
    pub fn add(&self, watch: &NewWatch) -> Result<i64> {
        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO watches (url, model, count_regex, instock_regex, oos_regex, window, enabled)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)",
            params![
                watch.url,
                watch.model,
                watch.count_regex,
                watch.instock_regex,
                watch.oos_regex,
                watch.window,
            ],
        )
        .context("Failed to insert watch")?;

        let id = conn.last_insert_rowid();
        info!("👀 Watch added: {} [{}] (id {})", watch.model, watch.url, id);
        Ok(id)
    }

    /// Delete by id. Returns whether a row was removed; unknown ids are not an error.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let removed = self
            .db
            .conn()
            .execute("DELETE FROM watches WHERE id = ?1", params![id])?;

        if removed > 0 {
            info!("🗑️  Watch deleted: {}", id);
        }
        Ok(removed > 0)
    }
}

fn row_to_watch(row: &Row<'_>) -> rusqlite::Result<Watch> {
    Ok(Watch {
        id: row.get(0)?,
        url: row.get(1)?,
        model: row.get(2)?,
        count_regex: row.get(3)?,
        instock_regex: row.get(4)?,
        oos_regex: row.get(5)?,
        window: row.get(6)?,
        enabled: row.get::<_, i64>(7)? != 0,
        last_status: row.get(8)?,
        last_available: row.get(9)?,
        last_checked: row.get(10)?,
        last_notified: row.get(11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watches::models::DEFAULT_WINDOW_MS;

    fn new_watch(model: &str) -> NewWatch {
        NewWatch {
            url: format!("https://shop.example/{}", model),
            model: model.to_string(),
            count_regex: None,
            instock_regex: Some("In stock".to_string()),
            oos_regex: None,
            window: DEFAULT_WINDOW_MS,
        }
    }

    #[test]
    fn test_add_and_list_newest_first() {
        let store = WatchStore::new(Database::open_in_memory().unwrap());

        let first = store.add(&new_watch("alpha")).unwrap();
        let second = store.add(&new_watch("beta")).unwrap();

        let watches = store.list().unwrap();
        assert_eq!(watches.len(), 2);
        assert_eq!(watches[0].id, second);
        assert_eq!(watches[1].id, first);
    }

    #[test]
    fn test_new_watch_has_unset_status() {
        let store = WatchStore::new(Database::open_in_memory().unwrap());
        let id = store.add(&new_watch("alpha")).unwrap();

        let watch = store.get(id).unwrap().unwrap();
        assert!(watch.enabled);
        assert_eq!(watch.window, DEFAULT_WINDOW_MS);
        assert_eq!(watch.instock_regex.as_deref(), Some("In stock"));
        assert_eq!(watch.count_regex, None);
        assert_eq!(watch.last_status, None);
        assert_eq!(watch.last_available, None);
        assert_eq!(watch.last_checked, None);
        assert_eq!(watch.last_notified, None);
    }

    #[test]
    fn test_reads_worker_written_status() {
        let db = Database::open_in_memory().unwrap();
        let store = WatchStore::new(db.clone());
        let id = store.add(&new_watch("alpha")).unwrap();

        db.conn()
            .execute(
                "UPDATE watches SET last_status = 'IN_STOCK', last_available = 3, last_checked = 1700000000 WHERE id = ?1",
                params![id],
            )
            .unwrap();

        let watch = store.get(id).unwrap().unwrap();
        assert_eq!(watch.last_status.as_deref(), Some("IN_STOCK"));
        assert_eq!(watch.last_available, Some(3));
        assert_eq!(watch.last_checked, Some(1_700_000_000));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = WatchStore::new(Database::open_in_memory().unwrap());
        let id = store.add(&new_watch("alpha")).unwrap();

        assert!(store.delete(id).unwrap());
        assert!(!store.delete(id).unwrap());
        assert!(store.get(id).unwrap().is_none());
    }
}
