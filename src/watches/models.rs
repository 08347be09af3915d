//! Watch-list Models
//! Mission: Watch targets and notification settings as stored for the worker

use serde::{Deserialize, Serialize};

/// Polling window in milliseconds used when none (or a non-positive one) is given
pub const DEFAULT_WINDOW_MS: i64 = 2500;

/// A monitoring target. The `last_*` fields are written by the worker and
/// stay `None` until its first evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Watch {
    pub id: i64,
    pub url: String,
    pub model: String,
    pub count_regex: Option<String>,
    pub instock_regex: Option<String>,
    pub oos_regex: Option<String>,
    pub window: i64,
    pub enabled: bool,
    pub last_status: Option<String>,
    pub last_available: Option<i64>,
    pub last_checked: Option<i64>,
    pub last_notified: Option<i64>,
}

/// Validated input for a new watch
#[derive(Debug, Clone, PartialEq)]
pub struct NewWatch {
    pub url: String,
    pub model: String,
    pub count_regex: Option<String>,
    pub instock_regex: Option<String>,
    pub oos_regex: Option<String>,
    pub window: i64,
}

/// Raw add-watch form. Every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WatchForm {
    pub url: String,
    pub model: String,
    pub count_regex: String,
    pub instock_regex: String,
    pub oos_regex: String,
    pub window: String,
}

impl WatchForm {
    /// Trim everything; `None` when url or model is blank.
    pub fn into_new_watch(self) -> Option<NewWatch> {
        let url = self.url.trim().to_string();
        let model = self.model.trim().to_string();
        if url.is_empty() || model.is_empty() {
            return None;
        }

        let window = self
            .window
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|&w| w > 0)
            .unwrap_or(DEFAULT_WINDOW_MS);

        Some(NewWatch {
            url,
            model,
            count_regex: non_empty(&self.count_regex),
            instock_regex: non_empty(&self.instock_regex),
            oos_regex: non_empty(&self.oos_regex),
            window,
        })
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Delete-watch form; a missing or malformed id is ignored
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteWatchForm {
    pub id: String,
}

impl DeleteWatchForm {
    pub fn watch_id(&self) -> Option<i64> {
        self.id.trim().parse().ok()
    }
}

/// Notification bridge settings (singleton row)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub tg_token: String,
    pub tg_chat_id: String,
}

/// Settings form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SettingsForm {
    pub tg_token: String,
    pub tg_chat_id: String,
}

impl From<SettingsForm> for Settings {
    fn from(form: SettingsForm) -> Self {
        Self {
            tg_token: form.tg_token.trim().to_string(),
            tg_chat_id: form.tg_chat_id.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(url: &str, model: &str, window: &str) -> WatchForm {
        WatchForm {
            url: url.to_string(),
            model: model.to_string(),
            window: window.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_watch_form_trims_and_defaults() {
        let watch = WatchForm {
            count_regex: "  (\\d+) left ".to_string(),
            instock_regex: "   ".to_string(),
            ..form(" https://shop.example/item ", " RTX-5090 ", "")
        }
        .into_new_watch()
        .unwrap();

        assert_eq!(watch.url, "https://shop.example/item");
        assert_eq!(watch.model, "RTX-5090");
        assert_eq!(watch.count_regex.as_deref(), Some("(\\d+) left"));
        assert_eq!(watch.instock_regex, None);
        assert_eq!(watch.oos_regex, None);
        assert_eq!(watch.window, DEFAULT_WINDOW_MS);
    }

    #[test]
    fn test_watch_form_window() {
        let w = |s: &str| form("u", "m", s).into_new_watch().unwrap().window;

        assert_eq!(w("4000"), 4000);
        assert_eq!(w("0"), DEFAULT_WINDOW_MS);
        assert_eq!(w("-5"), DEFAULT_WINDOW_MS);
        assert_eq!(w("abc"), DEFAULT_WINDOW_MS);
    }

    #[test]
    fn test_watch_form_requires_url_and_model() {
        assert!(form("", "model", "").into_new_watch().is_none());
        assert!(form("https://x", "  ", "").into_new_watch().is_none());
    }

    #[test]
    fn test_delete_form_id() {
        assert_eq!(DeleteWatchForm { id: "12".into() }.watch_id(), Some(12));
        assert_eq!(DeleteWatchForm { id: "".into() }.watch_id(), None);
        assert_eq!(DeleteWatchForm { id: "x1".into() }.watch_id(), None);
    }

    #[test]
    fn test_settings_form_trimmed() {
        let settings: Settings = SettingsForm {
            tg_token: " 123:abc ".to_string(),
            tg_chat_id: "\t-100200\n".to_string(),
        }
        .into();

        assert_eq!(settings.tg_token, "123:abc");
        assert_eq!(settings.tg_chat_id, "-100200");
    }
}
