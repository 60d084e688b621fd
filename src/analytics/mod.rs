//! Generation history persisted in a key-value store
//!
//! The whole log lives under a single key as a JSON array, oldest entry
//! first, and is read and rewritten on every mutation. Listing reverses it so
//! callers see the newest generation first.

mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore};

use crate::error::{Error, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storage key holding the serialized log
pub const ANALYTICS_KEY: &str = "qr-analytics";

/// One recorded generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsEntry {
    /// Unique identifier
    pub id: String,
    /// Classification label (`WiFi`, `Contact`, `URL`, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Prompt the user typed or assembled
    pub prompt: String,
    /// Encoded payload text
    pub data: String,
    /// Creation time
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEntry {
    /// New entry with a fresh UUID and the current time
    pub fn new(
        kind: impl Into<String>,
        prompt: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: kind.into(),
            prompt: prompt.into(),
            data: data.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Counters shown on the history summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsStats {
    /// Number of entries
    pub total: usize,
    /// Entries labelled `wifi` (case-insensitive)
    pub wifi: usize,
    /// Entries labelled `contact`
    pub contact: usize,
    /// Entries labelled `url`
    pub url: usize,
    /// Entries labelled `text`
    pub text: usize,
    /// Entries created on the current local calendar day
    pub today: usize,
}

impl AnalyticsStats {
    fn from_entries<'a>(
        entries: impl IntoIterator<Item = &'a AnalyticsEntry>,
        today: chrono::NaiveDate,
    ) -> Self {
        let mut stats = Self::default();
        for entry in entries {
            stats.total += 1;
            match entry.kind.to_ascii_lowercase().as_str() {
                "wifi" => stats.wifi += 1,
                "contact" => stats.contact += 1,
                "url" => stats.url += 1,
                "text" => stats.text += 1,
                _ => {}
            }
            if entry.timestamp.with_timezone(&Local).date_naive() == today {
                stats.today += 1;
            }
        }
        stats
    }
}

/// Ordered generation log over an injected store
#[derive(Debug, Clone)]
pub struct AnalyticsLog<S> {
    store: S,
}

impl<S: KeyValueStore> AnalyticsLog<S> {
    /// Log backed by `store`
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Append an entry to the end of the log
    pub fn append(&self, entry: AnalyticsEntry) -> Result<()> {
        let mut entries = self.load()?;
        tracing::debug!(id = %entry.id, kind = %entry.kind, "Recording generation");
        entries.push(entry);
        self.save(&entries)
    }

    /// All entries, newest first
    pub fn list_all(&self) -> Result<Vec<AnalyticsEntry>> {
        let mut entries = self.load()?;
        entries.reverse();
        Ok(entries)
    }

    /// Delete the entry with `id`; returns whether anything was removed
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut entries = self.load()?;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.save(&entries)?;
        Ok(true)
    }

    /// Drop the whole log
    pub fn clear(&self) -> Result<()> {
        self.store.remove(ANALYTICS_KEY)
    }

    /// Per-type and same-day counters
    pub fn stats(&self) -> Result<AnalyticsStats> {
        let entries = self.load()?;
        let today = Local::now().date_naive();
        Ok(AnalyticsStats::from_entries(&entries, today))
    }

    fn load(&self) -> Result<Vec<AnalyticsEntry>> {
        match self.store.get(ANALYTICS_KEY)? {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw).map_err(corrupt_log),
            _ => Ok(Vec::new()),
        }
    }

    fn save(&self, entries: &[AnalyticsEntry]) -> Result<()> {
        let raw = serde_json::to_string(entries)?;
        self.store.set(ANALYTICS_KEY, &raw)
    }
}

fn corrupt_log(e: serde_json::Error) -> Error {
    Error::Storage(format!("Corrupt analytics log '{ANALYTICS_KEY}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn entry(id: &str, kind: &str) -> AnalyticsEntry {
        AnalyticsEntry {
            id: id.to_string(),
            kind: kind.to_string(),
            prompt: "...".to_string(),
            data: "WIFI:...".to_string(),
            timestamp: Utc.with_ymd_and_hms(2020, 3, 14, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn appended_entry_is_listed_first() {
        let log = AnalyticsLog::new(MemoryStore::new());
        log.append(entry("1", "WiFi")).unwrap();
        log.append(entry("2", "URL")).unwrap();

        let listed = log.list_all().unwrap();
        assert_eq!(listed[0].id, "2");
        assert_eq!(listed[1].id, "1");
    }

    #[test]
    fn removed_entry_is_gone() {
        let log = AnalyticsLog::new(MemoryStore::new());
        log.append(entry("1", "WiFi")).unwrap();
        log.append(entry("2", "Text")).unwrap();

        assert!(log.remove("2").unwrap());
        assert!(!log.remove("2").unwrap());

        let ids: Vec<_> = log.list_all().unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["1".to_string()]);
    }

    #[test]
    fn clear_empties_the_log() {
        let log = AnalyticsLog::new(MemoryStore::new());
        log.append(entry("1", "WiFi")).unwrap();
        log.clear().unwrap();
        assert!(log.list_all().unwrap().is_empty());
    }

    #[test]
    fn stored_json_uses_original_field_names() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let log = AnalyticsLog::new(store.clone());
        log.append(entry("1", "WiFi")).unwrap();

        let raw = store.get(ANALYTICS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["type"], "WiFi");
        assert_eq!(value[0]["id"], "1");
        assert!(value[0]["timestamp"].is_string());
    }

    #[test]
    fn corrupt_log_is_storage_error() {
        let store = MemoryStore::new();
        store.set(ANALYTICS_KEY, "{not json").unwrap();
        let log = AnalyticsLog::new(store);
        assert!(matches!(log.list_all(), Err(Error::Storage(_))));
    }

    #[test]
    fn stats_count_types_case_insensitively() {
        let today = Local::now();
        let mut fresh = entry("3", "url");
        fresh.timestamp = today.with_timezone(&Utc);
        let mut old = entry("4", "Event");
        old.timestamp = (today - Duration::days(3)).with_timezone(&Utc);

        let entries = vec![entry("1", "WiFi"), entry("2", "WIFI"), fresh, old];
        let stats = AnalyticsStats::from_entries(&entries, today.date_naive());

        assert_eq!(stats.total, 4);
        assert_eq!(stats.wifi, 2);
        assert_eq!(stats.url, 1);
        assert_eq!(stats.contact, 0);
        assert_eq!(stats.today, 1);
    }

    #[test]
    fn new_entries_get_unique_ids() {
        let a = AnalyticsEntry::new("Text", "hi", "hi");
        let b = AnalyticsEntry::new("Text", "hi", "hi");
        assert_ne!(a.id, b.id);
    }
}
