//! In-memory store for the global single type.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::i18n::Locale;

/// The global content for one locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalEntry {
    pub locale: Locale,
    pub attributes: Map<String, Value>,
    pub updated_at: DateTime<Utc>,
}

/// Locale-keyed global entries.
///
/// The lock is only held for map access and never across an await point.
#[derive(Debug, Default)]
pub struct GlobalStore {
    entries: RwLock<HashMap<Locale, GlobalEntry>>,
}

impl GlobalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, locale: &Locale) -> Option<GlobalEntry> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(locale)
            .cloned()
    }

    /// Replace the attributes for `locale`. Returns the stored entry and
    /// whether it was newly created.
    pub fn upsert(
        &self,
        locale: Locale,
        attributes: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> (GlobalEntry, bool) {
        let entry = GlobalEntry {
            locale: locale.clone(),
            attributes,
            updated_at: now,
        };
        let previous = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(locale, entry.clone());
        (entry, previous.is_none())
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::SupportedLocales;
    use serde_json::json;

    fn locale(code: &str) -> Locale {
        SupportedLocales::new(["en", "de"])
            .unwrap()
            .check(code)
            .into_result()
            .unwrap()
    }

    fn attrs(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_upsert_then_find() {
        let store = GlobalStore::new();
        assert!(store.is_empty());
        assert!(store.find(&locale("en")).is_none());

        let now = Utc::now();
        let (entry, created) = store.upsert(locale("en"), attrs(json!({"siteName": "Acme"})), now);
        assert!(created);
        assert_eq!(store.find(&locale("en")), Some(entry));
        assert!(store.find(&locale("de")).is_none());
    }

    #[test]
    fn test_upsert_replaces_existing() {
        let store = GlobalStore::new();
        store.upsert(locale("de"), attrs(json!({"a": 1})), Utc::now());
        let (entry, created) = store.upsert(locale("de"), attrs(json!({"b": 2})), Utc::now());

        assert!(!created);
        assert_eq!(store.len(), 1);
        assert_eq!(entry.attributes, attrs(json!({"b": 2})));
    }

    #[test]
    fn test_entry_serialization() {
        let store = GlobalStore::new();
        let (entry, _) = store.upsert(locale("en"), attrs(json!({"x": true})), Utc::now());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["locale"], "en");
        assert_eq!(json["attributes"]["x"], true);
        assert!(json["updatedAt"].is_string());
    }
}
