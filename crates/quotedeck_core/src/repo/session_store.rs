//! Session-scoped value store.
//!
//! Mirrors the tab-session storage of the original front end: values live
//! exactly as long as the owning process and are never persisted. The
//! controller keeps the most recently shown quote here.

use std::collections::HashMap;

/// In-memory string store with process lifetime.
#[derive(Debug, Default)]
pub struct SessionStore {
    values: HashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}
