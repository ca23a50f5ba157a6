//! Token slots persisted as a JSON object in a single file.
//!
//! One CLI invocation is one context, and nothing else writes the file while
//! it runs, so external change notification is not wired up.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::fs;
use std::path::{Path, PathBuf};

use gallery_client::state::storage::TokenStorage;
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Map<String, Value> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Map::new();
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::warn!(path = %self.path.display(), "session file is not a JSON object; ignoring it");
                Map::new()
            }
        }
    }

    fn save(&self, map: &Map<String, Value>) {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = fs::create_dir_all(parent);
            }
        }
        let rendered = match serde_json::to_string_pretty(map) {
            Ok(rendered) => rendered,
            Err(error) => {
                tracing::warn!(%error, "failed to encode session file");
                return;
            }
        };
        if let Err(error) = fs::write(&self.path, rendered) {
            tracing::warn!(path = %self.path.display(), %error, "failed to write session file");
        }
    }
}

impl TokenStorage for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.load().get(key).and_then(Value::as_str).map(ToOwned::to_owned)
    }

    fn write(&self, key: &str, value: &str) {
        let mut map = self.load();
        map.insert(key.to_owned(), Value::String(value.to_owned()));
        self.save(&map);
    }

    fn remove(&self, key: &str) {
        let mut map = self.load();
        if map.remove(key).is_some() {
            self.save(&map);
        }
    }

    fn watch_external(&self, _key: &str, _on_change: Box<dyn Fn()>) {}
}
