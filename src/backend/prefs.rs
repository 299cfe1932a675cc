//! Small typed key-value store for UI-side persistents: the admin notes map
//! and the pinned-country set. SQLite on native, plain map on wasm. Read
//! once at startup, written on every change. A version bump or corrupt JSON
//! resets to defaults instead of failing startup.

#[cfg(not(target_arch = "wasm32"))]
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

const SCHEMA_VERSION: u32 = 1;
const VERSION_KEY: &str = "schema_version";
const ADMIN_PREFS_KEY: &str = "admin_prefs";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminPrefs {
    /// country -> free-text moderation note
    #[serde(default)]
    pub notes: HashMap<String, String>,
    /// countries kept visible in the pending view after resolution
    #[serde(default)]
    pub pinned: HashSet<String>,
}

#[derive(Clone)]
pub struct PrefsStore {
    #[cfg(not(target_arch = "wasm32"))]
    conn: Arc<Mutex<Connection>>,
    #[cfg(target_arch = "wasm32")]
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl PrefsStore {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new_in_memory() -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn init(conn: Connection) -> Result<Self, Box<dyn std::error::Error>> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS prefs (
                key TEXT PRIMARY KEY,
                value TEXT
            )",
            [],
        )?;

        let stored_version: Option<String> = conn
            .query_row(
                "SELECT value FROM prefs WHERE key = ?1",
                params![VERSION_KEY],
                |row| row.get(0),
            )
            .ok();
        if stored_version != Some(SCHEMA_VERSION.to_string()) {
            // stale or unversioned data: start over
            conn.execute("DELETE FROM prefs", [])?;
            conn.execute(
                "INSERT INTO prefs (key, value) VALUES (?1, ?2)",
                params![VERSION_KEY, SCHEMA_VERSION.to_string()],
            )?;
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new<P: AsRef<Path>>(_path: P) -> Result<Self, Box<dyn std::error::Error>> {
        Self::new_in_memory()
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new_in_memory() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn load_admin_prefs(&self) -> AdminPrefs {
        match self.get(ADMIN_PREFS_KEY) {
            Some(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("admin prefs unreadable, resetting: {e}");
                AdminPrefs::default()
            }),
            None => AdminPrefs::default(),
        }
    }

    pub fn save_admin_prefs(&self, prefs: &AdminPrefs) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string(prefs)?;
        self.put(ADMIN_PREFS_KEY, &json)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn get(&self, key: &str) -> Option<String> {
        let conn = self.conn.lock().ok()?;
        conn.query_row(
            "SELECT value FROM prefs WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .ok()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn put(&self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let conn = self.conn.lock().map_err(|_| "prefs lock poisoned")?;
        conn.execute(
            "INSERT OR REPLACE INTO prefs (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    #[cfg(target_arch = "wasm32")]
    fn put(&self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.entries
            .lock()
            .map_err(|_| "prefs lock poisoned")?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_store_yields_defaults() {
        let store = PrefsStore::new_in_memory().expect("create store");
        assert_eq!(store.load_admin_prefs(), AdminPrefs::default());
    }

    #[test]
    fn test_prefs_round_trip() {
        let store = PrefsStore::new_in_memory().expect("create store");

        let mut prefs = AdminPrefs::default();
        prefs.notes.insert("France".to_string(), "follow up on budget".to_string());
        prefs.pinned.insert("France".to_string());
        store.save_admin_prefs(&prefs).expect("save prefs");

        assert_eq!(store.load_admin_prefs(), prefs);
    }

    #[test]
    fn test_corrupt_value_resets_to_defaults() {
        let store = PrefsStore::new_in_memory().expect("create store");
        store.put(ADMIN_PREFS_KEY, "not json").expect("put raw");
        assert_eq!(store.load_admin_prefs(), AdminPrefs::default());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_version_bump_wipes_stale_data() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.db");

        {
            let conn = Connection::open(&path).expect("open");
            conn.execute(
                "CREATE TABLE IF NOT EXISTS prefs (key TEXT PRIMARY KEY, value TEXT)",
                [],
            )
            .expect("create");
            conn.execute(
                "INSERT INTO prefs (key, value) VALUES (?1, ?2)",
                params![VERSION_KEY, "0"],
            )
            .expect("old version");
            conn.execute(
                "INSERT INTO prefs (key, value) VALUES (?1, ?2)",
                params![ADMIN_PREFS_KEY, r#"{"notes":{"France":"stale"},"pinned":[]}"#],
            )
            .expect("old prefs");
        }

        let store = PrefsStore::new(&path).expect("reopen");
        assert_eq!(store.load_admin_prefs(), AdminPrefs::default());
    }
}
