//! Local Persistence
//!
//! A small store over a string key-value backend (browser `localStorage` in
//! production, an in-memory map on the host). Three fixed keys hold the
//! session log, the aggregate statistics, and the player settings.
//!
//! Reads never fail: a missing key, unparseable JSON, or a backend fault
//! yields the documented default so a wiped or corrupt store can never
//! keep the game from launching. Writes surface errors, but callers treat
//! them as degraded persistence, not as fatal.

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::session::{GameSession, UserSettings, UserStats};

// ==================== Keys and limits ====================

/// Key holding the session log, most recent first
pub const SESSIONS_KEY: &str = "fitness-boss-sessions";

/// Key holding the aggregate statistics
pub const STATS_KEY: &str = "fitness-boss-stats";

/// Key holding the player settings
pub const SETTINGS_KEY: &str = "fitness-boss-settings";

/// Maximum number of sessions retained in the log
pub const SESSION_LOG_LIMIT: usize = 100;

// ==================== Backend abstraction ====================

/// Store failure
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected a write (for `localStorage`, typically quota)
    #[error("backend write failed: {0}")]
    Backend(String),
    /// A value could not be serialized
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key-value backend.
///
/// `get` has no error channel: a backend that cannot read reports the key
/// as absent, which the store resolves to defaults.
pub trait KvBackend {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory backend for native use and tests
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    entries: std::collections::HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ==================== Game store ====================

/// Typed store for sessions, statistics, and settings
#[derive(Clone, Debug)]
pub struct GameStore<B> {
    backend: B,
}

impl GameStore<MemoryBackend> {
    /// Store over a fresh in-memory backend
    pub fn in_memory() -> GameStore<MemoryBackend> {
        GameStore::new(MemoryBackend::new())
    }
}

impl<B: KvBackend> GameStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The session log, most recent first. Empty when nothing is stored
    /// or the stored value is unreadable.
    pub fn sessions(&self) -> Vec<GameSession> {
        self.read_or_default(SESSIONS_KEY)
    }

    /// Aggregate statistics; all-zero when absent or unreadable
    pub fn stats(&self) -> UserStats {
        self.read_or_default(STATS_KEY)
    }

    /// Player settings; defaults when absent or unreadable
    pub fn settings(&self) -> UserSettings {
        self.read_or_default(SETTINGS_KEY)
    }

    /// Record a finished session: prepend it to the log (evicting past the
    /// retention limit) and fold it into the statistics.
    ///
    /// Both writes are attempted in order. If the log write succeeds but
    /// the stats write fails, the aggregates lag the log until the next
    /// successful record; the mismatch is logged and the error returned.
    pub fn record_session(&mut self, session: &GameSession) -> Result<(), StoreError> {
        let mut sessions = self.sessions();
        sessions.insert(0, session.clone());
        sessions.truncate(SESSION_LOG_LIMIT);
        self.write(SESSIONS_KEY, &sessions)?;

        let mut stats = self.stats();
        stats.apply(session);
        if let Err(err) = self.write(STATS_KEY, &stats) {
            warn!("session {} logged but stats update failed: {err}", session.id);
            return Err(err);
        }

        Ok(())
    }

    pub fn save_settings(&mut self, settings: &UserSettings) -> Result<(), StoreError> {
        self.write(SETTINGS_KEY, settings)
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.backend.get(key) {
            None => T::default(),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(err) => {
                    warn!("discarding unreadable value under '{key}': {err}");
                    T::default()
                }
            },
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, &raw)
    }
}

// ==================== Tests ====================
