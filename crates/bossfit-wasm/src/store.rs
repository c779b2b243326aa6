use wasm_bindgen::prelude::*;

use bossfit_algo::{GameSession, GameStore, KvBackend, StoreError, UserSettings};

/// Browser localStorage as the persistence backend
pub struct LocalStorage;

impl KvBackend for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        let storage = web_sys::window()?.local_storage().ok()??;
        storage.get_item(key).ok()?
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| StoreError::Backend("localStorage unavailable".into()))?;
        storage
            .set_item(key, value)
            .map_err(|e| StoreError::Backend(format!("{e:?}")))
    }
}

/// Session log, stats, and settings over localStorage
#[wasm_bindgen]
pub struct GameStorage {
    store: GameStore<LocalStorage>,
}

#[wasm_bindgen]
impl GameStorage {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            store: GameStore::new(LocalStorage),
        }
    }

    /// Saved sessions, newest first
    #[wasm_bindgen]
    pub fn sessions(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.store.sessions()).map_err(JsValue::from)
    }

    /// Lifetime statistics across all saved sessions
    #[wasm_bindgen]
    pub fn stats(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.store.stats()).map_err(JsValue::from)
    }

    #[wasm_bindgen]
    pub fn settings(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.store.settings()).map_err(JsValue::from)
    }

    /// Append a finished session and fold it into the stats
    #[wasm_bindgen]
    pub fn record_session(&mut self, session_js: JsValue) -> Result<(), JsValue> {
        let session: GameSession = serde_wasm_bindgen::from_value(session_js)
            .map_err(|e| JsValue::from_str(&format!("invalid session record: {e}")))?;
        self.store
            .record_session(&session)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn save_settings(&mut self, settings_js: JsValue) -> Result<(), JsValue> {
        let settings: UserSettings = serde_wasm_bindgen::from_value(settings_js)
            .map_err(|e| JsValue::from_str(&format!("invalid settings: {e}")))?;
        self.store
            .save_settings(&settings)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for GameStorage {
    fn default() -> Self {
        Self::new()
    }
}
