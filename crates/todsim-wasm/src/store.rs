use todsim_chat::{KeyValueStore, StoreError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage};

/// `window.localStorage`; absent when the browser disables storage
pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable; chat history will not survive a reload");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StoreError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("localStorage is disabled".to_string()))
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for LocalStorageStore {
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| write_error(key, e))
    }

    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }
}

fn write_error(key: &str, error: JsValue) -> StoreError {
    match error.dyn_into::<DomException>() {
        Ok(ex) if ex.name() == "QuotaExceededError" => StoreError::QuotaExceeded,
        Ok(ex) => StoreError::Write {
            key: key.to_string(),
            reason: ex.message(),
        },
        Err(other) => StoreError::Write {
            key: key.to_string(),
            reason: format!("{:?}", other),
        },
    }
}
