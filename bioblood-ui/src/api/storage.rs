//! localStorage-backed session storage

use bioblood::session::{DurableStorage, SessionError, SessionResult};
use wasm_bindgen::JsValue;

/// `window.localStorage`, looked up on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage(&self) -> SessionResult<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| SessionError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(unavailable)?
            .ok_or_else(|| SessionError::Unavailable("localStorage disabled".to_string()))
    }
}

impl DurableStorage for LocalStorage {
    fn get(&self, key: &str) -> SessionResult<Option<String>> {
        self.storage()?.get_item(key).map_err(unavailable)
    }

    fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        // Fails when the quota is exceeded or storage is blocked
        self.storage()?.set_item(key, value).map_err(unavailable)
    }

    fn remove(&self, key: &str) -> SessionResult<()> {
        self.storage()?.remove_item(key).map_err(unavailable)
    }
}

fn unavailable(err: JsValue) -> SessionError {
    SessionError::Unavailable(format!("{:?}", err))
}
