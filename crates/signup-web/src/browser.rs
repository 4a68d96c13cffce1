//! Browser Bindings
//!
//! `sessionStorage` as the durable store and `window.location` as the
//! navigator. Session storage is per tab and survives the round trip to the
//! payment provider.

use signup_core::{DurableStore, Navigator, Result, SignupError, StoreError};
use wasm_bindgen::JsValue;

fn js_error(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// `window.sessionStorage`
pub struct SessionStorage {
    storage: web_sys::Storage,
}

impl SessionStorage {
    pub fn open() -> std::result::Result<Self, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".into()))?;
        let storage = window
            .session_storage()
            .map_err(|e| StoreError::Unavailable(js_error(&e)))?
            .ok_or_else(|| StoreError::Unavailable("sessionStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

impl DurableStore for SessionStorage {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(js_error(&e)))
    }

    fn set(&self, key: &str, value: &str) -> std::result::Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Write {
                key: key.to_string(),
                reason: js_error(&e),
            })
    }

    fn clear(&self, key: &str) -> std::result::Result<(), StoreError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StoreError::Unavailable(js_error(&e)))
    }
}

/// Full-page navigation through `window.location.href`
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn navigate(&self, url: &str) -> Result<()> {
        let window =
            web_sys::window().ok_or_else(|| SignupError::Navigation("no window".into()))?;
        window
            .location()
            .set_href(url)
            .map_err(|e| SignupError::Navigation(js_error(&e)))
    }
}

/// Current `location.search`, including the leading `?`
pub fn current_query() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}
