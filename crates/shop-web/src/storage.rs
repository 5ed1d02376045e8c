//! Browser cart storage

use shop_core::{CartStorage, Result, ShopError};
use wasm_bindgen::JsValue;

/// `window.localStorage`, as seen by the cart controller
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

fn storage_error(e: &JsValue) -> ShopError {
    ShopError::Storage(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

fn local_storage() -> Result<web_sys::Storage> {
    web_sys::window()
        .ok_or_else(|| ShopError::Storage("no window".into()))?
        .local_storage()
        .map_err(|e| storage_error(&e))?
        .ok_or_else(|| ShopError::Storage("localStorage is disabled".into()))
}

impl CartStorage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        local_storage()?.get_item(key).map_err(|e| storage_error(&e))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| storage_error(&e))
    }

    fn remove(&self, key: &str) -> Result<()> {
        local_storage()?.remove_item(key).map_err(|e| storage_error(&e))
    }
}
