//! Key/value persistence for player data
//!
//! JSON blobs keyed by string. LocalStorage backs the store on web; native
//! builds keep an in-memory map per thread so sessions and tests behave
//! the same way without touching the filesystem.

pub mod profile;

pub use profile::{Inventory, PlayerProfile};

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

/// Raw read of `key` (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn read(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

/// Raw write of `key`; false if storage is unavailable (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn write(key: &str, value: &str) -> bool {
    match local_storage() {
        Some(storage) => storage.set_item(key, value).is_ok(),
        None => false,
    }
}

#[cfg(not(target_arch = "wasm32"))]
thread_local! {
    static MEMORY: std::cell::RefCell<std::collections::HashMap<String, String>> =
        std::cell::RefCell::new(std::collections::HashMap::new());
}

/// Native in-memory store
#[cfg(not(target_arch = "wasm32"))]
pub fn read(key: &str) -> Option<String> {
    MEMORY.with(|m| m.borrow().get(key).cloned())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn write(key: &str, value: &str) -> bool {
    MEMORY.with(|m| m.borrow_mut().insert(key.to_string(), value.to_string()));
    true
}

/// Load and decode `key`. Missing or corrupt records yield `None`; corrupt
/// ones are logged.
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = read(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Discarding corrupt record '{key}': {err}");
            None
        }
    }
}

/// Encode and store `value` under `key`. Failures are logged, never fatal.
pub fn save_json<T: Serialize>(key: &str, value: &T) -> bool {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(err) => {
            log::warn!("Could not encode '{key}': {err}");
            return false;
        }
    };
    let saved = write(key, &json);
    if !saved {
        log::warn!("Storage unavailable, '{key}' not saved");
    }
    saved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        assert!(save_json("test_numbers", &vec![1u32, 2, 3]));
        assert_eq!(load_json::<Vec<u32>>("test_numbers"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_missing_and_corrupt_records() {
        assert_eq!(load_json::<u32>("test_missing"), None);
        write("test_corrupt", "{not json");
        assert_eq!(load_json::<u32>("test_corrupt"), None);
    }
}
