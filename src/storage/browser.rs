use super::Storage;

/// `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn local_storage() -> Result<web_sys::Storage, String> {
        web_sys::window()
            .ok_or("No window")?
            .local_storage()
            .map_err(|_| "Local storage not supported")?
            .ok_or_else(|| "Local storage not available".to_string())
    }
}

impl Storage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        Self::local_storage()?
            .get_item(key)
            .map_err(|e| format!("Failed to read {key}: {e:?}"))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        Self::local_storage()?
            .set_item(key, value)
            .map_err(|e| format!("Failed to write {key}: {e:?}"))
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        Self::local_storage()?
            .remove_item(key)
            .map_err(|e| format!("Failed to remove {key}: {e:?}"))
    }
}
