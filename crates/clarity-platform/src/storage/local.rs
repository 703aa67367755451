//! `window.localStorage` backend.
//! Values are stored as UTF-8 strings under their key as-is, so the
//! sessions blob stays readable from devtools.

use async_trait::async_trait;
use clarity_core::ports::StoragePort;
use clarity_types::{ClarityError, Result};

pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| ClarityError::Storage("No window object".to_string()))?;

        // Throws in some privacy modes, returns null in others
        let storage = window
            .local_storage()
            .map_err(|e| ClarityError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| ClarityError::Storage("localStorage not available".to_string()))?;

        Ok(Self { storage })
    }
}

#[async_trait(?Send)]
impl StoragePort for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .storage
            .get_item(key)
            .map_err(|e| ClarityError::Storage(format!("{:?}", e)))?;
        Ok(value.map(String::into_bytes))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(value)
            .map_err(|e| ClarityError::Storage(format!("value for {} is not UTF-8: {}", key, e)))?;
        // QuotaExceededError surfaces here
        self.storage
            .set_item(key, text)
            .map_err(|e| ClarityError::Storage(format!("{:?}", e)))
    }

    fn backend_name(&self) -> &str {
        "localStorage"
    }
}
