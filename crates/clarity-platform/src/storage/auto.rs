//! Pick the storage backend from configuration.
//!
//! Priority for `Auto`: localStorage → Memory (fallback)

use std::rc::Rc;
use clarity_core::ports::StoragePort;
use clarity_types::config::StorageBackendType;
use super::{LocalStorage, MemoryStorage};

/// Open the configured backend. Never fails: an unavailable localStorage
/// degrades to memory so the app still works for the current page.
pub fn auto_detect_storage(backend: &StorageBackendType) -> Rc<dyn StoragePort> {
    if *backend == StorageBackendType::Memory {
        log::info!("Storage backend: memory (configured)");
        return Rc::new(MemoryStorage::new());
    }

    match LocalStorage::open() {
        Ok(local) => {
            log::info!("Storage backend: localStorage");
            Rc::new(local)
        }
        Err(e) => {
            log::warn!("localStorage unavailable ({}), falling back to memory", e);
            Rc::new(MemoryStorage::new())
        }
    }
}
