//! Detached tasks on the browser's microtask queue.

use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};

/// Runs spawned futures with `wasm_bindgen_futures::spawn_local`.
pub struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}
