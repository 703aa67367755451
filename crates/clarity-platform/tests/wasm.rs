//! WASM-target tests for clarity-platform (Node.js runtime).
//!
//! Tests MemoryStorage, the session store on top of it, and connectivity
//! under wasm32-unknown-unknown via `wasm-pack test --node`.
//!
//! localStorage and fetch need a browser and are not covered here.

use wasm_bindgen_test::*;

use clarity_core::ports::{ConnectivityPort, StoragePort};
use clarity_core::prefs;
use clarity_core::store::SessionStore;
use clarity_platform::connectivity::NavigatorConnectivity;
use clarity_platform::spawn::BrowserSpawner;
use clarity_platform::storage::MemoryStorage;
use clarity_types::message::Message;
use clarity_types::theme::Theme;
use futures::channel::oneshot;
use futures::task::LocalSpawnExt;
use std::rc::Rc;

// ─── MemoryStorage Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn memory_storage_backend_name() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn memory_storage_get_missing() {
    let storage = MemoryStorage::new();
    let result = storage.get("nonexistent").await.unwrap();
    assert!(result.is_none());
}

#[wasm_bindgen_test]
async fn memory_storage_overwrite() {
    let storage = MemoryStorage::new();
    storage.set("theme", b"light").await.unwrap();
    storage.set("theme", b"dark").await.unwrap();
    let result = storage.get("theme").await.unwrap();
    assert_eq!(result, Some(b"dark".to_vec()));
}

#[wasm_bindgen_test]
async fn memory_storage_large_data() {
    let storage = MemoryStorage::new();
    let data = vec![b'x'; 1024 * 1024];
    storage.set("big", &data).await.unwrap();
    let result = storage.get("big").await.unwrap().unwrap();
    assert_eq!(result.len(), 1024 * 1024);
}

// ─── Store over MemoryStorage ────────────────────────────

#[wasm_bindgen_test]
async fn session_store_roundtrip() {
    let storage: Rc<dyn StoragePort> = Rc::new(MemoryStorage::new());
    let mut store = SessionStore::new(storage.clone());
    let id = store.create_session("mri brain").id.clone();
    store.append_message(&id, Message::user("1", "mri brain"));
    store.save().await;

    let reloaded = SessionStore::load(storage).await;
    assert_eq!(reloaded.get(&id).unwrap().messages.len(), 1);
}

#[wasm_bindgen_test]
async fn theme_preference_roundtrip() {
    let storage = MemoryStorage::new();
    prefs::save_theme(&storage, Theme::Dark).await;
    assert_eq!(prefs::load_theme(&storage).await, Some(Theme::Dark));
}

// ─── Connectivity ────────────────────────────────────────

#[wasm_bindgen_test]
fn connectivity_without_window_is_online() {
    // Node has no `window`
    assert!(NavigatorConnectivity.is_online());
}

// ─── Spawner Tests ───────────────────────────────────────

#[wasm_bindgen_test]
async fn browser_spawner_runs_detached_save() {
    let storage = Rc::new(MemoryStorage::new());
    let mut store = SessionStore::new(storage.clone());
    let id = store.create_session("mri").id.clone();
    store.append_message(&id, Message::user("1", "mri"));

    let (tx, rx) = oneshot::channel();
    let save = store.save();
    BrowserSpawner
        .spawn_local(async move {
            save.await;
            let _ = tx.send(());
        })
        .unwrap();
    rx.await.unwrap();

    let reloaded = SessionStore::load(storage).await;
    assert_eq!(reloaded.sessions()[0].title, "mri");
}
