//! JS-facing application facade.
//!
//! Owns the controller and the view projection. Every call that touches the
//! network returns a `Promise`; everything else is synchronous. Render data
//! crosses the boundary as JSON strings.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use clarity_core::chat::ChatController;
use clarity_core::event_bus::EventBus;
use clarity_core::orchestrator::Orchestrator;
use clarity_core::ports::StoragePort;
use clarity_core::prefs;
use clarity_core::store::SessionStore;
use clarity_platform::connectivity::NavigatorConnectivity;
use clarity_platform::llm::GeminiProvider;
use clarity_platform::registry::ClinicalTablesRegistry;
use clarity_platform::spawn::BrowserSpawner;
use clarity_platform::storage::auto_detect_storage;
use clarity_types::config::ClarityConfig;
use clarity_types::event::ClarityEvent;
use clarity_types::message::Upload;
use clarity_types::ClarityError;

use crate::state::ViewState;

struct Inner {
    controller: ChatController,
    view: RefCell<ViewState>,
    on_change: RefCell<Option<js_sys::Function>>,
}

impl Inner {
    fn view_json(&self) -> Result<String, ClarityError> {
        let mut view = self.view.borrow_mut();
        view.process_events(self.controller.event_bus().drain());
        Ok(serde_json::to_string(&view.project(&self.controller))?)
    }

    fn notify(&self) {
        let callback = self.on_change.borrow().clone();
        if let Some(cb) = callback {
            if let Err(e) = cb.call0(&JsValue::NULL) {
                log::warn!("on_change callback threw: {:?}", e);
            }
        }
    }

    fn report(&self, e: &ClarityError) {
        self.controller.event_bus().emit(ClarityEvent::Error {
            message: e.to_string(),
        });
    }
}

fn to_js(e: ClarityError) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

/// Build the configuration: defaults, then an optional JSON override.
pub fn load_config(config_json: Option<&str>) -> Result<ClarityConfig, ClarityError> {
    let config = match config_json {
        Some(json) if !json.trim().is_empty() => ClarityConfig::from_json(json)?,
        _ => ClarityConfig::default(),
    };
    if let Err(e) = config.validate() {
        // Turns still run and answer with the "try again" reply
        log::warn!("Configuration incomplete: {}", e);
    }
    Ok(config)
}

#[wasm_bindgen]
pub struct ClarityApp {
    inner: Rc<Inner>,
}

/// Wire adapters into the controller and restore persisted state.
#[wasm_bindgen]
pub async fn boot(config_json: Option<String>) -> Result<ClarityApp, JsValue> {
    let config = load_config(config_json.as_deref()).map_err(to_js)?;

    let storage = auto_detect_storage(&config.storage.backend);
    log::info!("Using {} storage", storage.backend_name());
    let store = SessionStore::load(storage.clone()).await;
    let theme = prefs::load_theme(storage.as_ref()).await.unwrap_or_default();
    log::info!(
        "Restored {} sessions, theme {}",
        store.sessions().len(),
        theme
    );

    let gemini = Rc::new(GeminiProvider::new(config.model.clone()));
    let registry = Rc::new(ClinicalTablesRegistry::new(config.registry.clone()));
    let orchestrator = Orchestrator::new(
        config,
        gemini.clone(),
        registry,
        Rc::new(NavigatorConnectivity),
    );
    let controller = ChatController::new(
        store,
        orchestrator,
        gemini,
        storage,
        EventBus::new(),
        Rc::new(BrowserSpawner),
        theme,
    );

    Ok(ClarityApp {
        inner: Rc::new(Inner {
            controller,
            view: RefCell::new(ViewState::new()),
            on_change: RefCell::new(None),
        }),
    })
}

#[wasm_bindgen]
impl ClarityApp {
    /// Called after every state change that finished asynchronously
    #[wasm_bindgen(js_name = setOnChange)]
    pub fn set_on_change(&self, callback: Option<js_sys::Function>) {
        *self.inner.on_change.borrow_mut() = callback;
    }

    #[wasm_bindgen(js_name = viewJson)]
    pub fn view_json(&self) -> Result<String, JsValue> {
        self.inner.view_json().map_err(to_js)
    }

    #[wasm_bindgen(js_name = sessionsJson)]
    pub fn sessions_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.controller.summaries())
            .map_err(|e| to_js(e.into()))
    }

    /// Resolves to the view JSON once the reply is stored.
    #[wasm_bindgen(js_name = sendMessage)]
    pub fn send_message(
        &self,
        text: String,
        file_name: Option<String>,
        data_url: Option<String>,
    ) -> Promise {
        let inner = self.inner.clone();
        let upload = match (file_name, data_url) {
            (Some(name), Some(url)) => Some(Upload::new(name, url)),
            _ => None,
        };

        future_to_promise(async move {
            let result = inner.controller.send_message(&text, upload).await;
            if let Err(e) = &result {
                log::error!("Turn failed: {}", e);
                inner.report(e);
            }
            inner.notify();
            result.map_err(to_js)?;
            inner.view_json().map(JsValue::from).map_err(to_js)
        })
    }

    /// Resolves to the transcribed text.
    pub fn transcribe(&self, base64_audio: String, mime_type: String) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            match inner.controller.transcribe(&base64_audio, &mime_type).await {
                Ok(text) => Ok(JsValue::from(text)),
                Err(e) => {
                    inner.report(&e);
                    inner.notify();
                    Err(to_js(e))
                }
            }
        })
    }

    #[wasm_bindgen(js_name = selectSession)]
    pub fn select_session(&self, id: &str) -> Result<(), JsValue> {
        self.inner.controller.select_session(id).map_err(to_js)
    }

    #[wasm_bindgen(js_name = newChat)]
    pub fn new_chat(&self) {
        self.inner.controller.new_chat();
    }

    /// `true` when a session was removed.
    #[wasm_bindgen(js_name = deleteSession)]
    pub fn delete_session(&self, id: &str) -> bool {
        self.inner.controller.delete_session(id)
    }

    pub fn theme(&self) -> String {
        self.inner.controller.theme().as_str().to_string()
    }

    /// Resolves to the new theme name.
    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&self) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let theme = inner.controller.toggle_theme().await;
            inner.notify();
            Ok(JsValue::from_str(theme.as_str()))
        })
    }

    #[wasm_bindgen(js_name = shareSummary)]
    pub fn share_summary(&self, session_id: &str) -> Result<String, JsValue> {
        self.inner.controller.share_summary(session_id).map_err(to_js)
    }

    #[wasm_bindgen(js_name = isOnline)]
    pub fn is_online(&self) -> bool {
        self.inner.controller.is_online()
    }
}
