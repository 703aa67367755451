//! Chat controller: the turn pipeline.
//!
//! user input → session select/create → user message append → orchestrate
//! → sponsored-slot post-processing → AI message append → price indexing.
//! The store is saved after each append. Saves are handed to the spawner
//! and never awaited by the turn.
//!
//! The controller is shared behind `Rc` and every method takes `&self`, so
//! turns in different sessions can overlap. Turns in the same session are
//! serialized: a second one is rejected while the first is in flight.
//! No `RefCell` borrow is held across an `.await`.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use futures::task::{LocalSpawn, LocalSpawnExt};

use clarity_types::{
    event::ClarityEvent,
    message::{Attachment, Message, Upload},
    reply::HealthReply,
    session::{ChatSession, SessionSummary},
    theme::Theme,
    ClarityError, Result,
};

use crate::ads::insert_sponsored;
use crate::event_bus::EventBus;
use crate::orchestrator::{Orchestrated, Orchestrator};
use crate::ports::{StoragePort, TranscriptionPort};
use crate::prefs;
use crate::store::SessionStore;

/// What one completed turn produced
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub session_id: String,
    pub user_message_id: String,
    /// `None` when the session was deleted while the model was working
    pub ai_message_id: Option<String>,
    pub reply: HealthReply,
}

pub struct ChatController {
    store: Rc<RefCell<SessionStore>>,
    orchestrator: Orchestrator,
    transcriber: Rc<dyn TranscriptionPort>,
    prefs_storage: Rc<dyn StoragePort>,
    event_bus: EventBus,
    spawner: Rc<dyn LocalSpawn>,
    current: RefCell<Option<String>>,
    in_flight: RefCell<HashSet<String>>,
    theme: Cell<Theme>,
    turn_counter: Cell<u64>,
}

/// Clears a session's in-flight mark when the turn ends, however it ends
struct InFlight<'a> {
    set: &'a RefCell<HashSet<String>>,
    session_id: String,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.borrow_mut().remove(&self.session_id);
    }
}

impl ChatController {
    pub fn new(
        store: SessionStore,
        orchestrator: Orchestrator,
        transcriber: Rc<dyn TranscriptionPort>,
        prefs_storage: Rc<dyn StoragePort>,
        event_bus: EventBus,
        spawner: Rc<dyn LocalSpawn>,
        theme: Theme,
    ) -> Self {
        Self {
            store: Rc::new(RefCell::new(store)),
            orchestrator,
            transcriber,
            prefs_storage,
            event_bus,
            spawner,
            current: RefCell::new(None),
            in_flight: RefCell::new(HashSet::new()),
            theme: Cell::new(theme),
            turn_counter: Cell::new(0),
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn is_online(&self) -> bool {
        self.orchestrator.is_online()
    }

    /// Read-only access to the store
    pub fn with_store<R>(&self, f: impl FnOnce(&SessionStore) -> R) -> R {
        f(&self.store.borrow())
    }

    pub fn summaries(&self) -> Vec<SessionSummary> {
        self.store.borrow().summaries()
    }

    pub fn session(&self, id: &str) -> Option<ChatSession> {
        self.store.borrow().get(id).cloned()
    }

    pub fn current_session_id(&self) -> Option<String> {
        self.current.borrow().clone()
    }

    pub fn current_session(&self) -> Option<ChatSession> {
        let id = self.current_session_id()?;
        self.session(&id)
    }

    pub fn is_pending(&self, session_id: &str) -> bool {
        self.in_flight.borrow().contains(session_id)
    }

    pub fn select_session(&self, id: &str) -> Result<()> {
        if !self.store.borrow().contains(id) {
            return Err(ClarityError::SessionNotFound(id.to_string()));
        }
        *self.current.borrow_mut() = Some(id.to_string());
        Ok(())
    }

    /// Deselect; the next message starts a new session
    pub fn new_chat(&self) {
        *self.current.borrow_mut() = None;
    }

    pub fn delete_session(&self, id: &str) -> bool {
        let removed = self.store.borrow_mut().delete_session(id);
        if !removed {
            return false;
        }
        if self.current.borrow().as_deref() == Some(id) {
            *self.current.borrow_mut() = None;
        }
        self.persist();
        self.event_bus.emit(ClarityEvent::SessionDeleted {
            session_id: id.to_string(),
        });
        true
    }

    /// Run one full turn for `text` and an optional uploaded file.
    pub async fn send_message(&self, text: &str, upload: Option<Upload>) -> Result<TurnOutcome> {
        let text = text.trim();
        if text.is_empty() && upload.is_none() {
            return Err(ClarityError::EmptyInput);
        }
        if text.is_empty() && !self.is_online() {
            return Err(ClarityError::Offline);
        }

        let attachment = upload.as_ref().and_then(|u| {
            match Attachment::from_data_url(&u.data_url) {
                Ok(att) => Some(att),
                Err(e) => {
                    log::error!("Could not read {}: {}", u.file_name, e);
                    None
                }
            }
        });

        let session_id = self.ensure_session(text, upload.as_ref());
        if !self.in_flight.borrow_mut().insert(session_id.clone()) {
            return Err(ClarityError::TurnInFlight(session_id));
        }
        let _in_flight = InFlight {
            set: &self.in_flight,
            session_id: session_id.clone(),
        };

        let turn_id = self.turn_counter.get() + 1;
        self.turn_counter.set(turn_id);

        let (user_message_id, history) = {
            let mut store = self.store.borrow_mut();
            let history = store
                .get(&session_id)
                .map(|s| s.messages.clone())
                .unwrap_or_default();
            let id = store.next_id();
            let mut msg = Message::user(id.clone(), text);
            if let Some(u) = &upload {
                msg = msg.with_attachment(u.data_url.clone());
            }
            store.append_message(&session_id, msg);
            (id, history)
        };
        self.persist();

        self.event_bus.emit(ClarityEvent::TurnStart {
            session_id: session_id.clone(),
            turn_id,
        });

        let Orchestrated { reply, fact } = self
            .orchestrator
            .orchestrate(text, &history, attachment.as_ref())
            .await;

        if let Some(fact) = fact {
            self.event_bus.emit(ClarityEvent::VerifiedFact {
                session_id: session_id.clone(),
                fact: fact.to_string(),
            });
        }

        let ai_message_id = self.append_reply(&session_id, &reply);
        if let Some(message_id) = &ai_message_id {
            self.persist();
            self.event_bus.emit(ClarityEvent::ReplyReady {
                session_id: session_id.clone(),
                message_id: message_id.clone(),
                has_price_data: reply.price_data().is_some(),
            });
        }

        self.event_bus.emit(ClarityEvent::TurnEnd {
            session_id: session_id.clone(),
            turn_id,
        });

        Ok(TurnOutcome {
            session_id,
            user_message_id,
            ai_message_id,
            reply,
        })
    }

    /// Transcribe recorded audio for the input box.
    pub async fn transcribe(&self, base64_audio: &str, mime_type: &str) -> Result<String> {
        if !self.is_online() {
            return Err(ClarityError::Offline);
        }
        let audio = Attachment::new(mime_type, base64_audio);
        let text = self.transcriber.transcribe(&audio).await.map_err(|e| {
            log::error!("Transcription failed: {}", e);
            e
        })?;
        Ok(text.trim().to_string())
    }

    pub fn share_summary(&self, session_id: &str) -> Result<String> {
        self.store
            .borrow()
            .get(session_id)
            .map(ChatSession::share_summary)
            .ok_or_else(|| ClarityError::SessionNotFound(session_id.to_string()))
    }

    pub fn theme(&self) -> Theme {
        self.theme.get()
    }

    pub async fn toggle_theme(&self) -> Theme {
        let theme = self.theme.get().toggled();
        self.theme.set(theme);
        prefs::save_theme(self.prefs_storage.as_ref(), theme).await;
        theme
    }

    fn ensure_session(&self, text: &str, upload: Option<&Upload>) -> String {
        if let Some(id) = self.current_session_id() {
            if self.store.borrow().contains(&id) {
                return id;
            }
        }

        let seed = match upload {
            Some(u) => format!("Analysis: {}", u.file_name),
            None => text.to_string(),
        };
        let id = self.store.borrow_mut().create_session(&seed).id.clone();
        *self.current.borrow_mut() = Some(id.clone());
        self.event_bus.emit(ClarityEvent::SessionCreated {
            session_id: id.clone(),
        });
        id
    }

    fn append_reply(&self, session_id: &str, reply: &HealthReply) -> Option<String> {
        let mut store = self.store.borrow_mut();
        if !store.contains(session_id) {
            log::warn!("Session {} deleted mid-turn, dropping reply", session_id);
            return None;
        }

        // Only listings the model actually returned get the sponsored slot
        let providers = if reply.providers.is_empty() {
            Vec::new()
        } else {
            insert_sponsored(reply.providers.clone())
        };

        let id = store.next_id();
        let msg = Message::ai(id.clone(), reply.conversational_response.clone())
            .with_suggestions(reply.suggested_prompts.clone())
            .with_providers(providers);
        store.append_message(session_id, msg);

        if let Some(data) = reply.price_data() {
            store.set_price_data(session_id, &id, data.clone());
        }
        Some(id)
    }

    fn persist(&self) {
        let save = self.store.borrow().save();
        if let Err(e) = self.spawner.spawn_local(save) {
            log::warn!("Could not schedule session save: {}", e);
        }
    }
}
