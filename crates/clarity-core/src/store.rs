//! Session store, the single owner of every chat session.
//!
//! Sessions are kept most-recent-first and written through to a
//! `StoragePort` after each mutation. Reads fall back to an empty
//! collection; writes log and swallow failures. The chat keeps working
//! whether or not storage does.

use std::future::Future;
use std::rc::Rc;

use clarity_types::{
    message::Message,
    price::PriceData,
    session::{ChatSession, SessionSummary},
};

use crate::ids::IdSource;
use crate::ports::StoragePort;

pub const SESSIONS_KEY: &str = "clarity_sessions";

pub struct SessionStore {
    sessions: Vec<ChatSession>,
    storage: Rc<dyn StoragePort>,
    ids: IdSource,
}

impl SessionStore {
    /// Empty store backed by `storage`; nothing is read
    pub fn new(storage: Rc<dyn StoragePort>) -> Self {
        Self {
            sessions: Vec::new(),
            storage,
            ids: IdSource::new(),
        }
    }

    /// Rehydrate from storage. Any failure yields an empty store.
    pub async fn load(storage: Rc<dyn StoragePort>) -> Self {
        let sessions = match storage.get(SESSIONS_KEY).await {
            Ok(Some(blob)) => match serde_json::from_slice::<Vec<ChatSession>>(&blob) {
                Ok(sessions) => sessions,
                Err(e) => {
                    log::warn!("Saved sessions unreadable ({}), starting empty", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Session storage unavailable ({}), starting empty", e);
                Vec::new()
            }
        };

        let store = Self {
            sessions,
            storage,
            ids: IdSource::new(),
        };
        for session in &store.sessions {
            store.ids.observe(&session.id);
            for msg in &session.messages {
                store.ids.observe(&msg.id);
            }
        }
        log::info!(
            "Loaded {} session(s) from {}",
            store.sessions.len(),
            store.storage.backend_name()
        );
        store
    }

    /// Serialize the whole collection and write it out.
    ///
    /// The returned future owns everything it needs, so callers can await
    /// it or spawn it detached.
    pub fn save(&self) -> impl Future<Output = ()> + 'static {
        let storage = self.storage.clone();
        let blob = serde_json::to_vec(&self.sessions);
        async move {
            match blob {
                Ok(bytes) => {
                    if let Err(e) = storage.set(SESSIONS_KEY, &bytes).await {
                        log::warn!("Failed to persist sessions: {}", e);
                    }
                }
                Err(e) => log::warn!("Failed to serialize sessions: {}", e),
            }
        }
    }

    /// Fresh time-based id for a session or message
    pub fn next_id(&self) -> String {
        self.ids.next_id()
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn get(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn summaries(&self) -> Vec<SessionSummary> {
        self.sessions.iter().map(ChatSession::summary).collect()
    }

    /// Create a session titled after `seed_text` and put it first.
    pub fn create_session(&mut self, seed_text: &str) -> &ChatSession {
        let session = ChatSession::new(self.ids.next_id(), seed_text);
        log::info!("Created session {} ({})", session.id, session.title);
        self.sessions.insert(0, session);
        &self.sessions[0]
    }

    /// Append to the matching session. Returns false if there is none.
    pub fn append_message(&mut self, session_id: &str, message: Message) -> bool {
        match self.get_mut(session_id) {
            Some(session) => {
                session.messages.push(message);
                true
            }
            None => {
                log::warn!("append_message: no session {}", session_id);
                false
            }
        }
    }

    /// Attach price data to one AI message, leaving other entries alone.
    /// Refused unless the message exists in that session and is from the AI.
    pub fn set_price_data(&mut self, session_id: &str, message_id: &str, data: PriceData) -> bool {
        let Some(session) = self.get_mut(session_id) else {
            log::warn!("set_price_data: no session {}", session_id);
            return false;
        };
        if !session.message(message_id).is_some_and(Message::is_ai) {
            log::warn!(
                "set_price_data: {} is not an AI message of session {}",
                message_id,
                session_id
            );
            return false;
        }
        session.price_data_map.insert(message_id.to_string(), data);
        true
    }

    /// Remove a session together with its messages and price data.
    pub fn delete_session(&mut self, id: &str) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        let removed = self.sessions.len() != before;
        if removed {
            log::info!("Deleted session {}", id);
        }
        removed
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut ChatSession> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }
}
