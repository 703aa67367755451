//! View-level state that drives rendering.
//! A read-only projection of the controller, refreshed by draining the
//! EventBus before each render.

use std::collections::{BTreeMap, HashMap};

use clarity_core::chat::ChatController;
use clarity_types::event::ClarityEvent;
use clarity_types::message::Message;
use clarity_types::price::PriceData;
use clarity_types::session::{ChatSession, SessionSummary};
use clarity_types::theme::Theme;
use serde::Serialize;

/// Id of the transient placeholder; never stored in a session
pub const THINKING_ID: &str = "thinking";

/// Everything the front end needs to draw one frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatView {
    pub session_id: Option<String>,
    pub title: Option<String>,
    pub messages: Vec<Message>,
    /// Price card per AI message id
    pub price_data_map: BTreeMap<String, PriceData>,
    /// Newest price card, shown in the summary panel
    pub latest_price_data: Option<PriceData>,
    pub sessions: Vec<SessionSummary>,
    pub theme: Theme,
    pub is_online: bool,
    pub is_thinking: bool,
    pub status_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_fact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Inputs to one projection, gathered from the controller
pub struct Snapshot {
    pub session: Option<ChatSession>,
    pub pending: bool,
    pub sessions: Vec<SessionSummary>,
    pub theme: Theme,
    pub is_online: bool,
}

impl Snapshot {
    pub fn capture(controller: &ChatController) -> Self {
        let session = controller.current_session();
        let pending = session
            .as_ref()
            .map(|s| controller.is_pending(&s.id))
            .unwrap_or(false);
        Self {
            session,
            pending,
            sessions: controller.summaries(),
            theme: controller.theme(),
            is_online: controller.is_online(),
        }
    }
}

pub struct ViewState {
    pub status_text: String,
    pub last_error: Option<String>,
    /// Latest registry confirmation per session
    verified: HashMap<String, String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            status_text: "Ready".to_string(),
            last_error: None,
            verified: HashMap::new(),
        }
    }

    /// Process events from the EventBus and update view state
    pub fn process_events(&mut self, events: Vec<ClarityEvent>) {
        for event in events {
            match event {
                ClarityEvent::SessionCreated { .. } => {
                    self.last_error = None;
                }
                ClarityEvent::TurnStart { session_id, .. } => {
                    self.verified.remove(&session_id);
                    self.status_text = "Analyzing...".to_string();
                }
                ClarityEvent::VerifiedFact { session_id, fact } => {
                    self.verified.insert(session_id, fact);
                }
                ClarityEvent::ReplyReady { has_price_data, .. } => {
                    self.status_text = if has_price_data {
                        "Price estimate ready".to_string()
                    } else {
                        "Ready".to_string()
                    };
                }
                ClarityEvent::TurnEnd { .. } => {}
                ClarityEvent::SessionDeleted { session_id } => {
                    self.verified.remove(&session_id);
                }
                ClarityEvent::Error { message } => {
                    self.status_text = "Error".to_string();
                    self.last_error = Some(message);
                }
            }
        }
    }

    pub fn project(&self, controller: &ChatController) -> ChatView {
        self.render(Snapshot::capture(controller))
    }

    /// Build the frame. A thinking placeholder is appended while the
    /// current session has a turn in flight.
    pub fn render(&self, snapshot: Snapshot) -> ChatView {
        let Snapshot {
            session,
            pending,
            sessions,
            theme,
            is_online,
        } = snapshot;

        let (session_id, title, mut messages, price_data_map, latest_price_data) = match session {
            Some(s) => {
                let latest = s.latest_price_data().cloned();
                (Some(s.id), Some(s.title), s.messages, s.price_data_map, latest)
            }
            None => (None, None, Vec::new(), BTreeMap::new(), None),
        };

        if pending {
            messages.push(Message::thinking(THINKING_ID));
        }

        let verified_fact = session_id
            .as_ref()
            .and_then(|id| self.verified.get(id))
            .cloned();

        let status_text = if !is_online {
            "Offline".to_string()
        } else if pending {
            "Analyzing...".to_string()
        } else {
            self.status_text.clone()
        };

        ChatView {
            session_id,
            title,
            messages,
            price_data_map,
            latest_price_data,
            sessions,
            theme,
            is_online,
            is_thinking: pending,
            status_text,
            verified_fact,
            last_error: self.last_error.clone(),
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}
