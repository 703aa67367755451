use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::price::PriceData;

/// Titles longer than this are cut and suffixed with `...`
pub const TITLE_MAX_CHARS: usize = 30;

/// A persisted conversation thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    /// AI message id -> price breakdown shown under that message
    #[serde(default)]
    pub price_data_map: BTreeMap<String, PriceData>,
    pub created_at: String,
}

impl ChatSession {
    pub fn new(id: String, seed_text: &str) -> Self {
        Self {
            id,
            title: derive_title(seed_text),
            messages: Vec::new(),
            price_data_map: BTreeMap::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Price data of the most recent AI message that has any
    pub fn latest_price_data(&self) -> Option<&PriceData> {
        self.messages
            .iter()
            .rev()
            .find_map(|m| self.price_data_map.get(&m.id))
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            created_at: self.created_at.clone(),
            message_count: self.messages.len(),
        }
    }

    /// One-line text used when the user shares a conversation.
    pub fn share_summary(&self) -> String {
        let estimate = self
            .latest_price_data()
            .and_then(|d| d.commercial_range())
            .map(|range| format!(" - Estimated: {}", range))
            .unwrap_or_default();
        format!(
            "Health Clarity Check: {}{}. Check fair prices here!",
            self.title, estimate
        )
    }
}

/// Summary of a session for the sidebar listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub message_count: usize,
}

/// Session title from the opening message or file name.
pub fn derive_title(seed_text: &str) -> String {
    if seed_text.chars().count() > TITLE_MAX_CHARS {
        let head: String = seed_text.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        seed_text.to_string()
    }
}
