use serde::{Deserialize, Serialize};

use crate::message::Provider;
use crate::price::PriceData;

pub const OFFLINE_RESPONSE: &str =
    "You seem to be offline. Please reconnect to the internet to search for medical pricing.";

pub const UNAVAILABLE_RESPONSE: &str = "I'm currently experiencing high traffic accessing the pricing database. Please try again in a moment.";

/// Structured result of one orchestrated turn, in the shape the model is
/// instructed to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReply {
    #[serde(default)]
    pub is_medical_query: bool,
    #[serde(default)]
    pub conversational_response: String,
    #[serde(default)]
    pub suggested_prompts: Vec<String>,
    #[serde(default)]
    pub providers: Vec<Provider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PriceData>,
}

impl HealthReply {
    pub fn conversational(text: impl Into<String>, prompts: &[&str]) -> Self {
        Self {
            is_medical_query: false,
            conversational_response: text.into(),
            suggested_prompts: prompts.iter().map(|p| p.to_string()).collect(),
            providers: Vec::new(),
            data: None,
        }
    }

    /// Returned without any network call when the client is offline
    pub fn offline() -> Self {
        Self::conversational(OFFLINE_RESPONSE, &[])
    }

    /// Returned when the model call fails
    pub fn unavailable() -> Self {
        Self::conversational(
            UNAVAILABLE_RESPONSE,
            &["Try again", "What is CPT 99213?", "Upload a bill"],
        )
    }

    /// Model text that could not be read as JSON, shown as-is
    pub fn plain_text(raw: impl Into<String>) -> Self {
        Self::conversational(raw, &["Search for a CPT code", "Upload a bill"])
    }

    /// Price data only counts when the model flagged the turn as a medical lookup
    pub fn price_data(&self) -> Option<&PriceData> {
        if self.is_medical_query {
            self.data.as_ref()
        } else {
            None
        }
    }
}
