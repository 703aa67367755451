use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ClarityError, Result};

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// A single chat message. Never edited after it is appended to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    /// Serialized as an RFC 3339 string, parsed back on load
    pub timestamp: DateTime<Utc>,
    /// Transient placeholder shown while a reply is pending
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_thinking: bool,
    /// Data URL of the uploaded bill image or document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_prompts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers: Option<Vec<Provider>>,
}

impl Message {
    pub fn user(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            is_thinking: false,
            attachment_url: None,
            suggested_prompts: None,
            providers: None,
        }
    }

    pub fn ai(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Ai,
            ..Self::user(id, text)
        }
    }

    /// Placeholder AI message rendered while the model is working
    pub fn thinking(id: impl Into<String>) -> Self {
        Self {
            is_thinking: true,
            ..Self::ai(id, "")
        }
    }

    pub fn with_attachment(mut self, data_url: impl Into<String>) -> Self {
        self.attachment_url = Some(data_url.into());
        self
    }

    pub fn with_suggestions(mut self, prompts: Vec<String>) -> Self {
        self.suggested_prompts = Some(prompts);
        self
    }

    pub fn with_providers(mut self, providers: Vec<Provider>) -> Self {
        self.providers = Some(providers);
        self
    }

    pub fn is_ai(&self) -> bool {
        self.sender == Sender::Ai
    }
}

/// A nearby doctor or facility returned by the model's search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub name: String,
    #[serde(default, deserialize_with = "crate::lenient::string")]
    pub address: String,
    #[serde(
        default,
        deserialize_with = "crate::lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_ad: bool,
}

impl Provider {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            rating: None,
            url: None,
            is_ad: false,
        }
    }

    /// The synthetic native-ad slot mixed into provider listings
    pub fn sponsored() -> Self {
        Self {
            is_ad: true,
            ..Self::new("Sponsored Result", "Ad")
        }
    }
}

/// Inline file payload sent to the model alongside the user's text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub mime_type: String,
    /// Base64 body, without the `data:` prefix
    pub data: String,
}

impl Attachment {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Split a `data:<mime>;base64,<body>` URL into mime type and body.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let (meta, data) = url
            .split_once(',')
            .ok_or_else(|| ClarityError::Attachment("missing ',' in data URL".to_string()))?;
        let mime_type = meta
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .filter(|m| !m.is_empty())
            .ok_or_else(|| ClarityError::Attachment(format!("bad data URL header: {}", meta)))?;
        if data.is_empty() {
            return Err(ClarityError::Attachment("empty data URL body".to_string()));
        }
        Ok(Self::new(mime_type, data))
    }
}

/// A file picked by the user, as handed over by the front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
    pub file_name: String,
    pub data_url: String,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, data_url: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            data_url: data_url.into(),
        }
    }
}
