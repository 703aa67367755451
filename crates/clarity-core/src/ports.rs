//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `clarity-core` (pure Rust).
//! Implementations live in `clarity-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use async_trait::async_trait;
use clarity_types::{message::Attachment, price::PriceKind, Result};

// ─── Generative Model Port ───────────────────────────────────

/// Speaker of a history turn, as the model API names it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Model,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    InlineData(Attachment),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: TurnRole,
    pub parts: Vec<Part>,
}

/// One generation call: fixed instruction, prior turns, and the current turn
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub system_instruction: Option<String>,
    pub history: Vec<Turn>,
    pub parts: Vec<Part>,
    /// Let the model ground its answer with web search
    pub enable_search: bool,
}

#[async_trait(?Send)]
pub trait GenerativeModelPort {
    /// Run one generation and return the model's raw text
    async fn generate(&self, req: GenerateRequest) -> Result<String>;
}

#[async_trait(?Send)]
pub trait TranscriptionPort {
    /// Turn recorded audio (base64 + mime type) into plain text
    async fn transcribe(&self, audio: &Attachment) -> Result<String>;
}

// ─── Code Registry Port ──────────────────────────────────────

/// External reference indexes a code can be verified against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeRegistry {
    /// ICD-10-CM diagnosis codes
    Icd10,
    /// HCPCS / CPT procedure codes
    Hcpcs,
    /// National Drug Codes
    Ndc,
}

impl CodeRegistry {
    /// Lookup order: diagnosis, then procedure, then drug
    pub const LOOKUP_ORDER: [CodeRegistry; 3] =
        [CodeRegistry::Icd10, CodeRegistry::Hcpcs, CodeRegistry::Ndc];

    pub fn label(&self) -> &'static str {
        match self {
            CodeRegistry::Icd10 => "ICD-10",
            CodeRegistry::Hcpcs => "HCPCS",
            CodeRegistry::Ndc => "NDC",
        }
    }

    pub fn kind(&self) -> PriceKind {
        match self {
            CodeRegistry::Icd10 => PriceKind::Diagnosis,
            CodeRegistry::Hcpcs => PriceKind::Procedure,
            CodeRegistry::Ndc => PriceKind::Drug,
        }
    }
}

/// First hit returned by a registry search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryMatch {
    pub code: String,
    pub label: String,
}

#[async_trait(?Send)]
pub trait CodeRegistryPort {
    /// Search one registry; `Ok(None)` when it reports no match
    async fn search(&self, registry: CodeRegistry, term: &str) -> Result<Option<RegistryMatch>>;
}

// ─── Storage Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Connectivity Port ───────────────────────────────────────

pub trait ConnectivityPort {
    /// Live online/offline state, read synchronously before any network call
    fn is_online(&self) -> bool;
}
