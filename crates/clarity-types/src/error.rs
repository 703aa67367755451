use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ClarityError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Attachment error: {0}")]
    Attachment(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("A turn is already in flight for session {0}")]
    TurnInFlight(String),

    #[error("Nothing to send")]
    EmptyInput,

    #[error("Offline")]
    Offline,
}

impl From<serde_json::Error> for ClarityError {
    fn from(e: serde_json::Error) -> Self {
        ClarityError::Serialization(e.to_string())
    }
}
