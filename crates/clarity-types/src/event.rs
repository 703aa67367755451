use serde::{Deserialize, Serialize};

/// Events emitted by the chat controller.
/// The view layer drains these to refresh its projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClarityEvent {
    /// A new session was created for the first message of a conversation
    SessionCreated { session_id: String },

    /// The user's message was stored and the model call is starting
    TurnStart { session_id: String, turn_id: u64 },

    /// The input was confirmed against a code registry
    VerifiedFact { session_id: String, fact: String },

    /// The AI message was appended
    ReplyReady { session_id: String, message_id: String, has_price_data: bool },

    /// The turn finished, successfully or not
    TurnEnd { session_id: String, turn_id: u64 },

    SessionDeleted { session_id: String },

    /// Something went wrong that the user should know about
    Error { message: String },
}
