//! Browser adapters for the clarity-core port traits.
//!
//! - `llm`: Gemini `generateContent` over fetch (generation + transcription)
//! - `registry`: NLM Clinical Tables code search
//! - `storage`: localStorage and in-memory key/value backends
//! - `connectivity`: `navigator.onLine`
//! - `spawn`: detached tasks for background saves

pub mod connectivity;
pub mod llm;
pub mod registry;
pub mod spawn;
pub mod storage;
