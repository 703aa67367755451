pub mod ports;
pub mod event_bus;
pub mod ids;
pub mod store;
pub mod prefs;
pub mod lookup;
pub mod prompt;
pub mod normalize;
pub mod ads;
pub mod orchestrator;
pub mod chat;
