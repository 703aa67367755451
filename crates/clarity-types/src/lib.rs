pub mod message;
pub mod price;
pub mod session;
pub mod reply;
pub mod event;
pub mod config;
pub mod theme;
pub mod error;
pub mod lenient;

#[cfg(test)]
mod tests;

pub use error::ClarityError;
pub type Result<T> = std::result::Result<T, ClarityError>;
