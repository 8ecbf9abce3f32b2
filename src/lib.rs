//! Polls the Practicum homework review API and relays status changes to a
//! Telegram chat.

pub mod config;
pub mod error;
pub mod handlers;
pub mod notifier;
pub mod poll;
pub mod practicum;
pub mod response;
pub mod status;

pub use error::{Error, ErrorKind};
