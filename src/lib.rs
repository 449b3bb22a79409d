//! Places emoji reactions on messages from tracked users and periodically
//! swaps them for a different set.

pub mod bus;
pub mod cache;
pub mod client;
pub mod config;
pub mod emoticons;
pub mod error;
pub mod flood;
pub mod logging;
pub mod manager;
pub mod memory;
pub mod placer;
pub mod policy;
pub mod report;
pub mod scheduler;
pub mod selector;
pub mod types;

#[cfg(feature = "telegram")]
pub mod interface;

pub use client::{Fetched, ReactionClient};
pub use config::Settings;
pub use error::{ClientError, ConfigError};
pub use manager::{Manager, Outcome};
pub use scheduler::{JobHandle, Scheduler};
pub use types::{ChatId, ChatInfo, MessageId, MessageKey, MessageSnapshot, UserId};
