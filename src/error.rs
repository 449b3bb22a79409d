use std::time::Duration;

use crate::types::ChatId;

/// Failures reported by the messaging platform.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Rate limited, {} s to wait", .0.as_secs())]
    RateLimited(Duration),

    #[error("Reaction is not valid in this chat")]
    ReactionInvalid,

    #[error("Message was not modified")]
    NotModified,

    #[error("Message is no longer addressable")]
    MessageGone,

    #[error("Chat {0} is not found or not accessible")]
    ChatUnavailable(ChatId),

    #[error("Platform error: {0}")]
    Platform(String),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
