use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use crate::emoticons::{self, Friendship};
use crate::error::ConfigError;
use crate::types::{ChatId, UserId};

const MIN_UPDATE_TIMEOUT: u64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, Friendship)")]
pub struct Target {
    pub name: String,
    pub friendship: Friendship,
}

impl From<(String, Friendship)> for Target {
    fn from((name, friendship): (String, Friendship)) -> Self {
        Self { name, friendship }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Capacity of the reacted-message memory.
    pub msg_queue_size: NonZeroUsize,
    /// Rotation interval in seconds.
    pub update_timeout: u64,
    #[serde(default)]
    pub update_jitter: u64,
    /// Premium accounts may place up to three reactions at once.
    #[serde(default)]
    pub premium: bool,
    #[serde(default)]
    pub chats_allowed: Option<HashMap<ChatId, String>>,
    pub targets: HashMap<UserId, Target>,
    pub emoticons_for_enemies: Vec<String>,
    pub emoticons_for_friends: Vec<String>,
}

impl Settings {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_yaml::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.update_timeout < MIN_UPDATE_TIMEOUT {
            return Err(ConfigError::Invalid(format!(
                "`update_timeout` should be at least {} s",
                MIN_UPDATE_TIMEOUT
            )));
        }
        if self.targets.is_empty() {
            return Err(ConfigError::Invalid(
                "`targets` should not be empty".to_string(),
            ));
        }
        for (field, set) in [
            ("emoticons_for_enemies", &self.emoticons_for_enemies),
            ("emoticons_for_friends", &self.emoticons_for_friends),
        ] {
            if set.is_empty() {
                return Err(ConfigError::Invalid(format!("`{}` should not be empty", field)));
            }
            if let Some(bad) = set.iter().find(|e| !emoticons::is_valid(e)) {
                return Err(ConfigError::Invalid(format!(
                    "{} in `{}` is not valid",
                    bad, field
                )));
            }
        }
        Ok(())
    }

    pub fn allowed_chats(&self) -> HashSet<ChatId> {
        self.chats_allowed
            .as_ref()
            .map(|chats| chats.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_timeout)
    }

    pub fn update_jitter(&self) -> Duration {
        Duration::from_secs(self.update_jitter)
    }
}
