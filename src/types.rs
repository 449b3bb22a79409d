use serde::{Deserialize, Serialize};

/// Positive ids are private conversations, everything else is a group or channel.
pub type ChatId = i64;
pub type MessageId = i32;
pub type UserId = i64;

pub fn is_private_chat(chat_id: ChatId) -> bool {
    chat_id > 0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageKey {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

impl MessageKey {
    pub fn new(chat_id: ChatId, message_id: MessageId) -> Self {
        Self {
            chat_id,
            message_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Sender {
    /// "First Last" with blank parts dropped, or "No Name".
    pub fn display_name(&self) -> String {
        full_name(self.first_name.as_deref(), self.last_name.as_deref())
    }
}

pub(crate) fn full_name(first: Option<&str>, last: Option<&str>) -> String {
    let joined = format!("{} {}", first.unwrap_or("").trim(), last.unwrap_or("").trim());
    let joined = joined.trim();
    if joined.is_empty() {
        "No Name".to_string()
    } else {
        joined.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// `None` for custom or paid reactions that carry no plain emoticon.
    pub emoji: Option<String>,
}

impl Reaction {
    pub fn emoji(emoji: impl Into<String>) -> Self {
        Self {
            emoji: Some(emoji.into()),
        }
    }
}

/// A message as seen by the engine, either delivered by the inbound stream or fetched back later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSnapshot {
    pub id: MessageId,
    pub chat_id: Option<ChatId>,
    pub sender: Option<Sender>,
    pub link: Option<String>,
    #[serde(default)]
    pub reactions: Option<Vec<Reaction>>,
}

impl MessageSnapshot {
    pub fn key(&self) -> Option<MessageKey> {
        self.chat_id.map(|chat_id| MessageKey::new(chat_id, self.id))
    }

    /// Emoticons currently placed on the message, `None` if it carries no reaction list at all.
    pub fn placed_emoticons(&self) -> Option<Vec<String>> {
        self.reactions.as_ref().map(|reactions| {
            reactions
                .iter()
                .filter_map(|r| r.emoji.clone())
                .filter(|e| !e.is_empty())
                .collect()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableReactions {
    pub all_are_enabled: bool,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatInfo {
    pub id: ChatId,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub available_reactions: Option<AvailableReactions>,
}
