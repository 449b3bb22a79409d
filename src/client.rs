use async_trait::async_trait;

use crate::error::ClientError;
use crate::types::{ChatId, ChatInfo, MessageId, MessageSnapshot};

/// What a message lookup can yield. Only `Message` is usable by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    Message(MessageSnapshot),
    Ambiguous(Vec<MessageSnapshot>),
    Missing,
}

impl Fetched {
    pub fn into_message(self) -> Option<MessageSnapshot> {
        match self {
            Fetched::Message(msg) => Some(msg),
            Fetched::Ambiguous(_) | Fetched::Missing => None,
        }
    }
}

/// The slice of the messaging platform the engine needs.
///
/// Inbound messages do not go through this trait; the interface publishes
/// them on the [`EventBus`](crate::bus::EventBus).
#[async_trait]
pub trait ReactionClient: Send + Sync + 'static {
    /// Addressing token for a chat.
    type Peer: Clone + Send + Sync + 'static;

    async fn fetch_chat_info(&self, chat_id: ChatId) -> Result<ChatInfo, ClientError>;

    async fn resolve_peer(&self, chat_id: ChatId) -> Result<Self::Peer, ClientError>;

    async fn set_reaction(
        &self,
        peer: &Self::Peer,
        message_id: MessageId,
        emoticons: &[String],
    ) -> Result<(), ClientError>;

    async fn fetch_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<Fetched, ClientError>;
}
