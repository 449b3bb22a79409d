use crate::{
    bus::{Event, EventBus},
    client::{Fetched, ReactionClient},
    error::ClientError,
    types::{
        AvailableReactions, ChatInfo, MessageId, MessageKey, MessageSnapshot, Reaction, Sender,
    },
};
use async_trait::async_trait;
use lru::LruCache;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use teloxide::{prelude::*, types::ChatId};
use tracing::{debug, info};

const API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i32>,
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    retry_after: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ApiChat {
    id: i64,
    title: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    available_reactions: Option<Vec<ApiReaction>>,
}

#[derive(Debug, Deserialize)]
struct ApiReaction {
    #[serde(rename = "type")]
    kind: String,
    emoji: Option<String>,
}

impl From<ApiChat> for ChatInfo {
    fn from(chat: ApiChat) -> Self {
        // The Bot API omits the list when every reaction is allowed.
        let available = match chat.available_reactions {
            None => AvailableReactions {
                all_are_enabled: true,
                reactions: Vec::new(),
            },
            Some(reactions) => AvailableReactions {
                all_are_enabled: false,
                reactions: reactions
                    .into_iter()
                    .map(|r| Reaction {
                        emoji: if r.kind == "emoji" { r.emoji } else { None },
                    })
                    .collect(),
            },
        };
        ChatInfo {
            id: chat.id,
            title: chat.title,
            first_name: chat.first_name,
            last_name: chat.last_name,
            available_reactions: Some(available),
        }
    }
}

fn classify_error(
    chat_id: i64,
    error_code: Option<i32>,
    description: &str,
    retry_after: Option<u64>,
) -> ClientError {
    if let Some(secs) = retry_after {
        return ClientError::RateLimited(Duration::from_secs(secs));
    }
    let lowered = description.to_lowercase();
    if lowered.contains("reaction_invalid") || lowered.contains("reaction is invalid") {
        ClientError::ReactionInvalid
    } else if lowered.contains("not_modified") || lowered.contains("not modified") {
        ClientError::NotModified
    } else if lowered.contains("message_id_invalid")
        || lowered.contains("message to react not found")
        || lowered.contains("message not found")
    {
        ClientError::MessageGone
    } else if lowered.contains("chat not found") || error_code == Some(403) {
        ClientError::ChatUnavailable(chat_id)
    } else {
        ClientError::Platform(description.to_string())
    }
}

/// Bot API access for the calls teloxide does not wrap.
///
/// The Bot API cannot fetch a message by id, so messages seen by the
/// interface are kept here (bounded) along with the reactions set on them.
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    seen: Mutex<LruCache<MessageKey, MessageSnapshot>>,
}

impl TelegramClient {
    pub fn new(http: reqwest::Client, token: &str, capacity: NonZeroUsize) -> Self {
        Self {
            http,
            base_url: format!("{}/bot{}", API_URL, token),
            seen: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn record(&self, message: &MessageSnapshot) {
        if let Some(key) = message.key() {
            self.seen.lock().unwrap().put(key, message.clone());
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        chat_id: i64,
        body: Value,
    ) -> Result<T, ClientError> {
        let response = self
            .http
            .post(format!("{}/{}", self.base_url, method))
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Platform(e.to_string()))?;
        let reply: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| ClientError::Platform(e.to_string()))?;

        if reply.ok {
            return reply
                .result
                .ok_or_else(|| ClientError::Platform(format!("{} returned no result", method)));
        }
        let description = reply.description.unwrap_or_default();
        debug!("{} failed: {}", method, description);
        Err(classify_error(
            chat_id,
            reply.error_code,
            &description,
            reply.parameters.and_then(|p| p.retry_after),
        ))
    }
}

#[async_trait]
impl ReactionClient for TelegramClient {
    type Peer = ChatId;

    async fn fetch_chat_info(&self, chat_id: i64) -> Result<ChatInfo, ClientError> {
        let chat: ApiChat = self
            .call("getChat", chat_id, json!({ "chat_id": chat_id }))
            .await?;
        Ok(chat.into())
    }

    async fn resolve_peer(&self, chat_id: i64) -> Result<ChatId, ClientError> {
        Ok(ChatId(chat_id))
    }

    async fn set_reaction(
        &self,
        peer: &ChatId,
        message_id: MessageId,
        emoticons: &[String],
    ) -> Result<(), ClientError> {
        let reaction: Vec<Value> = emoticons
            .iter()
            .map(|e| json!({ "type": "emoji", "emoji": e }))
            .collect();
        let _: bool = self
            .call(
                "setMessageReaction",
                peer.0,
                json!({
                    "chat_id": peer.0,
                    "message_id": message_id,
                    "reaction": reaction,
                }),
            )
            .await?;

        let key = MessageKey::new(peer.0, message_id);
        if let Some(seen) = self.seen.lock().unwrap().get_mut(&key) {
            seen.reactions = Some(emoticons.iter().cloned().map(Reaction::emoji).collect());
        }
        Ok(())
    }

    async fn fetch_message(
        &self,
        chat_id: i64,
        message_id: MessageId,
    ) -> Result<Fetched, ClientError> {
        let key = MessageKey::new(chat_id, message_id);
        let seen = self.seen.lock().unwrap().get(&key).cloned();
        Ok(seen.map(Fetched::Message).unwrap_or(Fetched::Missing))
    }
}

pub fn snapshot_from(msg: &Message) -> MessageSnapshot {
    MessageSnapshot {
        id: msg.id.0,
        chat_id: Some(msg.chat.id.0),
        sender: msg.from().map(|user| Sender {
            id: user.id.0 as i64,
            first_name: Some(user.first_name.clone()),
            last_name: user.last_name.clone(),
        }),
        link: msg.url().map(|url| url.to_string()),
        reactions: None,
    }
}

#[derive(Clone)]
pub struct TelegramInterface {
    bus: Arc<EventBus>,
    client: Arc<TelegramClient>,
}

impl TelegramInterface {
    pub fn new(bus: Arc<EventBus>, client: Arc<TelegramClient>) -> Self {
        Self { bus, client }
    }

    pub async fn run(&self, bot: Bot) -> anyhow::Result<()> {
        let interface = self.clone();

        info!("Starting Telegram bot...");

        let handler = Update::filter_message().endpoint(answer_message);

        Dispatcher::builder(bot, dptree::entry().branch(handler))
            .dependencies(dptree::deps![interface])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}

async fn answer_message(msg: Message, interface: TelegramInterface) -> ResponseResult<()> {
    let snapshot = snapshot_from(&msg);
    interface.client.record(&snapshot);
    interface.bus.publish(Event::Message(snapshot));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_wins_over_description() {
        assert_eq!(
            classify_error(-1, Some(429), "Too Many Requests: retry after 7", Some(7)),
            ClientError::RateLimited(Duration::from_secs(7))
        );
    }

    #[test]
    fn descriptions_map_to_terminal_errors() {
        assert_eq!(
            classify_error(-1, Some(400), "Bad Request: REACTION_INVALID", None),
            ClientError::ReactionInvalid
        );
        assert_eq!(
            classify_error(-1, Some(400), "Bad Request: message to react not found", None),
            ClientError::MessageGone
        );
        assert_eq!(
            classify_error(-1, Some(400), "Bad Request: chat not found", None),
            ClientError::ChatUnavailable(-1)
        );
        assert_eq!(
            classify_error(-1, Some(500), "Internal Server Error", None),
            ClientError::Platform("Internal Server Error".to_string())
        );
    }

    #[test]
    fn omitted_reactions_mean_all_enabled() {
        let chat: ApiChat = serde_json::from_value(json!({
            "id": -100,
            "title": "Group",
        }))
        .unwrap();
        let info = ChatInfo::from(chat);
        assert!(info.available_reactions.unwrap().all_are_enabled);
    }

    #[test]
    fn listed_reactions_keep_only_plain_emoji() {
        let chat: ApiChat = serde_json::from_value(json!({
            "id": -100,
            "title": "Group",
            "available_reactions": [
                { "type": "emoji", "emoji": "👍" },
                { "type": "custom_emoji", "custom_emoji_id": "123" }
            ]
        }))
        .unwrap();
        let available = ChatInfo::from(chat).available_reactions.unwrap();
        assert!(!available.all_are_enabled);
        assert_eq!(
            available.reactions,
            vec![Reaction::emoji("👍"), Reaction { emoji: None }]
        );
    }
}
