use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::client::ReactionClient;
use crate::emoticons;
use crate::error::ClientError;
use crate::types::{full_name, is_private_chat, ChatId, ChatInfo};

/// Per-chat metadata, fetched once and kept for the lifetime of the process.
///
/// Failed lookups are not cached and are retried on the next access.
pub struct ChatMetadataCache<C: ReactionClient> {
    client: Arc<C>,
    info: Mutex<HashMap<ChatId, ChatInfo>>,
    peers: Mutex<HashMap<ChatId, C::Peer>>,
    emoticons: Mutex<HashMap<ChatId, Vec<String>>>,
}

impl<C: ReactionClient> ChatMetadataCache<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            info: Mutex::new(HashMap::new()),
            peers: Mutex::new(HashMap::new()),
            emoticons: Mutex::new(HashMap::new()),
        }
    }

    pub async fn chat_info(&self, chat_id: ChatId) -> Result<ChatInfo, ClientError> {
        if let Some(info) = self.cached_info(chat_id) {
            return Ok(info);
        }
        let fetched = self.client.fetch_chat_info(chat_id).await?;
        debug!("Cached chat info for {}", chat_id);

        // A concurrent fetch may have landed first; the stored value wins.
        let stored = self
            .info
            .lock()
            .unwrap()
            .entry(chat_id)
            .or_insert(fetched)
            .clone();
        Ok(stored)
    }

    pub async fn peer(&self, chat_id: ChatId) -> Result<C::Peer, ClientError> {
        let cached = self.peers.lock().unwrap().get(&chat_id).cloned();
        if let Some(peer) = cached {
            return Ok(peer);
        }
        let resolved = self.client.resolve_peer(chat_id).await?;
        debug!("Resolved peer for {}", chat_id);

        let stored = self
            .peers
            .lock()
            .unwrap()
            .entry(chat_id)
            .or_insert(resolved)
            .clone();
        Ok(stored)
    }

    /// Emoticons that may be placed in the chat. An empty result means
    /// reactions are disabled there.
    pub async fn allowed_emoticons(&self, chat_id: ChatId) -> Result<Vec<String>, ClientError> {
        let cached = self.emoticons.lock().unwrap().get(&chat_id).cloned();
        if let Some(allowed) = cached {
            return Ok(allowed);
        }

        let allowed = if is_private_chat(chat_id) {
            emoticons::catalog()
        } else {
            let info = self.chat_info(chat_id).await?;
            match info.available_reactions {
                None => Vec::new(),
                Some(available) if available.all_are_enabled => emoticons::catalog(),
                Some(available) => available
                    .reactions
                    .into_iter()
                    .filter_map(|r| r.emoji)
                    .filter(|e| !e.is_empty())
                    .collect(),
            }
        };

        let stored = self
            .emoticons
            .lock()
            .unwrap()
            .entry(chat_id)
            .or_insert(allowed)
            .clone();
        Ok(stored)
    }

    /// Human-readable chat name, only for log lines. `None` until the chat info is cached.
    pub fn chat_title(&self, chat_id: ChatId) -> Option<String> {
        let info = self.cached_info(chat_id)?;
        if is_private_chat(chat_id) {
            Some(full_name(info.first_name.as_deref(), info.last_name.as_deref()))
        } else {
            Some(info.title.unwrap_or_else(|| "NoChatName".to_string()))
        }
    }

    pub fn cached_info(&self, chat_id: ChatId) -> Option<ChatInfo> {
        self.info.lock().unwrap().get(&chat_id).cloned()
    }

    pub fn cached_chats(&self) -> usize {
        self.info.lock().unwrap().len()
    }

    pub fn has_peer(&self, chat_id: ChatId) -> bool {
        self.peers.lock().unwrap().contains_key(&chat_id)
    }

    pub fn has_emoticons(&self, chat_id: ChatId) -> bool {
        self.emoticons.lock().unwrap().contains_key(&chat_id)
    }
}
