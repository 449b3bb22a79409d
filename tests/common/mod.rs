#![allow(dead_code)]

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reactor::types::{AvailableReactions, Reaction, Sender};
use reactor::{
    ChatId, ChatInfo, ClientError, Fetched, JobHandle, Manager, MessageId, MessageSnapshot,
    ReactionClient, Settings,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const FRIEND: i64 = 42;
pub const ENEMY: i64 = 666;
pub const STRANGER: i64 = 7;
pub const GROUP: ChatId = -100;

pub const SETTINGS: &str = r#"
msg_queue_size: 4
update_timeout: 5
chats_allowed:
  -100: "Allowed group"
targets:
  42: ["Friend User", Friend]
  666: ["Enemy User", Enemy]
emoticons_for_friends: ["👍"]
emoticons_for_enemies: ["👎"]
"#;

/// Answers from canned results and records every call it gets.
#[derive(Default)]
pub struct ScriptedClient {
    chats: Mutex<HashMap<ChatId, ChatInfo>>,
    reaction_results: Mutex<VecDeque<Result<(), ClientError>>>,
    fetch_results: Mutex<VecDeque<Result<Fetched, ClientError>>>,
    pub reactions: Mutex<Vec<(ChatId, MessageId, Vec<String>)>>,
    pub fetches: AtomicUsize,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_private_chat(self, user_id: i64, first_name: &str) -> Self {
        self.chats.lock().unwrap().insert(
            user_id,
            ChatInfo {
                id: user_id,
                title: None,
                first_name: Some(first_name.to_string()),
                last_name: None,
                available_reactions: None,
            },
        );
        self
    }

    pub fn with_group(self, chat_id: ChatId, available: Option<AvailableReactions>) -> Self {
        self.chats.lock().unwrap().insert(
            chat_id,
            ChatInfo {
                id: chat_id,
                title: Some("Allowed group".to_string()),
                first_name: None,
                last_name: None,
                available_reactions: available,
            },
        );
        self
    }

    pub fn push_reaction_result(&self, result: Result<(), ClientError>) {
        self.reaction_results.lock().unwrap().push_back(result);
    }

    pub fn push_fetch_result(&self, result: Result<Fetched, ClientError>) {
        self.fetch_results.lock().unwrap().push_back(result);
    }

    pub fn reaction_calls(&self) -> Vec<(ChatId, MessageId, Vec<String>)> {
        self.reactions.lock().unwrap().clone()
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReactionClient for ScriptedClient {
    type Peer = ChatId;

    async fn fetch_chat_info(&self, chat_id: ChatId) -> Result<ChatInfo, ClientError> {
        self.chats
            .lock()
            .unwrap()
            .get(&chat_id)
            .cloned()
            .ok_or(ClientError::ChatUnavailable(chat_id))
    }

    async fn resolve_peer(&self, chat_id: ChatId) -> Result<ChatId, ClientError> {
        Ok(chat_id)
    }

    async fn set_reaction(
        &self,
        peer: &ChatId,
        message_id: MessageId,
        emoticons: &[String],
    ) -> Result<(), ClientError> {
        self.reactions
            .lock()
            .unwrap()
            .push((*peer, message_id, emoticons.to_vec()));
        self.reaction_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn fetch_message(
        &self,
        _chat_id: ChatId,
        _message_id: MessageId,
    ) -> Result<Fetched, ClientError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.fetch_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Fetched::Missing))
    }
}

pub fn settings() -> Settings {
    Settings::from_yaml_str(SETTINGS).unwrap()
}

pub fn manager(client: Arc<ScriptedClient>) -> (Manager<ScriptedClient>, JobHandle) {
    let job = JobHandle::new();
    let manager = Manager::new(client, &settings(), job.clone()).with_rng(StdRng::seed_from_u64(7));
    (manager, job)
}

pub fn all_reactions() -> Option<AvailableReactions> {
    Some(AvailableReactions {
        all_are_enabled: true,
        reactions: Vec::new(),
    })
}

pub fn message(chat_id: ChatId, id: MessageId, sender_id: i64) -> MessageSnapshot {
    MessageSnapshot {
        id,
        chat_id: Some(chat_id),
        sender: Some(Sender {
            id: sender_id,
            first_name: Some("Someone".to_string()),
            last_name: None,
        }),
        link: Some(format!("https://t.me/c/100/{}", id)),
        reactions: None,
    }
}

pub fn reacted(mut msg: MessageSnapshot, emoticons: &[&str]) -> MessageSnapshot {
    msg.reactions = Some(emoticons.iter().map(|e| Reaction::emoji(*e)).collect());
    msg
}

pub fn strings(emoticons: &[&str]) -> Vec<String> {
    emoticons.iter().map(|e| e.to_string()).collect()
}
