use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

use crate::cache::ChatMetadataCache;
use crate::client::ReactionClient;
use crate::config::Settings;
use crate::error::ClientError;
use crate::flood::FloodControl;
use crate::memory::MessageMemory;
use crate::placer::ReactionPlacer;
use crate::policy::FriendshipPolicy;
use crate::report;
use crate::scheduler::JobHandle;
use crate::selector::EmoticonSelector;
use crate::types::{is_private_chat, ChatId, MessageKey, MessageSnapshot, Reaction};

/// What happened to a message or a rotation tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A guard did not hold; nothing was attempted.
    FilteredOut,
    /// The reaction set went through.
    Placed(Vec<String>),
    /// The platform turned the attempt down.
    Rejected(ClientError),
}

/// Decides whether and how to react, for inbound messages and for rotation ticks.
pub struct Manager<C: ReactionClient> {
    client: Arc<C>,
    policy: FriendshipPolicy,
    selector: EmoticonSelector,
    allowed_chats: HashSet<ChatId>,
    chats: ChatMetadataCache<C>,
    memory: MessageMemory,
    placer: ReactionPlacer<C>,
    flood: FloodControl,
    rng: Mutex<StdRng>,
}

impl<C: ReactionClient> Manager<C> {
    pub fn new(client: Arc<C>, settings: &Settings, job: JobHandle) -> Self {
        let flood = FloodControl::new(job);
        Self {
            policy: FriendshipPolicy::from_settings(settings),
            selector: EmoticonSelector::for_account(settings.premium),
            allowed_chats: settings.allowed_chats(),
            chats: ChatMetadataCache::new(client.clone()),
            memory: MessageMemory::new(settings.msg_queue_size),
            placer: ReactionPlacer::new(client.clone(), flood.clone()),
            flood,
            client,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_rng(self, rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            ..self
        }
    }

    pub fn chats(&self) -> &ChatMetadataCache<C> {
        &self.chats
    }

    pub fn memory(&self) -> &MessageMemory {
        &self.memory
    }

    pub fn selector(&self) -> EmoticonSelector {
        self.selector
    }

    fn is_allowed_chat(&self, chat_id: ChatId) -> bool {
        is_private_chat(chat_id) || self.allowed_chats.contains(&chat_id)
    }

    /// Reacts to a message from a tracked sender.
    ///
    /// Platform errors other than the reaction rejections are returned as `Err`.
    pub async fn on_message(&self, message: &MessageSnapshot) -> Result<Outcome, ClientError> {
        let Some(sender) = message.sender.as_ref() else {
            return Ok(Outcome::FilteredOut);
        };
        let Some(chat_id) = message.chat_id else {
            return Ok(Outcome::FilteredOut);
        };
        if !self.is_allowed_chat(chat_id) || self.policy.target(sender.id).is_none() {
            return Ok(Outcome::FilteredOut);
        }

        self.chats.chat_info(chat_id).await?;
        let allowed = self.chats.allowed_emoticons(chat_id).await?;
        if allowed.is_empty() {
            return Ok(Outcome::FilteredOut);
        }
        let response = self.policy.response(sender.id, &allowed);
        if response.is_empty() {
            return Ok(Outcome::FilteredOut);
        }
        let picked = {
            let mut rng = self.rng.lock().unwrap();
            self.selector.pick(&response, &mut *rng)
        };
        if picked.is_empty() {
            return Ok(Outcome::FilteredOut);
        }

        let peer = self.chats.peer(chat_id).await?;
        let key = MessageKey::new(chat_id, message.id);
        match self.placer.place(&peer, message.id, &picked).await {
            Ok(()) => {
                self.memory.remember(key);
                report::reaction_placed(
                    "respond",
                    message,
                    self.chats.chat_title(chat_id).as_deref(),
                    &picked,
                );
                Ok(Outcome::Placed(picked))
            }
            Err(ClientError::MessageGone) => {
                error!("Message {} in chat {} is gone before the reaction", message.id, chat_id);
                self.memory.forget(&key);
                Ok(Outcome::Rejected(ClientError::MessageGone))
            }
            Err(err @ (ClientError::ReactionInvalid | ClientError::NotModified)) => {
                // Kept so a later rotation can try again.
                self.memory.remember(key);
                Ok(Outcome::Rejected(err))
            }
            Err(err) => Err(err),
        }
    }

    /// Swaps the reactions on a random remembered message for a different set.
    /// Failures are swallowed.
    pub async fn rotate(&self) -> Outcome {
        match self.try_rotate().await {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!("Rotation skipped: {}", err);
                Outcome::Rejected(err)
            }
        }
    }

    async fn try_rotate(&self) -> Result<Outcome, ClientError> {
        if self.memory.is_empty() {
            return Ok(Outcome::FilteredOut);
        }
        let Some(candidate) = self.sample_candidate().await? else {
            return Ok(Outcome::FilteredOut);
        };
        let Some(chat_id) = candidate.chat_id else {
            return Ok(Outcome::FilteredOut);
        };
        let allowed = self.chats.allowed_emoticons(chat_id).await?;
        if allowed.len() < 2 {
            return Ok(Outcome::FilteredOut);
        }
        let Some(sender_id) = candidate.sender.as_ref().map(|s| s.id) else {
            return Ok(Outcome::FilteredOut);
        };
        let response = self.policy.response(sender_id, &allowed);
        if response.is_empty() {
            return Ok(Outcome::FilteredOut);
        }
        let current = match candidate.placed_emoticons() {
            Some(current) if !current.is_empty() => current,
            _ => return Ok(Outcome::FilteredOut),
        };
        if response.iter().all(|e| current.contains(e)) {
            return Ok(Outcome::FilteredOut);
        }
        let picked = {
            let mut rng = self.rng.lock().unwrap();
            self.selector.pick_different(&response, &current, &mut *rng)
        };
        if picked.is_empty() {
            return Ok(Outcome::FilteredOut);
        }

        let peer = self.chats.peer(chat_id).await?;
        let key = MessageKey::new(chat_id, candidate.id);
        match self.placer.place(&peer, candidate.id, &picked).await {
            Ok(()) => {
                let updated = MessageSnapshot {
                    reactions: Some(picked.iter().cloned().map(Reaction::emoji).collect()),
                    ..candidate
                };
                report::reaction_placed(
                    "update",
                    &updated,
                    self.chats.chat_title(chat_id).as_deref(),
                    &picked,
                );
                self.memory.keep_snapshot(key, updated);
                Ok(Outcome::Placed(picked))
            }
            Err(ClientError::MessageGone) => {
                self.memory.forget(&key);
                Ok(Outcome::Rejected(ClientError::MessageGone))
            }
            Err(err) => Ok(Outcome::Rejected(err)),
        }
    }

    /// A random remembered message, from the snapshot cache or fetched anew.
    async fn sample_candidate(&self) -> Result<Option<MessageSnapshot>, ClientError> {
        let key = {
            let mut rng = self.rng.lock().unwrap();
            self.memory.random_key(&mut *rng)
        };
        let Some(key) = key else {
            return Ok(None);
        };
        if let Some(snapshot) = self.memory.snapshot(&key) {
            return Ok(Some(snapshot));
        }

        let fetched = loop {
            match self.client.fetch_message(key.chat_id, key.message_id).await {
                Ok(fetched) => break fetched,
                Err(ClientError::RateLimited(wait)) => {
                    self.flood.wait_out(wait, "message fetch").await;
                }
                Err(err) => return Err(err),
            }
        };
        let Some(message) = fetched.into_message() else {
            return Ok(None);
        };
        self.memory.keep_snapshot(key, message.clone());
        Ok(Some(message))
    }
}
