use std::collections::HashMap;

use crate::config::{Settings, Target};
use crate::emoticons::Friendship;
use crate::types::UserId;

/// Maps tracked senders to the emoticons they deserve.
#[derive(Debug, Clone)]
pub struct FriendshipPolicy {
    targets: HashMap<UserId, Target>,
    for_friends: Vec<String>,
    for_enemies: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict<'a> {
    pub is_friend: bool,
    pub emoticons: &'a [String],
}

impl FriendshipPolicy {
    pub fn new(
        targets: HashMap<UserId, Target>,
        for_friends: Vec<String>,
        for_enemies: Vec<String>,
    ) -> Self {
        Self {
            targets,
            for_friends,
            for_enemies,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.targets.clone(),
            settings.emoticons_for_friends.clone(),
            settings.emoticons_for_enemies.clone(),
        )
    }

    pub fn target(&self, sender_id: UserId) -> Option<&Target> {
        self.targets.get(&sender_id)
    }

    /// `None` means the sender is not tracked and must be skipped.
    pub fn classify(&self, sender_id: UserId) -> Option<Verdict<'_>> {
        let target = self.targets.get(&sender_id)?;
        let is_friend = target.friendship == Friendship::Friend;
        let emoticons = if is_friend {
            &self.for_friends
        } else {
            &self.for_enemies
        };
        Some(Verdict {
            is_friend,
            emoticons,
        })
    }

    /// Emoticons for the sender that the chat also permits, in policy order.
    pub fn response(&self, sender_id: UserId, allowed: &[String]) -> Vec<String> {
        match self.classify(sender_id) {
            Some(verdict) => verdict
                .emoticons
                .iter()
                .filter(|e| allowed.contains(e))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }
}
