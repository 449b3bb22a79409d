mod common;

use common::*;
use reactor::types::{AvailableReactions, Reaction};
use reactor::{ClientError, Fetched, MessageKey, Outcome};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn empty_memory_means_nothing_to_rotate() {
    let client = Arc::new(ScriptedClient::new());
    let (manager, _job) = manager(client.clone());

    assert_eq!(manager.rotate().await, Outcome::FilteredOut);
    assert_eq!(client.fetch_calls(), 0);
}

#[tokio::test]
async fn matching_reaction_is_left_alone() {
    let client = Arc::new(ScriptedClient::new().with_group(GROUP, all_reactions()));
    let (manager, _job) = manager(client.clone());
    let key = MessageKey::new(GROUP, 5);
    manager.memory().remember(key);
    manager
        .memory()
        .keep_snapshot(key, reacted(message(GROUP, 5, ENEMY), &["👎"]));

    assert_eq!(manager.rotate().await, Outcome::FilteredOut);
    assert!(client.reaction_calls().is_empty());
}

#[tokio::test]
async fn stale_reaction_is_swapped() {
    let client = Arc::new(ScriptedClient::new().with_group(GROUP, all_reactions()));
    let (manager, _job) = manager(client.clone());
    let key = MessageKey::new(GROUP, 5);
    manager.memory().remember(key);
    manager
        .memory()
        .keep_snapshot(key, reacted(message(GROUP, 5, FRIEND), &["🔥"]));

    assert_eq!(manager.rotate().await, Outcome::Placed(strings(&["👍"])));
    assert_eq!(client.reaction_calls(), vec![(GROUP, 5, strings(&["👍"]))]);

    let updated = manager.memory().snapshot(&key).unwrap();
    assert_eq!(updated.placed_emoticons(), Some(strings(&["👍"])));
}

#[tokio::test]
async fn uncached_candidate_is_fetched_and_kept() {
    let client = Arc::new(ScriptedClient::new().with_private_chat(FRIEND, "Friend"));
    let (manager, _job) = manager(client.clone());
    let key = MessageKey::new(FRIEND, 9);
    manager.memory().remember(key);
    client.push_fetch_result(Ok(Fetched::Message(reacted(
        message(FRIEND, 9, FRIEND),
        &["🎉"],
    ))));

    assert_eq!(manager.rotate().await, Outcome::Placed(strings(&["👍"])));
    assert_eq!(client.fetch_calls(), 1);
    assert!(manager.memory().has_snapshot(&key));
}

#[tokio::test]
async fn ambiguous_fetch_is_not_cached() {
    let client = Arc::new(ScriptedClient::new().with_private_chat(FRIEND, "Friend"));
    let (manager, _job) = manager(client.clone());
    let key = MessageKey::new(FRIEND, 9);
    manager.memory().remember(key);
    let candidate = reacted(message(FRIEND, 9, FRIEND), &["🎉"]);
    client.push_fetch_result(Ok(Fetched::Ambiguous(vec![candidate.clone(), candidate])));

    assert_eq!(manager.rotate().await, Outcome::FilteredOut);
    assert!(!manager.memory().has_snapshot(&key));
    assert!(client.reaction_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn fetch_waits_out_rate_limits() {
    let client = Arc::new(ScriptedClient::new().with_private_chat(FRIEND, "Friend"));
    let (manager, job) = manager(client.clone());
    manager.memory().remember(MessageKey::new(FRIEND, 9));
    client.push_fetch_result(Err(ClientError::RateLimited(Duration::from_secs(2))));
    client.push_fetch_result(Ok(Fetched::Message(reacted(
        message(FRIEND, 9, FRIEND),
        &["🎉"],
    ))));

    assert_eq!(manager.rotate().await, Outcome::Placed(strings(&["👍"])));
    assert_eq!(client.fetch_calls(), 2);
    assert!(!job.is_paused());
}

#[tokio::test]
async fn message_without_reactions_is_skipped() {
    let client = Arc::new(ScriptedClient::new().with_private_chat(FRIEND, "Friend"));
    let (manager, _job) = manager(client.clone());
    let key = MessageKey::new(FRIEND, 2);
    manager.memory().remember(key);
    manager.memory().keep_snapshot(key, message(FRIEND, 2, FRIEND));

    assert_eq!(manager.rotate().await, Outcome::FilteredOut);
    assert!(client.reaction_calls().is_empty());
}

#[tokio::test]
async fn chat_with_a_single_reaction_is_skipped() {
    let client = Arc::new(ScriptedClient::new().with_group(
        GROUP,
        Some(AvailableReactions {
            all_are_enabled: false,
            reactions: vec![Reaction::emoji("👍")],
        }),
    ));
    let (manager, _job) = manager(client.clone());
    let key = MessageKey::new(GROUP, 2);
    manager.memory().remember(key);
    manager
        .memory()
        .keep_snapshot(key, reacted(message(GROUP, 2, FRIEND), &["🔥"]));

    assert_eq!(manager.rotate().await, Outcome::FilteredOut);
    assert!(client.reaction_calls().is_empty());
}

#[tokio::test]
async fn vanished_candidate_is_forgotten() {
    let client = Arc::new(ScriptedClient::new().with_private_chat(FRIEND, "Friend"));
    let (manager, _job) = manager(client.clone());
    let key = MessageKey::new(FRIEND, 4);
    manager.memory().remember(key);
    manager
        .memory()
        .keep_snapshot(key, reacted(message(FRIEND, 4, FRIEND), &["🔥"]));
    client.push_reaction_result(Err(ClientError::MessageGone));

    assert_eq!(
        manager.rotate().await,
        Outcome::Rejected(ClientError::MessageGone)
    );
    assert!(!manager.memory().contains(&key));
    assert!(!manager.memory().has_snapshot(&key));
}

#[tokio::test]
async fn rotation_swallows_platform_errors() {
    let client = Arc::new(ScriptedClient::new());
    let (manager, _job) = manager(client.clone());
    let key = MessageKey::new(GROUP, 4);
    manager.memory().remember(key);
    manager
        .memory()
        .keep_snapshot(key, reacted(message(GROUP, 4, FRIEND), &["🔥"]));

    // No chat info is scripted for the group.
    assert_eq!(
        manager.rotate().await,
        Outcome::Rejected(ClientError::ChatUnavailable(GROUP))
    );
    assert!(manager.memory().contains(&key));
}
