use tracing::{error, info};

use crate::types::MessageSnapshot;

/// Target of the SUCCESS lines; the log file keeps these and every ERROR event.
pub const SUCCESS_TARGET: &str = "reactor::success";

const NO_URL: &str = "NoURL";

pub fn success(message: &str) {
    info!(target: SUCCESS_TARGET, "{}", message);
}

/// Private supergroup links carry a negative id and cannot be opened, so they count as missing.
pub fn link_or_placeholder(link: Option<&str>) -> &str {
    match link {
        Some(link) if !link.is_empty() && !link.contains('-') => link,
        _ => NO_URL,
    }
}

pub fn success_line(
    action: &str,
    recipient: &str,
    chat_title: &str,
    emoticons: &[String],
    link: Option<&str>,
) -> String {
    format!(
        "{}|{}|{}|{}|{}",
        action,
        recipient,
        chat_title,
        emoticons.concat(),
        link_or_placeholder(link)
    )
}

/// Emits the SUCCESS line for a placed reaction, or an ERROR if the message lacks the context for it.
pub fn reaction_placed(
    action: &str,
    message: &MessageSnapshot,
    chat_title: Option<&str>,
    emoticons: &[String],
) -> Option<String> {
    let Some(chat_id) = message.chat_id else {
        error!("Cannot report {} on message {}: it has no chat", action, message.id);
        return None;
    };
    let recipient = message
        .sender
        .as_ref()
        .map(|s| s.display_name())
        .unwrap_or_else(|| "No Name".to_string());
    let title = chat_title.map(str::to_string).unwrap_or_else(|| chat_id.to_string());
    let line = success_line(
        action,
        &recipient,
        &title,
        emoticons,
        message.link.as_deref(),
    );
    success(&line);
    Some(line)
}
