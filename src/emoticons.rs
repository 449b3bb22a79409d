use serde::{Deserialize, Serialize};

/// Standard reactions accepted by Telegram in chats that allow every reaction.
pub const VALID_EMOTICONS: &[&str] = &[
    "👍",
    "👎",
    "❤",
    "🔥",
    "🥰",
    "👏",
    "😁",
    "🤔",
    "🤯",
    "😱",
    "🤬",
    "😢",
    "🎉",
    "🤩",
    "🤮",
    "💩",
    "🙏",
    "👌",
    "🕊",
    "🤡",
    "🥱",
    "🥴",
    "😍",
    "🐳",
    "\u{2764}\u{200D}\u{1F525}",
    "🌚",
    "🌭",
    "💯",
    "🤣",
    "⚡",
    "🍌",
    "🏆",
    "💔",
    "🤨",
    "😐",
    "🍓",
    "🍾",
    "💋",
    "🖕",
    "😈",
    "😴",
    "😭",
    "🤓",
    "👻",
    "\u{1F468}\u{200D}\u{1F4BB}",
    "👀",
    "🎃",
    "🙈",
    "😇",
    "😨",
    "🤝",
    "✍",
    "🤗",
    "🫡",
    "🎅",
    "🎄",
    "☃",
    "💅",
    "🤪",
    "🗿",
    "🆒",
    "💘",
    "🙉",
    "🦄",
    "😘",
    "💊",
    "🙊",
    "😎",
    "👾",
    "\u{1F937}\u{200D}\u{2642}",
    "🤷",
    "\u{1F937}\u{200D}\u{2640}",
    "😡",
];

pub fn is_valid(emoticon: &str) -> bool {
    VALID_EMOTICONS.contains(&emoticon)
}

pub fn catalog() -> Vec<String> {
    VALID_EMOTICONS.iter().map(|e| e.to_string()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Friendship {
    Friend,
    Enemy,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_no_duplicates() {
        let unique: HashSet<_> = VALID_EMOTICONS.iter().collect();
        assert_eq!(unique.len(), VALID_EMOTICONS.len());
    }

    #[test]
    fn validity() {
        assert!(is_valid("👍"));
        assert!(is_valid("🤡"));
        assert!(!is_valid("⛄"));
        assert!(!is_valid(""));
    }
}
