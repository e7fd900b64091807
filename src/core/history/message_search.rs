// Message search over a window of channel history.

use crate::core::ign::RawMessage;
use chrono::{DateTime, Utc};

/// Most messages a single search may read.
pub const MAX_SEARCH_HISTORY: usize = 1_000;

/// Characters of message content shown in a search hit.
const PREVIEW_LENGTH: usize = 50;

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub message_id: u64,
    pub author_display_name: String,
    pub posted_at: DateTime<Utc>,
    pub preview: String,
}

/// Case-insensitive substring search, in history order.
pub fn search_messages(messages: &[RawMessage], needle: &str) -> Vec<SearchHit> {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    messages
        .iter()
        .take(MAX_SEARCH_HISTORY)
        .filter(|m| m.content.to_lowercase().contains(&needle))
        .map(|m| SearchHit {
            message_id: m.message_id,
            author_display_name: m.author_display_name.clone(),
            posted_at: m.created_at,
            preview: preview(&m.content),
        })
        .collect()
}

fn preview(content: &str) -> String {
    if content.chars().count() > PREVIEW_LENGTH {
        let head: String = content.chars().take(PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(message_id: u64, content: &str) -> RawMessage {
        RawMessage {
            message_id,
            author_id: 1,
            author_display_name: "Lotus".to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            is_from_bot: false,
        }
    }

    #[test]
    fn test_case_insensitive_match() {
        let messages = vec![
            message(1, "Relic run tonight?"),
            message(2, "nothing here"),
            message(3, "RELIC cracking"),
        ];

        let hits = search_messages(&messages, "relic");
        let ids: Vec<u64> = hits.iter().map(|h| h.message_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_hit_keeps_post_time() {
        let mut msg = message(1, "Void fissure up");
        msg.created_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let hits = search_messages(&[msg.clone()], "fissure");
        assert_eq!(hits[0].posted_at, msg.created_at);
    }

    #[test]
    fn test_long_content_is_previewed() {
        let long = "a".repeat(80);
        let hits = search_messages(&[message(1, &long)], "a");
        assert_eq!(hits[0].preview, format!("{}...", "a".repeat(50)));
    }

    #[test]
    fn test_empty_needle_finds_nothing() {
        assert!(search_messages(&[message(1, "anything")], "").is_empty());
    }
}
