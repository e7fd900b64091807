// Channel history paging.

use crate::core::ign::RawMessage;
use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;

/// Discord returns at most this many messages per request.
const PAGE_SIZE: usize = 100;

/// Fetch up to `limit` messages from a channel, most recent first.
pub async fn fetch_history(
    http: &serenity::Http,
    channel_id: serenity::ChannelId,
    limit: usize,
) -> Result<Vec<RawMessage>, serenity::Error> {
    let mut collected = Vec::with_capacity(limit.min(PAGE_SIZE * 4));
    let mut before: Option<serenity::MessageId> = None;

    while collected.len() < limit {
        let batch = (limit - collected.len()).min(PAGE_SIZE);
        let mut request = serenity::GetMessages::new().limit(batch as u8);
        if let Some(id) = before {
            request = request.before(id);
        }

        let page = channel_id.messages(http, request).await?;
        let page_len = page.len();
        before = page.last().map(|m| m.id);
        collected.extend(page.iter().map(to_raw_message));

        if page_len < batch {
            break;
        }
    }

    tracing::debug!(channel_id = channel_id.get(), fetched = collected.len(), "History fetched");
    Ok(collected)
}

pub fn to_raw_message(message: &serenity::Message) -> RawMessage {
    RawMessage {
        message_id: message.id.get(),
        author_id: message.author.id.get(),
        author_display_name: message.author.display_name().to_string(),
        content: message.content.clone(),
        created_at: DateTime::from_timestamp(message.timestamp.unix_timestamp(), 0)
            .unwrap_or_else(Utc::now),
        is_from_bot: message.author.bot,
    }
}
