use crate::core::history::{search_messages, MAX_SEARCH_HISTORY};
use crate::discord::ign::fetch_history;
use crate::discord::ign::report_embed::{
    build_truncated_field, jump_link, EMBED_COLOR, THUMBNAIL_URL,
};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::Mentionable;

const MAX_LISTED_HITS: usize = 10;

/// Find messages containing specific text in a channel.
#[poise::command(
    slash_command,
    guild_only,
    ephemeral,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn find(
    ctx: Context<'_>,
    #[description = "Text to search for"] text: String,
    #[description = "Channel to search in"] channel: serenity::GuildChannel,
    #[description = "How many recent messages to search (default: 100)"] limit: Option<u32>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    ctx.defer_ephemeral().await?;

    let limit = (limit.unwrap_or(100) as usize).min(MAX_SEARCH_HISTORY);
    let messages = fetch_history(ctx.http(), channel.id, limit).await?;
    let hits = search_messages(&messages, &text);

    let mut embed = serenity::CreateEmbed::new()
        .title("🔍 Search Results")
        .color(EMBED_COLOR)
        .thumbnail(THUMBNAIL_URL)
        .description(format!(
            "Found **{}** message{} containing '{}' in {}",
            hits.len(),
            if hits.len() == 1 { "" } else { "s" },
            text,
            channel.mention()
        ))
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Searched last {} messages",
            messages.len()
        )));

    let value = if hits.is_empty() {
        "No messages found.".to_string()
    } else {
        let mut links: Vec<String> = hits
            .iter()
            .take(MAX_LISTED_HITS)
            .map(|hit| {
                format!(
                    "[{}]({}) <t:{}:R>: *{}*",
                    hit.author_display_name,
                    jump_link(guild_id.get(), channel.id.get(), hit.message_id),
                    hit.posted_at.timestamp(),
                    hit.preview
                )
            })
            .collect();
        if hits.len() > MAX_LISTED_HITS {
            links.push(format!("...and {} more", hits.len() - MAX_LISTED_HITS));
        }
        build_truncated_field(&links, 1024)
    };
    embed = embed.field("Messages", value, false);

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}
