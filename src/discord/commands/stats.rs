use crate::discord::ign::report_embed::{EMBED_COLOR, THUMBNAIL_URL};
use crate::discord::{Context, Error};
use chrono::Utc;
use poise::serenity_prelude as serenity;

/// View Oda's statistics.
#[poise::command(slash_command)]
pub async fn stats(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let usage = data.usage.snapshot().await;

    let uptime = (Utc::now() - data.started_at).num_seconds().max(0);
    let (hours, rest) = (uptime / 3600, uptime % 3600);
    let (minutes, seconds) = (rest / 60, rest % 60);

    let guilds = ctx.cache().guilds().len();
    let users = ctx.cache().user_count();
    let latency = ctx.ping().await.as_millis();
    let mentions = if data.mentions.is_cooling_down(Utc::now()).await {
        "Cooling down"
    } else {
        "Listening"
    };

    let embed = serenity::CreateEmbed::new()
        .title("📊 Oda Statistics")
        .color(EMBED_COLOR)
        .thumbnail(THUMBNAIL_URL)
        .field(
            "⏱️ Uptime",
            format!("{}h {}m {}s", hours, minutes, seconds),
            true,
        )
        .field("🖥️ Guilds", guilds.to_string(), true)
        .field("👥 Users", users.to_string(), true)
        .field("🎭 Puns Told", usage.puns_told.to_string(), true)
        .field("⚙️ Commands Used", usage.commands_used.to_string(), true)
        .field(
            "🔔 Mentions",
            format!("{} (\"{}\")", mentions, data.mentions.config().trigger_keyword),
            true,
        )
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Oda Bot v2.0 • Latency: {}ms",
            latency
        )));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
