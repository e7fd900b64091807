// Discord commands for IGN nickname sync.
//
// The commands only fetch history, pick the right member adapter (live or dry
// run) and render the result. All the rules live in the core service.

use crate::core::ign::PreviewGuild;
use crate::discord::ign::report_embed::{build_outcome_embed, build_report_embed};
use crate::discord::ign::{fetch_history, SerenityGuildMembers};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

const DEFAULT_SCAN_LIMIT: u32 = 100;
const MAX_SINGLE_USER_SCAN: usize = 200;

/// Sync IGNs from a channel and set them as nicknames.
#[poise::command(
    slash_command,
    guild_only,
    ephemeral,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn sync_ign(
    ctx: Context<'_>,
    #[description = "Channel to read IGNs from"] channel: serenity::GuildChannel,
    #[description = "How many recent messages to scan (default: 100)"] limit: Option<u32>,
    #[description = "Preview the changes without renaming anyone"] dry_run: Option<bool>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    ctx.defer_ephemeral().await?;

    let service = &ctx.data().ign_sync;
    let config = service.config();
    let limit = (limit.unwrap_or(DEFAULT_SCAN_LIMIT) as usize).min(config.max_history);
    let dry_run = dry_run.unwrap_or(false);

    let messages = fetch_history(ctx.http(), channel.id, limit).await?;
    let members = SerenityGuildMembers::new(ctx.serenity_context(), guild_id);

    tracing::info!(
        guild_id = guild_id.get(),
        channel_id = channel.id.get(),
        messages = messages.len(),
        dry_run,
        "Starting IGN channel sync"
    );

    let report = if dry_run {
        let preview = PreviewGuild::new(&members);
        let report = service
            .sync_channel(&preview, &messages, limit, config.exempt_role_id)
            .await;
        tracing::info!(
            guild_id = guild_id.get(),
            planned = preview.planned_count(),
            "IGN sync preview finished"
        );
        report
    } else {
        service
            .sync_channel(&members, &messages, limit, config.exempt_role_id)
            .await
    };

    ctx.send(
        poise::CreateReply::default()
            .embed(build_report_embed(
                &report,
                guild_id.get(),
                channel.id.get(),
                dry_run,
            ))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Sync a single user's nickname to their IGN from a channel.
#[poise::command(
    slash_command,
    guild_only,
    ephemeral,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn sync_user(
    ctx: Context<'_>,
    #[description = "User to update"] user: serenity::User,
    #[description = "Channel to read the IGN from"] channel: serenity::GuildChannel,
    #[description = "Preview the change without renaming"] dry_run: Option<bool>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    ctx.defer_ephemeral().await?;

    if user.bot {
        ctx.say("Bots don't have IGNs! 🤖").await?;
        return Ok(());
    }

    let service = &ctx.data().ign_sync;
    let config = service.config();
    let limit = MAX_SINGLE_USER_SCAN.min(config.max_history);
    let dry_run = dry_run.unwrap_or(false);

    let messages = fetch_history(ctx.http(), channel.id, limit).await?;
    let members = SerenityGuildMembers::new(ctx.serenity_context(), guild_id);
    let user_id = user.id.get();

    let outcome = if dry_run {
        let preview = PreviewGuild::new(&members);
        service
            .sync_one(&preview, &messages, user_id, config.exempt_role_id)
            .await
    } else {
        service
            .sync_one(&members, &messages, user_id, config.exempt_role_id)
            .await
    };

    let embed = build_outcome_embed(
        outcome.as_ref(),
        user_id,
        guild_id.get(),
        channel.id.get(),
        dry_run,
    );
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}
