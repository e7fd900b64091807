// This is the entry point of Oda.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (file storage)
// - `discord/` = Discord-specific adapters (commands, events)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands and event handlers

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::ign::{IgnSyncConfig, IgnSyncService};
use crate::core::mentions::{MentionConfig, MentionTracker};
use crate::core::usage_stats::UsageStatsService;
use crate::discord::commands::presence;
use crate::discord::mentions::handle_message_for_mentions;
use crate::discord::{Data, Error};
use crate::infra::usage_stats::JsonUsageStatsStore;
use poise::serenity_prelude as serenity;
use std::str::FromStr;

/// Read an env var, falling back to `default` when it's unset or unparsable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparsable env var");
            default
        }),
        Err(_) => default,
    }
}

/// Exempt role from `IGN_EXEMPT_ROLE_ID`. An empty value turns the role rule off.
fn exempt_role_from_env(default: u64) -> Option<u64> {
    match std::env::var("IGN_EXEMPT_ROLE_ID") {
        Ok(raw) if raw.trim().is_empty() => None,
        Ok(raw) => match raw.trim().parse() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!(value = %raw, "Invalid IGN_EXEMPT_ROLE_ID, using default");
                Some(default)
            }
        },
        Err(_) => Some(default),
    }
}

/// Event handler for non-command Discord events.
/// Live messages only feed the mention tracker.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        // Ignore bot messages (including our own)
        if new_message.author.bot {
            return Ok(());
        }

        match handle_message_for_mentions(ctx, new_message, &data.mentions).await {
            Ok(true) => tracing::info!(
                channel_id = new_message.channel_id.get(),
                author_id = new_message.author.id.get(),
                "Reacted to mention"
            ),
            Ok(false) => {}
            Err(e) => tracing::error!("Error handling mention: {}", e),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Get Discord bot token from environment
    let token = std::env::var("DISCORD_TOKEN").expect(
        "Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.",
    );

    // Keep runtime state in a dedicated folder so the repo root stays tidy.
    let data_dir = std::env::var("BOT_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    std::fs::create_dir_all(&data_dir).expect("Failed to create data directory");
    let state_path = format!("{}/state.json", data_dir);

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    use std::sync::Arc;

    let mention_defaults = MentionConfig::default();
    let mention_config = MentionConfig {
        trigger_keyword: env_or("ODA_TRIGGER_KEYWORD", mention_defaults.trigger_keyword),
        window_secs: env_or("ODA_WINDOW_SECS", mention_defaults.window_secs),
        cooldown_secs: env_or("ODA_COOLDOWN_SECS", mention_defaults.cooldown_secs),
    };
    let mention_tracker = Arc::new(MentionTracker::new(mention_config));

    let ign_defaults = IgnSyncConfig::default();
    let ign_config = IgnSyncConfig {
        max_history: env_or("IGN_SYNC_MAX_HISTORY", ign_defaults.max_history),
        exempt_role_id: exempt_role_from_env(1_361_846_841_934_610_564),
        ..ign_defaults
    };
    let ign_sync_service = Arc::new(IgnSyncService::new(ign_config));

    let usage_store = JsonUsageStatsStore::new(&state_path);
    let usage_service = Arc::new(UsageStatsService::new(usage_store).await);

    // Create the data structure that will be shared across all commands
    let data = Data {
        mentions: Arc::clone(&mention_tracker),
        ign_sync: Arc::clone(&ign_sync_service),
        usage: Arc::clone(&usage_service),
        started_at: chrono::Utc::now(),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                discord::commands::ign_sync::sync_ign(),
                discord::commands::ign_sync::sync_user(),
                discord::commands::find::find(),
                discord::commands::fun::pun(),
                discord::commands::fun::tip(),
                discord::commands::stats::stats(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            // Hook to run after every command
            post_command: |ctx| {
                Box::pin(async move {
                    tracing::info!(
                        command = %ctx.command().qualified_name,
                        user_id = ctx.author().id.get(),
                        "Command completed"
                    );
                    if let Err(e) = ctx.data().usage.record_command().await {
                        tracing::error!("Failed to record command usage: {}", e);
                    }
                })
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!(user = %ready.user.name, "Oda is starting up");

                // Register slash commands globally (can take up to an hour to propagate)
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!(
                    commands = framework.options().commands.len(),
                    "Commands registered"
                );

                presence::on_ready(ctx);
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .expect("Error creating client");

    client.start().await.expect("Error running bot");
}
