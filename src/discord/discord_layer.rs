// Discord layer - commands, event handlers and serenity adapters.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "ign/ign_adapters.rs"]
pub mod ign;

#[path = "mentions/mention_handler.rs"]
pub mod mentions;

use crate::core::ign::IgnSyncService;
use crate::core::mentions::MentionTracker;
use crate::core::usage_stats::UsageStatsService;
use crate::infra::usage_stats::JsonUsageStatsStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Data that's shared across all commands.
pub struct Data {
    pub mentions: Arc<MentionTracker>,
    pub ign_sync: Arc<IgnSyncService>,
    pub usage: Arc<UsageStatsService<JsonUsageStatsStore>>,
    pub started_at: DateTime<Utc>,
}
