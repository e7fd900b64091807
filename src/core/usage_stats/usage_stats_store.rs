use super::usage_stats_models::UsageStats;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UsageStatsStore: Send + Sync {
    async fn load(&self) -> Result<UsageStats>;
    async fn save(&self, stats: &UsageStats) -> Result<()>;
}
