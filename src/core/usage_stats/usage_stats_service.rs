use super::usage_stats_models::UsageStats;
use super::usage_stats_store::UsageStatsStore;
use anyhow::Result;
use tokio::sync::Mutex;

pub struct UsageStatsService<S: UsageStatsStore> {
    store: S,
    stats: Mutex<UsageStats>,
}

impl<S: UsageStatsStore> UsageStatsService<S> {
    /// Load persisted counters. A store that fails to load starts from zero.
    pub async fn new(store: S) -> Self {
        let stats = match store.load().await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::error!("Failed to load usage stats: {}", e);
                UsageStats::default()
            }
        };

        Self {
            store,
            stats: Mutex::new(stats),
        }
    }

    pub async fn record_command(&self) -> Result<UsageStats> {
        self.update(|stats| stats.commands_used += 1).await
    }

    pub async fn record_pun(&self) -> Result<UsageStats> {
        self.update(|stats| stats.puns_told += 1).await
    }

    pub async fn snapshot(&self) -> UsageStats {
        self.stats.lock().await.clone()
    }

    async fn update(&self, apply: impl FnOnce(&mut UsageStats)) -> Result<UsageStats> {
        let mut stats = self.stats.lock().await;
        apply(&mut stats);
        // Persist while holding the lock so saves land in order.
        self.store.save(&stats).await?;
        Ok(stats.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    /// In-memory store for testing
    #[derive(Default)]
    struct MockUsageStore {
        saved: StdMutex<Vec<UsageStats>>,
        initial: UsageStats,
        fail_load: bool,
    }

    #[async_trait]
    impl UsageStatsStore for MockUsageStore {
        async fn load(&self) -> Result<UsageStats> {
            if self.fail_load {
                anyhow::bail!("corrupt state file");
            }
            Ok(self.initial.clone())
        }

        async fn save(&self, stats: &UsageStats) -> Result<()> {
            self.saved.lock().unwrap().push(stats.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_counters_continue_from_loaded_state() {
        let store = MockUsageStore {
            initial: UsageStats {
                commands_used: 41,
                puns_told: 3,
            },
            ..Default::default()
        };
        let service = UsageStatsService::new(store).await;

        let stats = service.record_command().await.unwrap();
        assert_eq!(stats.commands_used, 42);

        let stats = service.record_pun().await.unwrap();
        assert_eq!(stats.puns_told, 4);
        assert_eq!(service.store.saved.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_load_starts_from_zero() {
        let store = MockUsageStore {
            fail_load: true,
            ..Default::default()
        };
        let service = UsageStatsService::new(store).await;

        assert_eq!(service.snapshot().await, UsageStats::default());
    }
}
