use crate::core::usage_stats::{UsageStats, UsageStatsStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Keeps usage counters in a small JSON file (`state.json`).
pub struct JsonUsageStatsStore {
    path: PathBuf,
}

impl JsonUsageStatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl UsageStatsStore for JsonUsageStatsStore {
    async fn load(&self) -> Result<UsageStats> {
        if !self.path.exists() {
            return Ok(UsageStats::default());
        }

        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        let state: StateFile = serde_json::from_reader(file)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(state.stats)
    }

    async fn save(&self, stats: &UsageStats) -> Result<()> {
        let file = std::fs::File::create(&self.path)
            .with_context(|| format!("writing {}", self.path.display()))?;
        let state = StateFile {
            stats: stats.clone(),
        };
        serde_json::to_writer_pretty(file, &state)?;
        Ok(())
    }
}

/// On-disk layout: `{"stats": {"commands_used": .., "puns_told": ..}}`.
#[derive(serde::Serialize, serde::Deserialize, Default)]
struct StateFile {
    #[serde(default)]
    stats: UsageStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonUsageStatsStore::new(dir.path().join("state.json"));

        assert_eq!(store.load().await.unwrap(), UsageStats::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = JsonUsageStatsStore::new(&path);
        let stats = UsageStats {
            commands_used: 12,
            puns_told: 5,
        };

        store.save(&stats).await.unwrap();

        let reopened = JsonUsageStatsStore::new(&path);
        assert_eq!(reopened.load().await.unwrap(), stats);
    }

    #[tokio::test]
    async fn test_reads_partial_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"stats": {"puns_told": 9}}"#).unwrap();

        let stats = JsonUsageStatsStore::new(&path).load().await.unwrap();
        assert_eq!(stats.puns_told, 9);
        assert_eq!(stats.commands_used, 0);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(JsonUsageStatsStore::new(&path).load().await.is_err());
    }
}
