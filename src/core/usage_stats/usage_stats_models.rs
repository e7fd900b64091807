use serde::{Deserialize, Serialize};

/// Counters persisted between restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    #[serde(default)]
    pub commands_used: u64,
    #[serde(default)]
    pub puns_told: u64,
}
