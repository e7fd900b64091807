pub mod usage_stats_models;
pub mod usage_stats_service;
pub mod usage_stats_store;

pub use usage_stats_models::UsageStats;
pub use usage_stats_service::UsageStatsService;
pub use usage_stats_store::UsageStatsStore;
