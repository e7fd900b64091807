// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "usage_stats/mod.rs"]
pub mod usage_stats;
