// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "ign/mod.rs"]
pub mod ign;

#[path = "mentions/mention_tracker.rs"]
pub mod mentions;

#[path = "history/message_search.rs"]
pub mod history;

#[path = "usage_stats/mod.rs"]
pub mod usage_stats;
