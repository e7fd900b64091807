// Discord commands module.
// Each feature gets its own command file.

pub mod find;

pub mod fun;

pub mod ign_sync;

// Bot presence on startup
pub mod presence;

pub mod stats;
