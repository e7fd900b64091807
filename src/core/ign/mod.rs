// Core IGN module - name extraction, sanitization and nickname sync.

pub mod exemption;
pub mod ign_extractor;
pub mod ign_models;
pub mod ign_sync_service;
pub mod nickname_sanitizer;
pub mod preview;

pub use ign_models::*;
pub use ign_sync_service::{IgnSyncService, MemberDirectory, NicknameEditor};
pub use preview::PreviewGuild;
