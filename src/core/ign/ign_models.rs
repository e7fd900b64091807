// IGN domain models - data structures for the nickname sync engine.
//
// These are pure domain types with no Discord dependencies.
// The Discord layer converts serenity messages and members into these.

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Longest nickname Discord accepts.
pub const MAX_NICKNAME_LENGTH: usize = 32;

/// Failure diagnostics are clipped to this many characters in reports.
pub const MAX_DIAGNOSTIC_LENGTH: usize = 50;

// ============================================================================
// INPUT
// ============================================================================

/// A chat message as read from channel history. Never mutated by the engine.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub message_id: u64,
    pub author_id: u64,
    pub author_display_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_from_bot: bool,
}

/// A name candidate pulled out of a single message.
#[derive(Debug, Clone)]
pub struct ExtractedIgn<'a> {
    /// The raw text after the indicator, trimmed but otherwise untouched.
    pub candidate: String,
    /// Message the candidate came from.
    pub source: &'a RawMessage,
}

// ============================================================================
// MEMBERS
// ============================================================================

/// Guild-level permissions the sync engine cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Administrator,
    ManageGuild,
    ManageRoles,
}

/// A resolved guild member.
#[derive(Debug, Clone)]
pub struct MemberRef {
    pub user_id: u64,
    pub username: String,
    /// Nickname if set, otherwise the account's display name.
    pub display_name: String,
    pub capabilities: Vec<Capability>,
    pub role_ids: Vec<u64>,
}

impl MemberRef {
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn has_role(&self, role_id: u64) -> bool {
        self.role_ids.contains(&role_id)
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Failures reported by the member lookup and rename capabilities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("member not found")]
    NotFound,

    #[error("forbidden")]
    Forbidden,

    #[error("{0}")]
    Other(String),
}

// ============================================================================
// OUTCOMES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Member holds an exempt permission or role.
    ExemptRole,
    /// Proposed name already matches the current display name.
    AlreadySet,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ExemptRole => write!(f, "exempt role"),
            SkipReason::AlreadySet => write!(f, "already set"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Updated,
    Skipped(SkipReason),
    Failed(SyncError),
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Updated => write!(f, "updated"),
            SyncStatus::Skipped(reason) => write!(f, "skipped ({})", reason),
            SyncStatus::Failed(err) => write!(f, "failed ({})", err),
        }
    }
}

/// Result of running the pipeline for one author.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub author_id: u64,
    /// Resolved member, absent when resolution failed.
    pub member: Option<MemberRef>,
    pub proposed_name: String,
    /// Display name before the rename (author name when unresolved).
    pub previous_name: String,
    pub source_message_id: u64,
    pub status: SyncStatus,
}

/// Outcomes of one channel scan, in history order.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub outcomes: Vec<SyncOutcome>,
    /// Messages looked at before the cap was reached.
    pub scanned: usize,
    /// Human messages that carried no usable IGN.
    pub unmatched: usize,
}

impl SyncReport {
    pub fn updated(&self) -> impl Iterator<Item = &SyncOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == SyncStatus::Updated)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &SyncOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, SyncStatus::Skipped(_)))
    }

    pub fn failed(&self) -> impl Iterator<Item = &SyncOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, SyncStatus::Failed(_)))
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Tunables for the sync engine.
#[derive(Debug, Clone)]
pub struct IgnSyncConfig {
    /// Hard cap on how many history messages a single scan reads.
    pub max_history: usize,
    /// Role whose holders are never renamed.
    pub exempt_role_id: Option<u64>,
    pub max_nickname_length: usize,
}

impl Default for IgnSyncConfig {
    fn default() -> Self {
        Self {
            max_history: 500,
            exempt_role_id: None,
            max_nickname_length: MAX_NICKNAME_LENGTH,
        }
    }
}
