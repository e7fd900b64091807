// IGN sync service - scans channel history and renames members to their IGN.
//
// This service handles:
// - Picking one name per author (first hit in history order wins)
// - Resolving authors to live members
// - Exemption and "already set" checks
// - Renaming, with per-author failures collected into a report
//
// NO Discord dependencies here. Member lookup and renaming go through the
// `MemberDirectory` and `NicknameEditor` ports.

use super::exemption::ExemptionPolicy;
use super::ign_extractor::IgnExtractor;
use super::ign_models::{
    IgnSyncConfig, MemberRef, RawMessage, SkipReason, SyncError, SyncOutcome, SyncReport,
    SyncStatus, MAX_DIAGNOSTIC_LENGTH,
};
use super::nickname_sanitizer::sanitize;
use async_trait::async_trait;
use std::collections::HashSet;

// ============================================================================
// PORTS
// ============================================================================

/// Looks up guild members.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Member from the local cache, if present.
    fn cached_member(&self, user_id: u64) -> Option<MemberRef>;

    /// Member from the remote API. Any failure is reported as `NotFound`.
    async fn fetch_member(&self, user_id: u64) -> Result<MemberRef, SyncError>;
}

/// Changes a member's display name.
#[async_trait]
pub trait NicknameEditor: Send + Sync {
    async fn set_display_name(&self, member: &MemberRef, name: &str) -> Result<(), SyncError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct IgnSyncService {
    config: IgnSyncConfig,
    extractor: IgnExtractor,
}

impl IgnSyncService {
    pub fn new(config: IgnSyncConfig) -> Self {
        Self {
            config,
            extractor: IgnExtractor::new(),
        }
    }

    pub fn config(&self) -> &IgnSyncConfig {
        &self.config
    }

    /// Work out the nickname a message asks for.
    ///
    /// Returns `None` when the message has no IGN indicator, or when neither
    /// the IGN nor the author's current name survive sanitization.
    pub fn propose_name(&self, message: &RawMessage) -> Option<String> {
        let extracted = self.extractor.extract(message)?;
        let candidate = self.extractor.strip_discriminator(&extracted.candidate);
        let max_length = self.config.max_nickname_length;

        let name = sanitize(&candidate, max_length);
        if !name.is_empty() {
            return Some(name);
        }

        let fallback = sanitize(&extracted.source.author_display_name, max_length);
        if fallback.is_empty() {
            None
        } else {
            Some(fallback)
        }
    }

    /// Scan up to `limit` messages (most recent first) and sync every author
    /// that posted an IGN.
    ///
    /// `limit` is clamped to the configured history cap.
    pub async fn sync_channel<G>(
        &self,
        guild: &G,
        messages: &[RawMessage],
        limit: usize,
        exempt_role_id: Option<u64>,
    ) -> SyncReport
    where
        G: MemberDirectory + NicknameEditor,
    {
        let limit = limit.min(self.config.max_history);
        let policy = ExemptionPolicy::standard(exempt_role_id);
        let mut processed: HashSet<u64> = HashSet::new();
        let mut report = SyncReport::default();

        for message in messages.iter().take(limit) {
            report.scanned += 1;

            if message.is_from_bot || processed.contains(&message.author_id) {
                continue;
            }

            let Some(proposed) = self.propose_name(message) else {
                report.unmatched += 1;
                continue;
            };

            let outcome = self.sync_author(guild, message, proposed, &policy).await;
            processed.insert(message.author_id);
            report.outcomes.push(outcome);
        }

        tracing::info!(
            scanned = report.scanned,
            updated = report.updated().count(),
            skipped = report.skipped().count(),
            failed = report.failed().count(),
            "IGN channel sync finished"
        );

        report
    }

    /// Run the same pipeline for a single author.
    ///
    /// Returns `None` when the author posted no usable IGN in the scanned
    /// window.
    pub async fn sync_one<G>(
        &self,
        guild: &G,
        messages: &[RawMessage],
        target_author_id: u64,
        exempt_role_id: Option<u64>,
    ) -> Option<SyncOutcome>
    where
        G: MemberDirectory + NicknameEditor,
    {
        let policy = ExemptionPolicy::standard(exempt_role_id);

        let (message, proposed) = messages
            .iter()
            .take(self.config.max_history)
            .filter(|m| m.author_id == target_author_id && !m.is_from_bot)
            .find_map(|m| self.propose_name(m).map(|name| (m, name)))?;

        Some(self.sync_author(guild, message, proposed, &policy).await)
    }

    /// Resolve, check and rename one author.
    async fn sync_author<G>(
        &self,
        guild: &G,
        message: &RawMessage,
        proposed: String,
        policy: &ExemptionPolicy,
    ) -> SyncOutcome
    where
        G: MemberDirectory + NicknameEditor,
    {
        let mut outcome = SyncOutcome {
            author_id: message.author_id,
            member: None,
            proposed_name: proposed,
            previous_name: message.author_display_name.clone(),
            source_message_id: message.message_id,
            status: SyncStatus::Updated,
        };

        let member = match resolve_member(guild, message.author_id).await {
            Some(member) => member,
            None => {
                tracing::warn!(user_id = message.author_id, "IGN sync: member not found");
                outcome.status = SyncStatus::Failed(SyncError::NotFound);
                return outcome;
            }
        };

        outcome.previous_name = member.display_name.clone();
        outcome.status = self.rename(guild, &member, &outcome.proposed_name, policy).await;
        outcome.member = Some(member);
        outcome
    }

    async fn rename<G>(
        &self,
        guild: &G,
        member: &MemberRef,
        proposed: &str,
        policy: &ExemptionPolicy,
    ) -> SyncStatus
    where
        G: NicknameEditor,
    {
        if policy.is_exempt(member) {
            tracing::info!(user_id = member.user_id, "IGN sync: skipping exempt member");
            return SyncStatus::Skipped(SkipReason::ExemptRole);
        }

        if member.display_name == proposed {
            return SyncStatus::Skipped(SkipReason::AlreadySet);
        }

        match guild.set_display_name(member, proposed).await {
            Ok(()) => {
                tracing::info!(
                    user_id = member.user_id,
                    previous = %member.display_name,
                    nickname = proposed,
                    "IGN sync: nickname updated"
                );
                SyncStatus::Updated
            }
            Err(SyncError::Other(message)) => {
                tracing::warn!(user_id = member.user_id, error = %message, "IGN sync: rename failed");
                SyncStatus::Failed(SyncError::Other(truncate_diagnostic(&message)))
            }
            Err(err) => {
                tracing::warn!(user_id = member.user_id, error = %err, "IGN sync: rename failed");
                SyncStatus::Failed(err)
            }
        }
    }
}

async fn resolve_member<G: MemberDirectory>(guild: &G, user_id: u64) -> Option<MemberRef> {
    if let Some(member) = guild.cached_member(user_id) {
        return Some(member);
    }
    guild.fetch_member(user_id).await.ok()
}

fn truncate_diagnostic(message: &str) -> String {
    message.chars().take(MAX_DIAGNOSTIC_LENGTH).collect()
}

// ============================================================================
// TESTS
// ============================================================================
