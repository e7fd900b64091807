// Dry-run support: wraps a real member directory but records renames instead
// of applying them, so admins can see what a sync would do.

use super::ign_models::{MemberRef, SyncError};
use super::ign_sync_service::{MemberDirectory, NicknameEditor};
use async_trait::async_trait;
use dashmap::DashMap;

pub struct PreviewGuild<'a, D: MemberDirectory> {
    directory: &'a D,
    /// user_id -> nickname that would have been set
    planned: DashMap<u64, String>,
}

impl<'a, D: MemberDirectory> PreviewGuild<'a, D> {
    pub fn new(directory: &'a D) -> Self {
        Self {
            directory,
            planned: DashMap::new(),
        }
    }

    /// Number of renames a real sync would have made.
    pub fn planned_count(&self) -> usize {
        self.planned.len()
    }
}

#[async_trait]
impl<'a, D: MemberDirectory> MemberDirectory for PreviewGuild<'a, D> {
    fn cached_member(&self, user_id: u64) -> Option<MemberRef> {
        self.directory.cached_member(user_id)
    }

    async fn fetch_member(&self, user_id: u64) -> Result<MemberRef, SyncError> {
        self.directory.fetch_member(user_id).await
    }
}

#[async_trait]
impl<'a, D: MemberDirectory> NicknameEditor for PreviewGuild<'a, D> {
    async fn set_display_name(&self, member: &MemberRef, name: &str) -> Result<(), SyncError> {
        tracing::debug!(user_id = member.user_id, nickname = name, "Dry run: rename recorded");
        self.planned.insert(member.user_id, name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ign::{IgnSyncConfig, IgnSyncService, RawMessage, SyncStatus};
    use chrono::Utc;

    struct StaticDirectory;

    #[async_trait]
    impl MemberDirectory for StaticDirectory {
        fn cached_member(&self, user_id: u64) -> Option<MemberRef> {
            (user_id == 10).then(|| MemberRef {
                user_id,
                username: "ten".to_string(),
                display_name: "Ten".to_string(),
                capabilities: vec![],
                role_ids: vec![],
            })
        }

        async fn fetch_member(&self, _user_id: u64) -> Result<MemberRef, SyncError> {
            Err(SyncError::NotFound)
        }
    }

    #[tokio::test]
    async fn test_preview_records_without_applying() {
        let directory = StaticDirectory;
        let preview = PreviewGuild::new(&directory);
        let messages = vec![RawMessage {
            message_id: 1,
            author_id: 10,
            author_display_name: "Ten".to_string(),
            content: "IGN: Harrow".to_string(),
            created_at: Utc::now(),
            is_from_bot: false,
        }];

        let report = IgnSyncService::new(IgnSyncConfig::default())
            .sync_channel(&preview, &messages, 10, None)
            .await;

        assert_eq!(report.outcomes[0].status, SyncStatus::Updated);
        assert_eq!(preview.planned.get(&10).unwrap().as_str(), "Harrow");
        assert_eq!(preview.planned_count(), 1);
    }
}
