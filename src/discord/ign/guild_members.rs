// Serenity-backed member lookup and nickname editing.
//
// Translates between serenity's `Member` and the core `MemberRef`, and maps
// HTTP failures onto the small error set the sync engine understands.

use crate::core::ign::{Capability, MemberDirectory, MemberRef, NicknameEditor, SyncError};
use ::serenity::http::HttpError;
use async_trait::async_trait;
use poise::serenity_prelude as serenity;

/// Member directory bound to one guild.
pub struct SerenityGuildMembers<'a> {
    ctx: &'a serenity::Context,
    guild_id: serenity::GuildId,
}

impl<'a> SerenityGuildMembers<'a> {
    pub fn new(ctx: &'a serenity::Context, guild_id: serenity::GuildId) -> Self {
        Self { ctx, guild_id }
    }

    /// Guild-wide permissions for a member. Falls back to fetching the guild's
    /// roles over HTTP when the guild isn't cached; if that fails too the
    /// member can't be checked and is reported as a failure.
    async fn permissions_of(
        &self,
        member: &serenity::Member,
    ) -> Result<serenity::Permissions, SyncError> {
        let cached = self
            .ctx
            .cache
            .guild(self.guild_id)
            .map(|guild| guild.member_permissions(member));
        if let Some(permissions) = cached {
            return Ok(permissions);
        }

        let guild = self
            .guild_id
            .to_partial_guild(&self.ctx.http)
            .await
            .map_err(|e| {
                tracing::warn!(guild_id = self.guild_id.get(), "Guild roles unavailable: {}", e);
                SyncError::Other("guild roles unavailable".to_string())
            })?;
        Ok(guild.member_permissions(member))
    }
}

/// Capabilities the exemption policy looks at.
fn capabilities_of(permissions: serenity::Permissions) -> Vec<Capability> {
    let mut capabilities = Vec::new();
    if permissions.administrator() {
        capabilities.push(Capability::Administrator);
    }
    if permissions.manage_guild() {
        capabilities.push(Capability::ManageGuild);
    }
    if permissions.manage_roles() {
        capabilities.push(Capability::ManageRoles);
    }
    capabilities
}

fn to_member_ref(member: &serenity::Member, permissions: serenity::Permissions) -> MemberRef {
    MemberRef {
        user_id: member.user.id.get(),
        username: member.user.name.clone(),
        display_name: member.display_name().to_string(),
        capabilities: capabilities_of(permissions),
        role_ids: member.roles.iter().map(|r| r.get()).collect(),
    }
}

#[async_trait]
impl<'a> MemberDirectory for SerenityGuildMembers<'a> {
    fn cached_member(&self, user_id: u64) -> Option<MemberRef> {
        let guild = self.ctx.cache.guild(self.guild_id)?;
        let member = guild.members.get(&serenity::UserId::new(user_id))?;
        Some(to_member_ref(member, guild.member_permissions(member)))
    }

    async fn fetch_member(&self, user_id: u64) -> Result<MemberRef, SyncError> {
        let member = self
            .ctx
            .http
            .get_member(self.guild_id, serenity::UserId::new(user_id))
            .await
            .map_err(|e| {
                tracing::debug!(user_id, guild_id = self.guild_id.get(), "Member fetch failed: {}", e);
                SyncError::NotFound
            })?;

        let permissions = self.permissions_of(&member).await?;
        Ok(to_member_ref(&member, permissions))
    }
}

#[async_trait]
impl<'a> NicknameEditor for SerenityGuildMembers<'a> {
    async fn set_display_name(&self, member: &MemberRef, name: &str) -> Result<(), SyncError> {
        self.guild_id
            .edit_member(
                &self.ctx.http,
                serenity::UserId::new(member.user_id),
                serenity::EditMember::new().nickname(name),
            )
            .await
            .map(|_| ())
            .map_err(classify_error)
    }
}

fn classify_error(err: serenity::Error) -> SyncError {
    if let serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) = &err {
        match response.status_code.as_u16() {
            403 => return SyncError::Forbidden,
            404 => return SyncError::NotFound,
            _ => {}
        }
    }
    SyncError::Other(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_from_permissions() {
        let permissions =
            serenity::Permissions::ADMINISTRATOR | serenity::Permissions::MANAGE_ROLES;
        assert_eq!(
            capabilities_of(permissions),
            vec![Capability::Administrator, Capability::ManageRoles]
        );
        assert!(capabilities_of(serenity::Permissions::SEND_MESSAGES).is_empty());
    }
}
