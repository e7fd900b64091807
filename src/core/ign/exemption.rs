// Exemption rules - who the sync engine must never rename.

use super::ign_models::{Capability, MemberRef};

/// One reason a member may be exempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExemptionRule {
    Capability(Capability),
    Role(u64),
}

impl ExemptionRule {
    fn matches(&self, member: &MemberRef) -> bool {
        match self {
            ExemptionRule::Capability(capability) => member.has_capability(*capability),
            ExemptionRule::Role(role_id) => member.has_role(*role_id),
        }
    }
}

/// A member is exempt when any rule matches.
#[derive(Debug, Clone, Default)]
pub struct ExemptionPolicy {
    rules: Vec<ExemptionRule>,
}

impl ExemptionPolicy {
    /// Admins, server managers, role managers and holders of `exempt_role_id`.
    pub fn standard(exempt_role_id: Option<u64>) -> Self {
        let policy = Self::default()
            .with_rule(ExemptionRule::Capability(Capability::Administrator))
            .with_rule(ExemptionRule::Capability(Capability::ManageGuild))
            .with_rule(ExemptionRule::Capability(Capability::ManageRoles));

        match exempt_role_id {
            Some(role_id) => policy.with_rule(ExemptionRule::Role(role_id)),
            None => policy,
        }
    }

    pub fn with_rule(mut self, rule: ExemptionRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn is_exempt(&self, member: &MemberRef) -> bool {
        self.rules.iter().any(|rule| rule.matches(member))
    }
}
