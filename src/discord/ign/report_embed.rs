// Embeds for IGN sync results.

use crate::core::ign::{SyncOutcome, SyncReport, SyncStatus};
use poise::serenity_prelude as serenity;

pub const EMBED_COLOR: u32 = 0xD4AF36;
pub const THUMBNAIL_URL: &str =
    "https://ik.imagekit.io/qcxbyrkgu/Golden_Pagoda_Emblem-clear.png?updatedAt=1752791247987";

/// Discord's limit for a single embed field value.
const MAX_FIELD_CHARS: usize = 1024;
const MAX_LISTED_UPDATES: usize = 10;
const MAX_LISTED_PROBLEMS: usize = 5;

/// Join `items` with newlines, keeping the result within `max_chars`.
/// Items that don't fit are summarised as "...and N more".
pub fn build_truncated_field(items: &[String], max_chars: usize) -> String {
    if items.is_empty() {
        return "None".to_string();
    }

    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        let sep = if out.is_empty() { "" } else { "\n" };
        if out.chars().count() + sep.len() + item.chars().count() > max_chars {
            let suffix = format!("{}...and {} more", sep, items.len() - i);
            if out.chars().count() + suffix.chars().count() <= max_chars {
                out.push_str(&suffix);
            } else {
                out = out
                    .chars()
                    .take(max_chars.saturating_sub(3))
                    .collect::<String>();
                out.push_str("...");
            }
            return out;
        }
        out.push_str(sep);
        out.push_str(item);
    }
    out
}

/// Link that jumps straight to a message.
pub fn jump_link(guild_id: u64, channel_id: u64, message_id: u64) -> String {
    format!(
        "https://discord.com/channels/{}/{}/{}",
        guild_id, channel_id, message_id
    )
}

/// Where a report's source messages live.
#[derive(Debug, Clone, Copy)]
struct Origin {
    guild_id: u64,
    channel_id: u64,
}

impl Origin {
    fn source_of(&self, outcome: &SyncOutcome) -> String {
        jump_link(self.guild_id, self.channel_id, outcome.source_message_id)
    }
}

fn who(outcome: &SyncOutcome) -> String {
    match &outcome.member {
        Some(member) => member.username.clone(),
        None => format!("<@{}>", outcome.author_id),
    }
}

fn describe(outcome: &SyncOutcome, origin: Origin) -> String {
    let line = match &outcome.status {
        SyncStatus::Updated => format!("✓ {} → **{}**", who(outcome), outcome.proposed_name),
        SyncStatus::Skipped(reason) => format!("⏭️ {} ({})", who(outcome), reason),
        SyncStatus::Failed(err) => format!("❌ {}: {}", who(outcome), err),
    };
    format!("{} [↗]({})", line, origin.source_of(outcome))
}

fn capped_lines<'a>(
    outcomes: impl Iterator<Item = &'a SyncOutcome>,
    cap: usize,
    origin: Origin,
) -> Vec<String> {
    let all: Vec<&SyncOutcome> = outcomes.collect();
    let mut lines: Vec<String> = all.iter().take(cap).map(|o| describe(o, origin)).collect();
    if all.len() > cap {
        lines.push(format!("...and {} more", all.len() - cap));
    }
    lines
}

pub fn build_report_embed(
    report: &SyncReport,
    guild_id: u64,
    channel_id: u64,
    dry_run: bool,
) -> serenity::CreateEmbed {
    let origin = Origin {
        guild_id,
        channel_id,
    };
    let title = if dry_run {
        "🔄 IGN Sync Preview (dry run)"
    } else {
        "🔄 IGN Sync Results"
    };

    let mut embed = serenity::CreateEmbed::new()
        .title(title)
        .color(EMBED_COLOR)
        .thumbnail(THUMBNAIL_URL)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Scanned {} messages",
            report.scanned
        )));

    if report.is_empty() {
        return embed.description("📭 No IGN patterns found in the scanned messages.");
    }

    let updated = report.updated().count();
    embed = embed.description(format!(
        "✅ {} **{}** user{}.",
        if dry_run { "Would sync" } else { "Synced" },
        updated,
        if updated == 1 { "" } else { "s" }
    ));

    if updated > 0 {
        let lines = capped_lines(report.updated(), MAX_LISTED_UPDATES, origin);
        embed = embed.field(
            "Updated Nicknames",
            build_truncated_field(&lines, MAX_FIELD_CHARS),
            false,
        );
    }

    if report.skipped().next().is_some() {
        let lines = capped_lines(report.skipped(), MAX_LISTED_PROBLEMS, origin);
        embed = embed.field("Skipped", build_truncated_field(&lines, MAX_FIELD_CHARS), false);
    }

    if report.failed().next().is_some() {
        let lines = capped_lines(report.failed(), MAX_LISTED_PROBLEMS, origin);
        embed = embed.field(
            "⚠️ Failures",
            build_truncated_field(&lines, MAX_FIELD_CHARS),
            false,
        );
    }

    embed
}

/// Embed for a single-user sync. `None` means no IGN was found.
pub fn build_outcome_embed(
    outcome: Option<&SyncOutcome>,
    user_id: u64,
    guild_id: u64,
    channel_id: u64,
    dry_run: bool,
) -> serenity::CreateEmbed {
    let embed = serenity::CreateEmbed::new()
        .color(EMBED_COLOR)
        .thumbnail(THUMBNAIL_URL);

    let Some(outcome) = outcome else {
        return embed
            .title("IGN Not Found")
            .description(format!("No IGN found for <@{}> in <#{}>.", user_id, channel_id));
    };

    let embed = embed.url(jump_link(guild_id, channel_id, outcome.source_message_id));

    match &outcome.status {
        SyncStatus::Updated if dry_run => embed.title("Nickname Preview").description(format!(
            "Would update nickname for <@{}> from '{}' to '{}'",
            user_id, outcome.previous_name, outcome.proposed_name
        )),
        SyncStatus::Updated => embed.title("Nickname Updated").description(format!(
            "Updated nickname for <@{}> from '{}' to '{}'",
            user_id, outcome.previous_name, outcome.proposed_name
        )),
        SyncStatus::Skipped(reason) => embed
            .title("IGN Sync Skipped")
            .description(format!("Skipped <@{}> ({})", user_id, reason)),
        SyncStatus::Failed(err) => embed.title("Nickname Update Failed").description(format!(
            "Failed to update nickname for <@{}> to '{}': {}",
            user_id, outcome.proposed_name, err
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_none() {
        assert_eq!(build_truncated_field(&[], 1024), "None");
    }

    #[test]
    fn test_fits_unchanged() {
        let lines = vec!["a".to_string(), "b".to_string()];
        assert_eq!(build_truncated_field(&lines, 1024), "a\nb");
    }

    #[test]
    fn test_overflow_adds_more_suffix() {
        let lines = vec!["a".to_string(), "b".to_string(), "x".repeat(50)];
        assert_eq!(build_truncated_field(&lines, 30), "a\nb\n...and 1 more");
    }

    #[test]
    fn test_no_room_for_suffix_cuts_with_ellipsis() {
        let lines: Vec<String> = (0..10).map(|i| format!("{:05}", i)).collect();
        let out = build_truncated_field(&lines, 30);
        assert_eq!(out.chars().count(), 30);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_outcome_lines_link_to_source_message() {
        let outcome = SyncOutcome {
            author_id: 7,
            member: None,
            proposed_name: "Gauss".to_string(),
            previous_name: "old".to_string(),
            source_message_id: 555,
            status: SyncStatus::Updated,
        };
        let origin = Origin {
            guild_id: 1,
            channel_id: 2,
        };

        assert_eq!(
            describe(&outcome, origin),
            "✓ <@7> → **Gauss** [↗](https://discord.com/channels/1/2/555)"
        );
    }

    #[test]
    fn test_first_item_too_long() {
        let lines = vec!["x".repeat(100)];
        assert_eq!(build_truncated_field(&lines, 20), "...and 1 more");
    }
}
