// Discord-specific mention handling - turns tracker decisions into replies.

use crate::core::mentions::{MentionTracker, ReactionDecision};
use crate::discord::ign::history::to_raw_message;
use crate::discord::Error;
use chrono::Utc;
use poise::serenity_prelude as serenity;

const FIRST_REACTION: &str = "https://tenor.com/view/waltwhite-breakingbad-say-my-name-gif-7259290";
const SECOND_REACTION: &str =
    "https://tenor.com/view/breaking-bad-walter-white-youre-goddamn-right-gif-14600753";

fn reply_for(decision: ReactionDecision) -> Option<&'static str> {
    match decision {
        ReactionDecision::NoAction => None,
        ReactionDecision::FirstReaction => Some(FIRST_REACTION),
        ReactionDecision::SecondReaction => Some(SECOND_REACTION),
    }
}

/// Feed a live message to the tracker and reply if it asks us to.
///
/// Returns `true` if a reply was sent.
pub async fn handle_message_for_mentions(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    tracker: &MentionTracker,
) -> Result<bool, Error> {
    // Skip bots
    if msg.author.bot {
        return Ok(false);
    }

    let decision = tracker.observe(&to_raw_message(msg), Utc::now()).await;
    let Some(reply) = reply_for(decision) else {
        return Ok(false);
    };

    msg.reply(&ctx.http, reply).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_reaction_has_distinct_reply() {
        assert_eq!(reply_for(ReactionDecision::NoAction), None);
        assert_ne!(
            reply_for(ReactionDecision::FirstReaction),
            reply_for(ReactionDecision::SecondReaction)
        );
    }
}
