// Bot presence.
//
// Discord-layer glue only: we set a single "watching" activity once the
// gateway reports ready.

use poise::serenity_prelude as serenity;

/// Shown under the bot's name in the member list.
const DEFAULT_ACTIVITY: &str = "over the Liset";

/// Called once the bot is ready.
pub fn on_ready(ctx: &serenity::Context) {
    let activity = serenity::ActivityData::watching(DEFAULT_ACTIVITY);
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}
