use crate::discord::{Context, Error};
use rand::seq::SliceRandom;

const ORDIS_JOKES: &[&str] = &[
    "I admire you, Operator. You're strong, resourceful, and… ~~likely to die horribly at any moment.~~ Adaptive!",
    "Operator, I would tell you a joke about the Void, but it's... Devoid of humor.",
    "I cleaned the Liset today, Operator. Oh, except the blood stains. Those are… sentimental.",
    "Intruders Detected! Don't worry, Operator… I already gave them the tour. Of the airlock.",
    "Systems stable, Operator. Heart rate normal. Blood pressure ~~boiling, spurting, catastrophic failure imminent.~~ Optimal!",
    "Oda suggests taking a break, Operator. Hydrate, stretch, and then **annihilate all who oppose you.**",
    "Did you know? The Corpus have a 100% mortality rate. ~~So do we all~~ Fascinating!",
    "I've been practicing my humor subroutines, Operator. ~~Kill me~~ How am I doing?",
    "Operator, would you like to hear about ship maintenance? ~~It's mind-numbingly dull~~ It's riveting!",
    "I detect elevated stress levels, Operator. Have you considered ~~violence~~ meditation?",
];

const WARFRAME_TIPS: &[&str] = &[
    "💡 Use your Operator's Void Dash to quickly cover distances and proc status effects!",
    "💡 Mod for ability strength AND duration on most frames for maximum effectiveness.",
    "💡 Helios with Detect Vulnerability can reveal enemy weaknesses in combat.",
    "💡 Rolling gives you 75% damage reduction during the animation!",
    "💡 Aim gliding increases your critical chance on many weapons.",
    "💡 Most boss drops can be increased by using resource boosters.",
    "💡 The Helminth system lets you transfer abilities between Warframes!",
    "💡 Capturing targets on Fissure missions grants you more Void Traces.",
    "💡 Exodia Contagion can be used to nuke crowds from a distance with any Zaw.",
];

// ThreadRng isn't Send, so pick before any await.
fn pick(lines: &[&'static str]) -> &'static str {
    lines.choose(&mut rand::thread_rng()).copied().unwrap_or_default()
}

/// Ordis will tell you a random joke!
#[poise::command(slash_command)]
pub async fn pun(ctx: Context<'_>) -> Result<(), Error> {
    let joke = pick(ORDIS_JOKES);

    if let Err(e) = ctx.data().usage.record_pun().await {
        tracing::warn!("Failed to record pun: {}", e);
    }

    ctx.say(joke).await?;
    Ok(())
}

/// Get a random Warframe gameplay tip!
#[poise::command(slash_command)]
pub async fn tip(ctx: Context<'_>) -> Result<(), Error> {
    let tip = pick(WARFRAME_TIPS);
    ctx.say(tip).await?;
    Ok(())
}
