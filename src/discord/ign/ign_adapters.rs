// Serenity adapters for the IGN sync engine.

pub mod guild_members;
pub mod history;
pub mod report_embed;

pub use guild_members::SerenityGuildMembers;
pub use history::fetch_history;
