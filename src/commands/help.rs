use serenity::{model::channel::Message, prelude::*};
use tracing::info;

use super::PREFIX_COMMANDS;

pub const NAME: &str = "help";
pub const DESCRIPTION: &str = "Shows this message";

pub fn help_text(prefix: char) -> String {
    let width = PREFIX_COMMANDS
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);

    let mut text = String::from("```\nBot para traquear los buenos días\n\nCommands:\n");
    for (name, description) in PREFIX_COMMANDS {
        text.push_str(&format!("  {:<width$}  {}\n", name, description, width = width));
    }
    text.push_str(&format!("\nSay \"Buenos días bros\" every morning; the earlier you are, the more points you get.\nType {}help to see this again.\n```", prefix));
    text
}

pub async fn run_prefix(ctx: &Context, msg: &Message, prefix: char) -> anyhow::Result<()> {
    info!("Help command executed by user {}", msg.author.id);
    msg.channel_id.say(&ctx.http, help_text(prefix)).await?;
    Ok(())
}
