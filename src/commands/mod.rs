pub mod help;
pub mod rank;

use serenity::{
    model::{
        application::{Command, Interaction},
        channel::Message,
    },
    prelude::*,
};
use crate::{bot::SharedBot, utils::command_helpers::parse_prefix_command};

/// Text commands understood after the configured prefix.
pub const PREFIX_COMMANDS: &[(&str, &str)] = &[
    (help::NAME, help::DESCRIPTION),
    (rank::NAME, rank::DESCRIPTION),
];

pub async fn register_commands(ctx: &Context) -> serenity::Result<()> {
    let commands = vec![rank::register()];

    Command::set_global_commands(&ctx.http, commands).await?;
    Ok(())
}

pub async fn handle_command(
    ctx: &Context,
    interaction: &Interaction,
    bot: SharedBot,
) -> serenity::Result<()> {
    if let Interaction::Command(command) = interaction {
        match command.data.name.as_str() {
            rank::NAME => rank::run(ctx, command, bot).await?,
            _ => {
                tracing::warn!("Unknown command: {}", command.data.name);
            }
        }
    }
    Ok(())
}

/// Dispatches a prefixed text command. Messages without the prefix are ignored.
pub async fn handle_prefix_command(ctx: &Context, msg: &Message, bot: SharedBot) -> anyhow::Result<()> {
    let prefix = bot.config.command_prefix;
    let Some((name, _args)) = parse_prefix_command(prefix, &msg.content) else {
        return Ok(());
    };

    match name {
        rank::NAME => rank::run_prefix(ctx, msg, bot).await?,
        help::NAME => help::run_prefix(ctx, msg, prefix).await?,
        _ => {
            tracing::debug!("Unknown prefix command: {}", name);
        }
    }
    Ok(())
}
