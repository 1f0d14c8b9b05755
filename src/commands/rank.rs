use serenity::{
    builder::CreateCommand,
    model::{application::CommandInteraction, channel::Message},
    prelude::*,
};
use tracing::{debug, error, info};

use crate::{
    bot::SharedBot,
    leaderboard,
    utils::{
        command_helpers::present_members,
        responses::{default_response, error_response},
    },
};

pub const NAME: &str = "rank";
pub const DESCRIPTION: &str = "Return server ranks";

pub fn register() -> CreateCommand {
    CreateCommand::new(NAME).description(DESCRIPTION)
}

async fn render(ctx: &Context, bot: &SharedBot) -> anyhow::Result<String> {
    let members = present_members(&ctx.cache);
    debug!("Rendering leaderboard for {} members", members.len());
    leaderboard::render(&bot.registry, &members).await
}

pub async fn run(ctx: &Context, command: &CommandInteraction, bot: SharedBot) -> serenity::Result<()> {
    info!("Rank command executed by user {}", command.user.id);

    let response = match render(ctx, &bot).await {
        Ok(table) => default_response(&table),
        Err(e) => {
            error!("Failed to render leaderboard: {:#}", e);
            error_response("Could not load the leaderboard. Please try again.")
        }
    };

    command.create_response(&ctx.http, response).await
}

pub async fn run_prefix(ctx: &Context, msg: &Message, bot: SharedBot) -> anyhow::Result<()> {
    info!("Rank command executed by user {}", msg.author.id);

    let table = render(ctx, &bot).await?;
    msg.channel_id.say(&ctx.http, table).await?;
    Ok(())
}
