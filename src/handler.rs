use serenity::{
    async_trait,
    gateway::ChunkGuildFilter,
    model::{
        application::Interaction,
        channel::{Message, ReactionType},
        event::GuildMembersChunkEvent,
        gateway::{GatewayIntents, Ready},
        guild::Member,
        id::GuildId,
    },
    prelude::*,
};
use tracing::{info, error, debug};
use crate::{
    bot::SharedBot,
    commands,
    ritual::Outcome,
    registry::PresentMember,
    utils::command_helpers::{author_display_name, chunk_members, present_members, to_present_member},
};

pub struct Handler {
    pub bot: SharedBot,
}

impl Handler {
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }

    async fn reconcile(&self, members: &[PresentMember]) {
        match self.bot.registry.reconcile(members).await {
            Ok(summary) => info!(
                "Registered {} new members, {} already known",
                summary.created, summary.existing
            ),
            Err(why) => error!("Failed to reconcile members: {:#}", why),
        }
    }

    async fn run_ritual(&self, ctx: &Context, msg: &Message) -> anyhow::Result<Outcome> {
        let outcome = self
            .bot
            .ritual
            .evaluate(
                &msg.content,
                &msg.author.id.to_string(),
                &author_display_name(msg),
                self.bot.config.today(),
            )
            .await?;

        if let Some(emoji) = outcome.reaction() {
            msg.react(ctx, ReactionType::Unicode(emoji.to_string())).await?;
        }
        if let Some(reply) = outcome.reply() {
            msg.reply(ctx, reply).await?;
        }
        Ok(outcome)
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("We have logged in as {}", ready.user.name);

        if let Err(why) = commands::register_commands(&ctx).await {
            error!("Failed to register slash commands: {}", why);
        } else {
            info!("Successfully registered slash commands");
        }
    }

    async fn cache_ready(&self, ctx: Context, guilds: Vec<GuildId>) {
        let members = present_members(&ctx.cache);
        info!("Cache ready for {} guilds, reconciling {} members", guilds.len(), members.len());
        self.reconcile(&members).await;

        // Large guilds arrive with a partial member list; the rest comes in chunks.
        for guild_id in guilds {
            ctx.shard.chunk_guild(guild_id, None, false, ChunkGuildFilter::None, None);
        }
    }

    async fn guild_members_chunk(&self, _ctx: Context, chunk: GuildMembersChunkEvent) {
        let members = chunk_members(chunk.members.values());
        debug!(
            "Member chunk {}/{} for guild {} with {} members",
            chunk.chunk_index + 1,
            chunk.chunk_count,
            chunk.guild_id,
            members.len()
        );
        self.reconcile(&members).await;
    }

    async fn guild_member_addition(&self, _ctx: Context, new_member: Member) {
        if new_member.user.bot {
            return;
        }
        let member = to_present_member(&new_member);
        if let Err(why) = self
            .bot
            .registry
            .ensure_registered(&member.user_id, &member.display_name)
            .await
        {
            error!("Failed to register new member {}: {:#}", member.user_id, why);
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let outcome = match self.run_ritual(&ctx, &msg).await {
            Ok(outcome) => outcome,
            Err(why) => {
                error!("Error evaluating message {} from {}: {:#}", msg.id, msg.author.id, why);
                return;
            }
        };

        if !outcome.passes_through() {
            debug!("Message {} handled by ritual as {:?}", msg.id, outcome);
            return;
        }

        if let Err(why) = commands::handle_prefix_command(&ctx, &msg, self.bot.clone()).await {
            error!("Error handling command: {:#}", why);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Err(why) = commands::handle_command(&ctx, &interaction, self.bot.clone()).await {
            error!("Error handling command: {}", why);
        }
    }
}
