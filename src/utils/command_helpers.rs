use serenity::{
    cache::Cache,
    model::{channel::Message, guild::Member},
};
use std::collections::HashSet;

use crate::registry::PresentMember;

/// Collects the non-bot members of every cached guild.
///
/// A user who shares several guilds with the bot is listed once. Large guilds
/// only hold their full member list after the chunks requested in `cache_ready`
/// have arrived.
///
/// # Arguments
/// * `cache` - The serenity cache, populated once `cache_ready` has fired
pub fn present_members(cache: &Cache) -> Vec<PresentMember> {
    let mut members = Vec::new();
    for guild_id in cache.guilds() {
        // Guild refs are cache guards and must not be held across an await.
        let Some(guild) = cache.guild(guild_id) else {
            continue;
        };
        members.extend(guild.members.values().map(member_entry));
    }
    non_bot_members(members)
}

/// Non-bot members of one chunk of a guild's member list.
pub fn chunk_members<'a>(members: impl IntoIterator<Item = &'a Member>) -> Vec<PresentMember> {
    non_bot_members(members.into_iter().map(member_entry))
}

fn member_entry(member: &Member) -> (PresentMember, bool) {
    (to_present_member(member), member.user.bot)
}

/// Drops bots and repeated user ids, keeping first-seen order.
pub fn non_bot_members(
    entries: impl IntoIterator<Item = (PresentMember, bool)>,
) -> Vec<PresentMember> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|(member, is_bot)| !is_bot && seen.insert(member.user_id.clone()))
        .map(|(member, _)| member)
        .collect()
}

pub fn to_present_member(member: &Member) -> PresentMember {
    PresentMember::new(member.user.id.to_string(), member.display_name())
}

/// The name shown for a message author: server nickname, then global name, then username.
pub fn author_display_name(msg: &Message) -> String {
    msg.member
        .as_ref()
        .and_then(|member| member.nick.clone())
        .or_else(|| msg.author.global_name.clone())
        .unwrap_or_else(|| msg.author.name.clone())
}

/// Splits a prefixed command into its name and the remaining arguments.
///
/// # Returns
/// * `Some((name, args))` - When `content` starts with `prefix` followed by a command name
/// * `None` - Otherwise
///
/// # Example
/// ```ignore
/// assert_eq!(parse_prefix_command('\'', "'rank"), Some(("rank", "")));
/// ```
pub fn parse_prefix_command(prefix: char, content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix(prefix)?;
    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().filter(|name| !name.is_empty())?;
    let args = parts.next().unwrap_or("").trim();
    Some((name, args))
}
