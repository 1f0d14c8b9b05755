use anyhow::{anyhow, bail, Result};
use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://buenos_dias.db";
pub const DEFAULT_PREFIX: char = '\'';

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub database_url: String,
    pub command_prefix: char,
    /// Zone used to decide the calendar day. `None` means the host's local time.
    pub timezone: Option<Tz>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| anyhow!("DISCORD_TOKEN environment variable is required"))?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let command_prefix = match lookup("COMMAND_PREFIX") {
            Some(prefix) => validate_prefix(&prefix)?,
            None => DEFAULT_PREFIX,
        };

        let timezone = lookup("BOT_TIMEZONE")
            .map(|tz| validate_timezone(&tz))
            .transpose()?;

        Ok(Self {
            discord_token,
            database_url,
            command_prefix,
            timezone,
        })
    }

    pub fn today(&self) -> NaiveDate {
        match self.timezone {
            Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
            None => Local::now().date_naive(),
        }
    }
}

fn validate_prefix(prefix: &str) -> Result<char> {
    let mut chars = prefix.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() => Ok(c),
        _ => bail!("COMMAND_PREFIX must be a single character, got {:?}", prefix),
    }
}

fn validate_timezone(timezone: &str) -> Result<Tz> {
    timezone
        .parse::<Tz>()
        .map_err(|e| anyhow!("Invalid BOT_TIMEZONE {:?}: {}", timezone, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[("DISCORD_TOKEN", "abc")]).unwrap();
        assert_eq!(config.discord_token, "abc");
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.command_prefix, '\'');
        assert!(config.timezone.is_none());
    }

    #[test]
    fn token_is_required() {
        assert!(config(&[]).is_err());
        assert!(config(&[("DISCORD_TOKEN", "  ")]).is_err());
    }

    #[test]
    fn prefix_must_be_one_character() {
        let ok = config(&[("DISCORD_TOKEN", "abc"), ("COMMAND_PREFIX", "!")]).unwrap();
        assert_eq!(ok.command_prefix, '!');
        assert!(config(&[("DISCORD_TOKEN", "abc"), ("COMMAND_PREFIX", "!!")]).is_err());
        assert!(config(&[("DISCORD_TOKEN", "abc"), ("COMMAND_PREFIX", "")]).is_err());
    }

    #[test]
    fn timezone_is_parsed() {
        let ok = config(&[("DISCORD_TOKEN", "abc"), ("BOT_TIMEZONE", "America/Mexico_City")]).unwrap();
        assert_eq!(ok.timezone, Some(chrono_tz::America::Mexico_City));
        assert!(config(&[("DISCORD_TOKEN", "abc"), ("BOT_TIMEZONE", "Mars/Olympus")]).is_err());
    }
}
