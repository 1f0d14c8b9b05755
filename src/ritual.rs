//! The daily "buenos dias bros" ritual.
//!
//! Messages are normalized (transliterated to ASCII, lower-cased) and matched
//! against a short ordered list of intents. Only the full greeting scores: the
//! first arrival of the day earns 5 points, the second 4, and so on until
//! the sixth and later arrivals earn nothing.

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::ledger::{Arrival, DailyLedger};
use crate::registry::UserRegistry;

pub const NEAR_MISS_PHRASE: &str = "good morning";
pub const GREETING: &str = "buenos dias";
pub const FULL_GREETING: &str = "buenos dias bros";

pub const MISSING_SUFFIX_REPLY: &str = "Faltan bros";

const MAX_AWARD: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    NearMiss,
    MissingSuffix,
    Greeting,
    Unrelated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Confused,
    MissingSuffix,
    Rejected,
    Scored { rank: u32, award: i64 },
    Ignored,
}

impl Outcome {
    pub fn reaction(&self) -> Option<&'static str> {
        match self {
            Outcome::Confused => Some("❓"),
            Outcome::Rejected => Some("❌"),
            Outcome::Scored { .. } => Some("☀️"),
            Outcome::MissingSuffix | Outcome::Ignored => None,
        }
    }

    pub fn reply(&self) -> Option<&'static str> {
        match self {
            Outcome::MissingSuffix => Some(MISSING_SUFFIX_REPLY),
            _ => None,
        }
    }

    /// Whether the message should go on to command processing.
    pub fn passes_through(&self) -> bool {
        matches!(self, Outcome::Ignored)
    }
}

pub fn normalize(text: &str) -> String {
    deunicode::deunicode(text).to_lowercase()
}

pub fn classify(text: &str) -> Intent {
    let content = normalize(text);
    if content.contains(NEAR_MISS_PHRASE) {
        Intent::NearMiss
    } else if content == GREETING {
        Intent::MissingSuffix
    } else if content == FULL_GREETING {
        Intent::Greeting
    } else {
        Intent::Unrelated
    }
}

/// Rank 1 earns `MAX_AWARD`, each later rank one point less, never below zero.
pub fn award_for_rank(rank: u32) -> i64 {
    i64::from((MAX_AWARD + 1).saturating_sub(rank))
}

#[derive(Clone)]
pub struct RitualEvaluator {
    registry: UserRegistry,
    ledger: DailyLedger,
}

impl RitualEvaluator {
    pub fn new(registry: UserRegistry, ledger: DailyLedger) -> Self {
        Self { registry, ledger }
    }

    pub async fn evaluate(
        &self,
        text: &str,
        author_id: &str,
        display_name: &str,
        today: NaiveDate,
    ) -> Result<Outcome> {
        let intent = classify(text);
        debug!("Message from {} classified as {:?}", author_id, intent);

        match intent {
            Intent::NearMiss => Ok(Outcome::Confused),
            Intent::MissingSuffix => Ok(Outcome::MissingSuffix),
            Intent::Greeting => self.score(author_id, display_name, today).await,
            Intent::Unrelated => Ok(Outcome::Ignored),
        }
    }

    async fn score(&self, author_id: &str, display_name: &str, today: NaiveDate) -> Result<Outcome> {
        self.ledger.get_or_create(today).await?;

        let rank = match self.ledger.record_arrival(today, author_id).await? {
            Arrival::Ranked(rank) => rank,
            Arrival::Duplicate => {
                debug!("User {} already said buenos dias on {}", author_id, today);
                return Ok(Outcome::Rejected);
            }
        };

        let award = award_for_rank(rank);
        // Members who joined after startup have no record yet.
        self.registry.ensure_registered(author_id, display_name).await?;
        let total = self.registry.add_points(author_id, award).await?;

        info!(
            "User {} arrived #{} on {}, +{} points (total {})",
            author_id, rank, today, award, total
        );
        Ok(Outcome::Scored { rank, award })
    }
}
