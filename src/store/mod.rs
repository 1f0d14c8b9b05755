//! Storage seam for the `users` and `daily_log` tables.
//!
//! Every method maps to a single atomic primitive of the backing store. Callers
//! never read a value, change it and write it back.

pub mod memory;
pub mod sqlite;

use anyhow::Result;
use chrono::NaiveDate;
use serenity::async_trait;
use std::sync::Arc;

use crate::data::{DailyLog, UserRecord};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type SharedStore = Arc<dyn Store>;

#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts `record` unless a user with the same id exists. Returns whether it was created.
    async fn insert_user_if_absent(&self, record: &UserRecord) -> Result<bool>;

    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>>;

    async fn list_users(&self) -> Result<Vec<UserRecord>>;

    /// Adds `delta` to the user's points in place and returns the new total.
    async fn increment_points(&self, user_id: &str, delta: i64) -> Result<i64>;

    async fn create_day_if_absent(&self, date: NaiveDate) -> Result<bool>;

    async fn get_day(&self, date: NaiveDate) -> Result<Option<DailyLog>>;

    /// Assigns the next rank for `date` to `user_id` only if the user has none yet.
    ///
    /// Returns `None` without touching anything when the user already arrived that day.
    async fn insert_arrival_if_absent(&self, date: NaiveDate, user_id: &str)
        -> Result<Option<u32>>;
}

/// Opens the store named by a `DATABASE_URL` value.
pub async fn open(url: &str) -> Result<SharedStore> {
    let store: SharedStore = if url == "memory" {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(SqliteStore::connect(url).await?)
    };
    Ok(store)
}
