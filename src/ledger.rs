use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::debug;

use crate::data::DailyLog;
use crate::store::SharedStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    Ranked(u32),
    Duplicate,
}

#[derive(Clone)]
pub struct DailyLedger {
    store: SharedStore,
}

impl DailyLedger {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Returns the day's record, creating an empty one first if needed.
    pub async fn get_or_create(&self, date: NaiveDate) -> Result<DailyLog> {
        if self.store.create_day_if_absent(date).await? {
            debug!("Started daily log for {}", date);
        }
        self.store
            .get_day(date)
            .await?
            .with_context(|| format!("daily log for {} vanished after creation", date))
    }

    /// First arrival wins. Later calls for the same user and day change nothing.
    pub async fn record_arrival(&self, date: NaiveDate, user_id: &str) -> Result<Arrival> {
        match self.store.insert_arrival_if_absent(date, user_id).await? {
            Some(rank) => Ok(Arrival::Ranked(rank)),
            None => Ok(Arrival::Duplicate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, SqliteStore, Store};
    use std::sync::Arc;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[tokio::test]
    async fn get_or_create_keeps_existing_arrivals() {
        let ledger = DailyLedger::new(Arc::new(MemoryStore::new()));
        assert!(ledger.get_or_create(day()).await.unwrap().is_empty());

        ledger.record_arrival(day(), "a").await.unwrap();
        let log = ledger.get_or_create(day()).await.unwrap();
        assert_eq!(log.rank_of("a"), Some(1));
    }

    #[tokio::test]
    async fn duplicate_arrival_keeps_rank() {
        let ledger = DailyLedger::new(Arc::new(MemoryStore::new()));
        assert_eq!(ledger.record_arrival(day(), "a").await.unwrap(), Arrival::Ranked(1));
        assert_eq!(ledger.record_arrival(day(), "b").await.unwrap(), Arrival::Ranked(2));
        assert_eq!(ledger.record_arrival(day(), "a").await.unwrap(), Arrival::Duplicate);
        assert_eq!(ledger.get_or_create(day()).await.unwrap().rank_of("a"), Some(1));
    }

    async fn concurrent_arrivals_are_dense(store: Arc<dyn Store>) {
        let ledger = DailyLedger::new(store);
        let mut handles = Vec::new();
        for i in 0..20 {
            let ledger = ledger.clone();
            // Every user tries twice; only one attempt may rank.
            for _ in 0..2 {
                let ledger = ledger.clone();
                handles.push(tokio::spawn(async move {
                    ledger.record_arrival(day(), &format!("user-{}", i)).await.unwrap()
                }));
            }
        }

        let mut ranks = Vec::new();
        for handle in handles {
            if let Arrival::Ranked(rank) = handle.await.unwrap() {
                ranks.push(rank);
            }
        }
        ranks.sort_unstable();
        assert_eq!(ranks, (1..=20).collect::<Vec<u32>>());
        assert_eq!(ledger.get_or_create(day()).await.unwrap().len(), 20);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_arrivals_memory() {
        concurrent_arrivals_are_dense(Arc::new(MemoryStore::new())).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_arrivals_sqlite() {
        concurrent_arrivals_are_dense(Arc::new(SqliteStore::in_memory().await.unwrap())).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_arrivals_sqlite_file_pool() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("ledger.db").display());
        let store = SqliteStore::connect(&url).await.unwrap();
        concurrent_arrivals_are_dense(Arc::new(store)).await;
    }
}
