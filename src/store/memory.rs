use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serenity::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::Store;
use crate::data::{DailyLog, UserRecord};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<String, UserRecord>,
    daily_log: HashMap<NaiveDate, DailyLog>,
}

/// Process-local store. Each operation runs inside one critical section.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user_if_absent(&self, record: &UserRecord) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        if tables.users.contains_key(&record.user_id) {
            return Ok(false);
        }
        tables.users.insert(record.user_id.clone(), record.clone());
        Ok(true)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
        Ok(self.tables.lock().await.users.get(user_id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>> {
        Ok(self.tables.lock().await.users.values().cloned().collect())
    }

    async fn increment_points(&self, user_id: &str, delta: i64) -> Result<i64> {
        let mut tables = self.tables.lock().await;
        let user = tables
            .users
            .get_mut(user_id)
            .ok_or_else(|| anyhow!("user {} is not registered", user_id))?;
        user.points += delta;
        Ok(user.points)
    }

    async fn create_day_if_absent(&self, date: NaiveDate) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        if tables.daily_log.contains_key(&date) {
            return Ok(false);
        }
        tables.daily_log.insert(date, DailyLog::empty(date));
        Ok(true)
    }

    async fn get_day(&self, date: NaiveDate) -> Result<Option<DailyLog>> {
        Ok(self.tables.lock().await.daily_log.get(&date).cloned())
    }

    async fn insert_arrival_if_absent(
        &self,
        date: NaiveDate,
        user_id: &str,
    ) -> Result<Option<u32>> {
        let mut tables = self.tables.lock().await;
        let log = tables
            .daily_log
            .entry(date)
            .or_insert_with(|| DailyLog::empty(date));
        if log.rank_of(user_id).is_some() {
            return Ok(None);
        }
        let rank = u32::try_from(log.len() + 1)?;
        log.arrivals.push((user_id.to_string(), rank));
        Ok(Some(rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[tokio::test]
    async fn insert_user_does_not_overwrite() {
        let store = MemoryStore::new();
        assert!(store.insert_user_if_absent(&UserRecord::new("1", "ana")).await.unwrap());
        store.increment_points("1", 3).await.unwrap();

        assert!(!store.insert_user_if_absent(&UserRecord::new("1", "ana")).await.unwrap());
        assert_eq!(store.get_user("1").await.unwrap().unwrap().points, 3);
    }

    #[tokio::test]
    async fn increment_unknown_user_fails() {
        let store = MemoryStore::new();
        assert!(store.increment_points("404", 1).await.is_err());
    }

    #[tokio::test]
    async fn arrivals_are_first_write_wins() {
        let store = MemoryStore::new();
        assert!(store.create_day_if_absent(day()).await.unwrap());
        assert!(!store.create_day_if_absent(day()).await.unwrap());

        assert_eq!(store.insert_arrival_if_absent(day(), "a").await.unwrap(), Some(1));
        assert_eq!(store.insert_arrival_if_absent(day(), "b").await.unwrap(), Some(2));
        assert_eq!(store.insert_arrival_if_absent(day(), "a").await.unwrap(), None);

        let log = store.get_day(day()).await.unwrap().unwrap();
        assert_eq!(log.arrivals, vec![("a".to_string(), 1), ("b".to_string(), 2)]);
    }

    #[tokio::test]
    async fn days_are_independent() {
        let store = MemoryStore::new();
        let tomorrow = day().succ_opt().unwrap();
        store.insert_arrival_if_absent(day(), "a").await.unwrap();
        assert_eq!(store.insert_arrival_if_absent(tomorrow, "a").await.unwrap(), Some(1));
        assert!(store.get_day(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()).await.unwrap().is_none());
    }
}
