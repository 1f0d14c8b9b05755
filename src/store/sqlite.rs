use anyhow::{Context, Result};
use chrono::NaiveDate;
use serenity::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use super::Store;
use crate::data::{day_key, DailyLog, UserRecord};

/// SQLite-backed store. Conditional writes and increments are single statements,
/// so they stay atomic across processes sharing the same database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid sqlite url {}", url))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open database {}", url))?;

        let store = Self { pool };
        store.migrate().await?;
        info!("Connected to database {}", url);
        Ok(store)
    }

    #[cfg(test)]
    /// A private in-memory database. One connection, kept alive for the pool's lifetime.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("failed to apply database migrations")
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_user_if_absent(&self, record: &UserRecord) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO users (user_id, display_name, points) VALUES (?, ?, ?) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(&record.user_id)
        .bind(&record.display_name)
        .bind(record.points)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
        let row: Option<(String, String, i64)> =
            sqlx::query_as("SELECT user_id, display_name, points FROM users WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(user_id, display_name, points)| UserRecord {
            user_id,
            display_name,
            points,
        }))
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>> {
        let rows: Vec<(String, String, i64)> =
            sqlx::query_as("SELECT user_id, display_name, points FROM users")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(user_id, display_name, points)| UserRecord {
                user_id,
                display_name,
                points,
            })
            .collect())
    }

    async fn increment_points(&self, user_id: &str, delta: i64) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "UPDATE users SET points = points + ? WHERE user_id = ? RETURNING points",
        )
        .bind(delta)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .with_context(|| format!("user {} is not registered", user_id))
    }

    async fn create_day_if_absent(&self, date: NaiveDate) -> Result<bool> {
        let result =
            sqlx::query("INSERT INTO daily_log (day) VALUES (?) ON CONFLICT (day) DO NOTHING")
                .bind(day_key(date))
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn get_day(&self, date: NaiveDate) -> Result<Option<DailyLog>> {
        let key = day_key(date);
        let exists: Option<String> = sqlx::query_scalar("SELECT day FROM daily_log WHERE day = ?")
            .bind(&key)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT user_id, rank FROM daily_arrivals WHERE day = ? ORDER BY rank",
        )
        .bind(&key)
        .fetch_all(&self.pool)
        .await?;

        let arrivals = rows
            .into_iter()
            .map(|(user_id, rank)| Ok((user_id, u32::try_from(rank)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(DailyLog { date, arrivals }))
    }

    async fn insert_arrival_if_absent(
        &self,
        date: NaiveDate,
        user_id: &str,
    ) -> Result<Option<u32>> {
        // The arrivals table references daily_log, so the day row has to exist first.
        self.create_day_if_absent(date).await?;

        // Only a repeat arrival is swallowed. A clash on (day, rank) is an error.
        let key = day_key(date);
        let rank: Option<i64> = sqlx::query_scalar(
            "INSERT INTO daily_arrivals (day, user_id, rank) \
             SELECT ?, ?, COUNT(*) + 1 FROM daily_arrivals WHERE day = ? \
             ON CONFLICT (day, user_id) DO NOTHING \
             RETURNING rank",
        )
        .bind(&key)
        .bind(user_id)
        .bind(&key)
        .fetch_optional(&self.pool)
        .await?;

        rank.map(u32::try_from).transpose().map_err(Into::into)
    }
}
