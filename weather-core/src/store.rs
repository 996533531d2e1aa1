//! Last-value-per-city persistence.
//!
//! One row per city identifier in the `weather` table. Writes go through an
//! `INSERT ... ON CONFLICT DO UPDATE`, so concurrent writers to the same city
//! resolve to whichever statement commits last.

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::model::WeatherRecord;

#[derive(Debug, Clone)]
pub struct WeatherStore {
    pool: SqlitePool,
}

impl WeatherStore {
    /// Open a pool for `database_url` and create the table if missing.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Private in-memory database; a single connection so every checkout sees the same data.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS weather (
                city_country TEXT PRIMARY KEY,
                weather_info TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert the summary for `city`, or overwrite the existing one.
    pub async fn upsert(&self, city: &str, weather_info: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO weather (city_country, weather_info, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(city_country) DO UPDATE SET
                 weather_info = excluded.weather_info,
                 updated_at = excluded.updated_at",
        )
        .bind(city)
        .bind(weather_info)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::info!(city, "stored weather record");
        Ok(())
    }

    pub async fn get(&self, city: &str) -> Result<Option<WeatherRecord>, sqlx::Error> {
        sqlx::query_as::<_, WeatherRecord>(
            "SELECT city_country, weather_info, updated_at FROM weather WHERE city_country = ?1",
        )
        .bind(city)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM weather")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_creates_then_overwrites() {
        let store = WeatherStore::in_memory().await.unwrap();

        store
            .upsert("London,UK", "Temperature: 10°C, Weather: Rain")
            .await
            .unwrap();
        let first = store.get("London,UK").await.unwrap().unwrap();

        store
            .upsert("London,UK", "Temperature: 12°C, Weather: Clear sky")
            .await
            .unwrap();
        let second = store.get("London,UK").await.unwrap().unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(second.weather_info, "Temperature: 12°C, Weather: Clear sky");
        assert!(second.updated_at >= first.updated_at);
    }

    #[tokio::test]
    async fn rows_are_keyed_by_city() {
        let store = WeatherStore::in_memory().await.unwrap();

        store.upsert("London,UK", "a").await.unwrap();
        store.upsert("Paris,FR", "b").await.unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(store.get("Paris,FR").await.unwrap().unwrap().weather_info, "b");
        assert!(store.get("Rome,IT").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_database_survives_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("weather.db").display());

        let store = WeatherStore::connect(&url).await.unwrap();
        store.upsert("Oslo,NO", "cold").await.unwrap();
        store.close().await;

        let reopened = WeatherStore::connect(&url).await.unwrap();
        assert_eq!(
            reopened.get("Oslo,NO").await.unwrap().unwrap().weather_info,
            "cold"
        );
    }

    #[tokio::test]
    async fn concurrent_upserts_leave_one_whole_value() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("weather.db").display());
        let store = WeatherStore::connect(&url).await.unwrap();

        let candidates: Vec<String> = (0..8)
            .map(|i| format!("Temperature: {i}°C, Weather: Summary {i}"))
            .collect();

        let mut handles = Vec::new();
        for summary in candidates.clone() {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.upsert("Berlin,DE", &summary).await
            }));
        }
        let mut written = 0;
        for h in handles {
            if h.await.unwrap().is_ok() {
                written += 1;
            }
        }
        assert!(written > 0);

        assert_eq!(store.count().await.unwrap(), 1);
        let stored = store.get("Berlin,DE").await.unwrap().unwrap();
        assert!(candidates.contains(&stored.weather_info));
    }
}
