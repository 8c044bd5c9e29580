use std::str::FromStr;

use log::{debug, info};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

use crate::{
    config::Config,
    error::{Result, StoreError},
    exchange_rate::{NewRate, RateRecord},
};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS exchange_rates (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        currency_pair TEXT NOT NULL,
        rate REAL NOT NULL,
        date_recorded TEXT NOT NULL
    )
"#;

const CREATE_PAIR_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS exchange_rates_pair_date
        ON exchange_rates (currency_pair, date_recorded)
"#;

/// Durable storage of exchange rate records.
///
/// Owns a connection pool; every operation borrows a connection for the
/// duration of a single statement, so each call is applied atomically.
/// Cloning is cheap and shares the pool.
#[derive(Debug, Clone)]
pub struct RateStore {
    pool: SqlitePool,
}

impl RateStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if missing) the database named by `config.database_url`.
    pub async fn connect(config: &Config) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(config.timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.timeout)
            .connect_with(options)
            .await?;

        info!("Connected to {}", config.database_url);

        Ok(Self::new(pool))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Creates the schema if it does not exist yet. Safe to run on every startup.
    pub async fn initialize(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(CREATE_TABLE).execute(&mut *tx).await?;
        sqlx::query(CREATE_PAIR_INDEX).execute(&mut *tx).await?;
        tx.commit().await?;

        debug!("Schema ready");
        Ok(())
    }

    pub async fn create(&self, rate: &NewRate) -> Result<i64> {
        let id = sqlx::query(
            "INSERT INTO exchange_rates (currency_pair, rate, date_recorded) VALUES (?, ?, ?)",
        )
        .bind(&rate.currency_pair)
        .bind(rate.rate)
        .bind(rate.date_recorded)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        debug!(
            "Created rate {} for {} on {}",
            id, rate.currency_pair, rate.date_recorded
        );
        Ok(id)
    }

    pub async fn list_all(&self) -> Result<Vec<RateRecord>> {
        let records = sqlx::query_as::<_, RateRecord>(
            "SELECT id, currency_pair, rate, date_recorded FROM exchange_rates ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Returns the record for `currency_pair` with the greatest `date_recorded`.
    ///
    /// The pair is matched exactly. When several records share the latest date,
    /// which one is returned is up to the database.
    pub async fn get_latest(&self, currency_pair: &str) -> Result<RateRecord> {
        let record = sqlx::query_as::<_, RateRecord>(
            r#"
            SELECT id, currency_pair, rate, date_recorded FROM exchange_rates
            WHERE currency_pair = ?
            ORDER BY date_recorded DESC
            LIMIT 1
            "#,
        )
        .bind(currency_pair)
        .fetch_optional(&self.pool)
        .await?;

        let Some(record) = record else {
            let message = format!("Currency pair {} not found", currency_pair);
            return Err(StoreError::NotFound(message));
        };
        Ok(record)
    }

    /// Replaces every field of record `id`. Existence is decided by the same
    /// statement that writes, so a concurrent delete can't slip in between.
    pub async fn update(&self, id: i64, rate: &NewRate) -> Result<()> {
        let rows = sqlx::query(
            r#"
            UPDATE exchange_rates
            SET currency_pair = ?, rate = ?, date_recorded = ?
            WHERE id = ?
            "#,
        )
        .bind(&rate.currency_pair)
        .bind(rate.rate)
        .bind(rate.date_recorded)
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(StoreError::NotFound(format!("Rate ID {} not found", id)));
        }

        debug!("Updated rate {}", id);
        Ok(())
    }

    /// Removes record `id`. A missing id is not an error.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let rows = sqlx::query("DELETE FROM exchange_rates WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        debug!("Deleted rate {} ({} rows)", id, rows);
        Ok(())
    }
}
