use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;
use tax_core::{
    AgeGroup, Currency, HistoryEntry, HistoryRepository, NewHistoryEntry, Preferences, Regime,
    RepositoryError,
};
use tracing::debug;

use crate::decimal::{decimal_to_text, get_decimal};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Connect to `database_url`, creating the database file if it does not
    /// exist. Accepts bare paths (`tax-history.db`), `sqlite:` URLs and
    /// `:memory:`.
    pub async fn new(database_url: &str) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                RepositoryError::Connection(format!("Invalid database URL '{}': {}", database_url, e))
            })?
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options).await.map_err(|e| {
            RepositoryError::Connection(format!(
                "Failed to connect to database '{}': {}",
                database_url, e
            ))
        })?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to run migrations: {}", e)))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn get_text(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> Result<String, RepositoryError> {
    row.try_get(column)
        .map_err(|e| RepositoryError::Database(format!("Failed to get '{}': {}", column, e)))
}

fn row_to_history_entry(row: &sqlx::sqlite::SqliteRow) -> Result<HistoryEntry, RepositoryError> {
    let regime_str = get_text(row, "regime")?;
    let regime = Regime::parse(&regime_str)
        .ok_or_else(|| RepositoryError::Database(format!("Invalid regime: {}", regime_str)))?;

    let age_group_str = get_text(row, "age_group")?;
    let age_group = AgeGroup::parse(&age_group_str).ok_or_else(|| {
        RepositoryError::Database(format!("Invalid age group: {}", age_group_str))
    })?;

    Ok(HistoryEntry {
        id: row
            .try_get("id")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        recorded_at: row
            .try_get::<DateTime<Utc>, _>("recorded_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get recorded_at: {}", e)))?,
        regime,
        age_group,
        gross_income: get_decimal(row, "gross_income")?,
        extra_income: get_decimal(row, "extra_income")?,
        deductions: get_decimal(row, "deductions")?,
        final_tax: get_decimal(row, "final_tax")?,
        final_income: get_decimal(row, "final_income")?,
        currency_symbol: get_text(row, "currency_symbol")?,
    })
}

#[async_trait]
impl HistoryRepository for SqliteRepository {
    async fn append_entry(
        &self,
        entry: NewHistoryEntry,
    ) -> Result<HistoryEntry, RepositoryError> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO calculation_history (
                recorded_at, regime, age_group, gross_income, extra_income,
                deductions, final_tax, final_income, currency_symbol
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(now)
        .bind(entry.regime.as_str())
        .bind(entry.age_group.as_str())
        .bind(decimal_to_text(entry.gross_income))
        .bind(decimal_to_text(entry.extra_income))
        .bind(decimal_to_text(entry.deductions))
        .bind(decimal_to_text(entry.final_tax))
        .bind(decimal_to_text(entry.final_income))
        .bind(&entry.currency_symbol)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        debug!(id, "appended history entry");

        let row = sqlx::query(
            "SELECT id, recorded_at, regime, age_group, gross_income, extra_income,
                    deductions, final_tax, final_income, currency_symbol
             FROM calculation_history WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        row_to_history_entry(&row)
    }

    async fn list_entries(&self) -> Result<Vec<HistoryEntry>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, recorded_at, regime, age_group, gross_income, extra_income,
                    deductions, final_tax, final_income, currency_symbol
             FROM calculation_history ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_history_entry).collect()
    }

    async fn clear_entries(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM calculation_history")
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn load_preferences(&self) -> Result<Option<Preferences>, RepositoryError> {
        let row = sqlx::query("SELECT regime, currency FROM preferences WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let regime_str = get_text(&row, "regime")?;
        let regime = Regime::parse(&regime_str)
            .ok_or_else(|| RepositoryError::Database(format!("Invalid regime: {}", regime_str)))?;

        let currency_str = get_text(&row, "currency")?;
        let currency = Currency::parse(&currency_str).ok_or_else(|| {
            RepositoryError::Database(format!("Invalid currency: {}", currency_str))
        })?;

        Ok(Some(Preferences { regime, currency }))
    }

    async fn save_preferences(
        &self,
        preferences: &Preferences,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO preferences (id, regime, currency) VALUES (1, ?, ?)
             ON CONFLICT(id) DO UPDATE SET regime = excluded.regime, currency = excluded.currency",
        )
        .bind(preferences.regime.as_str())
        .bind(preferences.currency.code())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn clear_preferences(&self) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM preferences")
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }
}
