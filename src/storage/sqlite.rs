use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use super::{InteractionRecord, InteractionStore};
use crate::error::StorageError;

/// SQLite interaction log.
///
/// A pool is opened per call and closed before returning, so no connection
/// outlives the runtime that opened it.
#[derive(Debug, Clone)]
pub struct SqliteInteractionStore {
    db_path: PathBuf,
}

impl SqliteInteractionStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    async fn open_pool(&self) -> Result<SqlitePool, StorageError> {
        if let Some(parent) = self.db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let url = format!("sqlite://{}?mode=rwc", self.db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await?;
        ensure_schema(&pool).await?;
        Ok(pool)
    }
}

async fn ensure_schema(pool: &SqlitePool) -> Result<(), StorageError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS interactions (
            id                   TEXT PRIMARY KEY,
            ts                   TEXT NOT NULL,
            text                 TEXT NOT NULL,
            emotion_json         TEXT NOT NULL,
            recommendations_json TEXT NOT NULL,
            rating               INTEGER
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_interactions_ts ON interactions(ts)")
        .execute(pool)
        .await?;
    Ok(())
}

fn row_to_record(row: &SqliteRow) -> Result<InteractionRecord, StorageError> {
    let ts: String = row.try_get("ts")?;
    let timestamp = DateTime::parse_from_rfc3339(&ts)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
        .with_timezone(&Utc);
    let emotion_json: String = row.try_get("emotion_json")?;
    let recommendations_json: String = row.try_get("recommendations_json")?;
    let rating: Option<i64> = row.try_get("rating")?;

    Ok(InteractionRecord {
        id: row.try_get("id")?,
        timestamp,
        text: row.try_get("text")?,
        emotion: serde_json::from_str(&emotion_json)?,
        recommendations: serde_json::from_str(&recommendations_json)?,
        rating: rating.and_then(|r| u8::try_from(r).ok()),
    })
}

#[async_trait]
impl InteractionStore for SqliteInteractionStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn save_interaction(&self, record: &InteractionRecord) -> Result<(), StorageError> {
        let emotion_json = serde_json::to_string(&record.emotion)?;
        let recommendations_json = serde_json::to_string(&record.recommendations)?;

        let pool = self.open_pool().await?;
        let result = sqlx::query(
            "INSERT INTO interactions (id, ts, text, emotion_json, recommendations_json, rating)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(record.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true))
        .bind(&record.text)
        .bind(emotion_json)
        .bind(recommendations_json)
        .bind(record.rating.map(i64::from))
        .execute(&pool)
        .await;
        pool.close().await;

        result?;
        tracing::debug!(id = record.id.as_str(), "storage: interaction saved");
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<InteractionRecord>, StorageError> {
        let pool = self.open_pool().await?;
        let rows = sqlx::query(
            "SELECT id, ts, text, emotion_json, recommendations_json, rating
             FROM interactions ORDER BY ts DESC LIMIT ?",
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&pool)
        .await;
        pool.close().await;

        rows?.iter().map(row_to_record).collect()
    }
}
