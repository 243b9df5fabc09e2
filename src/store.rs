use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::Visit;

/// Key under which the visit list is kept.
pub const VISITS_KEY: &str = "visits";

/// Persists the visit list as a single JSON array in the `kv_store` table.
#[derive(Clone)]
pub struct VisitStore {
    db: SqlitePool,
}

impl VisitStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Overwrite the stored list with `visits`.
    pub async fn save(&self, visits: &[Visit]) -> Result<(), AppError> {
        let value = serde_json::to_string(visits)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(VISITS_KEY)
        .bind(&value)
        .bind(&now)
        .execute(&self.db)
        .await?;

        tracing::debug!(count = visits.len(), "saved visits");
        Ok(())
    }

    /// Read the stored list. Absent, unreadable, or malformed data all come
    /// back as an empty list.
    pub async fn load(&self) -> Vec<Visit> {
        let raw = match self.raw().await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("could not read stored visits: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Visit>>(&raw) {
            Ok(visits) => visits,
            Err(e) => {
                tracing::warn!("ignoring malformed stored visits: {e}");
                Vec::new()
            }
        }
    }

    /// The stored JSON exactly as written.
    pub async fn raw(&self) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
            .bind(VISITS_KEY)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    pub async fn clear(&self) -> Result<(), AppError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(VISITS_KEY)
            .execute(&self.db)
            .await?;

        tracing::info!("cleared stored visits");
        Ok(())
    }
}
