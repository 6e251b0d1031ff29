//! Grouped key-value settings.

use anyhow::{Context, Result};
use sqlx::{Executor, Sqlite, SqlitePool, Transaction};

/// Repository for grouped key-value settings.
///
/// Groups are slash-separated paths such as `connections/alice`.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read one value
    pub async fn value(&self, group: &str, key: &str) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT value FROM settings WHERE group_name = ?1 AND key = ?2",
        )
        .bind(group)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to read setting {group}/{key}"))
    }

    /// Insert or replace one value outside a batch
    #[cfg(test)]
    pub async fn set_value(&self, group: &str, key: &str, value: &str) -> Result<()> {
        upsert(&self.pool, group, key, value).await
    }

    #[cfg(test)]
    pub async fn remove(&self, group: &str, key: &str) -> Result<bool> {
        delete(&self.pool, group, key).await
    }

    /// Start a batch of writes that lands all at once on `commit`
    pub async fn batch(&self) -> Result<SettingsBatch> {
        let tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin settings transaction")?;
        Ok(SettingsBatch { tx })
    }

    /// List the keys stored in a group
    #[cfg(test)]
    pub async fn keys(&self, group: &str) -> Result<Vec<String>> {
        let keys = sqlx::query_scalar::<_, String>(
            "SELECT key FROM settings WHERE group_name = ?1 ORDER BY key",
        )
        .bind(group)
        .fetch_all(&self.pool)
        .await?;
        Ok(keys)
    }
}

/// Writes inside one transaction. Dropping the batch without committing
/// rolls every write back.
pub struct SettingsBatch {
    tx: Transaction<'static, Sqlite>,
}

impl SettingsBatch {
    /// Insert or replace one value
    pub async fn set_value(&mut self, group: &str, key: &str, value: &str) -> Result<()> {
        upsert(&mut *self.tx, group, key, value).await
    }

    /// Remove one value; removing a missing key is not an error
    pub async fn remove(&mut self, group: &str, key: &str) -> Result<bool> {
        delete(&mut *self.tx, group, key).await
    }

    pub async fn commit(self) -> Result<()> {
        self.tx
            .commit()
            .await
            .context("Failed to commit settings transaction")
    }
}

async fn upsert<'e, E>(executor: E, group: &str, key: &str, value: &str) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO settings (group_name, key, value, updated_at)
        VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)
        ON CONFLICT (group_name, key)
        DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(group)
    .bind(key)
    .bind(value)
    .execute(executor)
    .await
    .with_context(|| format!("Failed to write setting {group}/{key}"))?;

    Ok(())
}

async fn delete<'e, E>(executor: E, group: &str, key: &str) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM settings WHERE group_name = ?1 AND key = ?2")
        .bind(group)
        .bind(key)
        .execute(executor)
        .await
        .with_context(|| format!("Failed to remove setting {group}/{key}"))?;
    Ok(result.rows_affected() > 0)
}
