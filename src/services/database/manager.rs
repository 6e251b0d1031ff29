use sqlx::mysql::MySqlConnection;
use sqlx::{ConnectOptions, Connection};

use crate::services::form::SessionRecord;

use super::insert::{bind_record, build_insert_sql};
use super::types::ConnectionConfig;

/// Something that can verify a connection and write one session record.
///
/// Every call opens its own connection and closes it before returning.
pub trait SessionWriter {
    async fn test_connection(&self, config: &ConnectionConfig) -> Result<(), sqlx::Error>;

    /// Insert one record, returning the number of rows affected
    async fn insert_record(
        &self,
        config: &ConnectionConfig,
        record: &SessionRecord,
    ) -> Result<u64, sqlx::Error>;
}

/// Writes session records to MySQL/MariaDB
#[derive(Debug, Clone, Default)]
pub struct DatabaseManager;

impl DatabaseManager {
    pub fn new() -> Self {
        Self
    }

    async fn open(config: &ConnectionConfig) -> Result<MySqlConnection, sqlx::Error> {
        tracing::debug!(server = %config.describe(), "opening connection");
        config.to_mysql_connect_options().connect().await
    }
}

impl SessionWriter for DatabaseManager {
    async fn test_connection(&self, config: &ConnectionConfig) -> Result<(), sqlx::Error> {
        let mut conn = Self::open(config).await?;
        conn.ping().await?;
        conn.close().await?;
        tracing::info!(server = %config.describe(), "connection test succeeded");
        Ok(())
    }

    async fn insert_record(
        &self,
        config: &ConnectionConfig,
        record: &SessionRecord,
    ) -> Result<u64, sqlx::Error> {
        let sql = build_insert_sql(record);
        let mut conn = Self::open(config).await?;

        let result = bind_record(sqlx::query(&sql), record)
            .execute(&mut conn)
            .await;

        // Close before reporting either outcome
        if let Err(e) = conn.close().await {
            tracing::warn!("Error closing connection: {}", e);
        }

        let rows_affected = result?.rows_affected();
        tracing::info!(
            rows_affected,
            columns = record.present_count(),
            "inserted session record"
        );
        Ok(rows_affected)
    }
}
