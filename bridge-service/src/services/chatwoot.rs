//! Read-only access to the Chatwoot PostgreSQL database.
//!
//! Every call opens its own connection and closes it before returning, on the
//! error path as well. There is no pool and nothing is retried.

use crate::config::PostgresConfig;
use crate::models::columns::{
    map_row, Column, JsonRow, CONVERSATION_COLUMNS, LIST_CONVERSATIONS_SQL, LIST_MESSAGES_SQL,
    MESSAGE_COLUMNS,
};
use crate::services::metrics::record_store_query;
use service_core::error::AppError;
use sqlx::postgres::{PgArguments, PgConnectOptions, PgConnection};
use sqlx::query::Query;
use sqlx::{Connection, Postgres};
use std::time::Instant;
use tracing::instrument;

const STORE: &str = "postgres";

#[derive(Clone)]
pub struct ChatwootDb {
    options: PgConnectOptions,
}

impl ChatwootDb {
    pub fn new(config: &PostgresConfig) -> Self {
        Self {
            options: config.connect_options(),
        }
    }

    /// Newest conversations first.
    #[instrument(skip(self))]
    pub async fn list_conversations(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<JsonRow>, AppError> {
        let query = sqlx::query(LIST_CONVERSATIONS_SQL).bind(limit).bind(offset);
        self.run("list_conversations", query, CONVERSATION_COLUMNS)
            .await
    }

    /// Newest messages of one conversation first.
    #[instrument(skip(self))]
    pub async fn list_messages(
        &self,
        conversation_id: i64,
        limit: i64,
    ) -> Result<Vec<JsonRow>, AppError> {
        let query = sqlx::query(LIST_MESSAGES_SQL)
            .bind(conversation_id)
            .bind(limit);
        self.run("list_messages", query, MESSAGE_COLUMNS).await
    }

    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), AppError> {
        let mut conn = PgConnection::connect_with(&self.options).await?;
        let result = conn.ping().await;
        close(conn).await;
        result.map_err(AppError::from)
    }

    async fn run<'q>(
        &self,
        operation: &'static str,
        query: Query<'q, Postgres, PgArguments>,
        columns: &'static [Column],
    ) -> Result<Vec<JsonRow>, AppError> {
        let started = Instant::now();
        let result = self.fetch(query, columns).await;
        record_store_query(STORE, operation, started, result.is_ok());

        result.map_err(|e| {
            tracing::error!(operation, error = %e, "Chatwoot query failed");
            e
        })
    }

    async fn fetch<'q>(
        &self,
        query: Query<'q, Postgres, PgArguments>,
        columns: &'static [Column],
    ) -> Result<Vec<JsonRow>, AppError> {
        let mut conn = PgConnection::connect_with(&self.options).await?;
        let fetched = query.fetch_all(&mut conn).await;
        close(conn).await;

        let rows = fetched?;
        tracing::debug!(rows = rows.len(), "Chatwoot query returned");
        rows.iter().map(|row| map_row(row, columns)).collect()
    }
}

async fn close(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        tracing::warn!("Failed to close PostgreSQL connection cleanly: {}", e);
    }
}
