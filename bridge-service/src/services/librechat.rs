//! Read-only access to the LibreChat MongoDB database.
//!
//! A client is created per call and shut down once the cursor is drained.

use crate::config::MongoConfig;
use crate::services::metrics::record_store_query;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, FindOptions},
    Client as MongoClient,
};
use service_core::error::AppError;
use std::time::Instant;
use tracing::instrument;

const STORE: &str = "mongodb";

#[derive(Clone)]
pub struct LibreChatDb {
    config: MongoConfig,
}

impl LibreChatDb {
    pub fn new(config: &MongoConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_conversations(
        &self,
        limit: i64,
        skip: u64,
    ) -> Result<Vec<Document>, AppError> {
        let options = FindOptions::builder()
            .projection(doc! { "_id": 1, "title": 1, "createdAt": 1, "updatedAt": 1 })
            .sort(doc! { "createdAt": -1 })
            .skip(skip)
            .limit(limit)
            .build();

        self.find("list_conversations", "conversations", doc! {}, options)
            .await
    }

    /// `conversation_id` is compared as a string; LibreChat stores it as one.
    #[instrument(skip(self))]
    pub async fn list_messages(
        &self,
        conversation_id: &str,
        limit: i64,
    ) -> Result<Vec<Document>, AppError> {
        let options = FindOptions::builder()
            .projection(doc! { "_id": 1, "content": 1, "role": 1, "createdAt": 1 })
            .sort(doc! { "createdAt": -1 })
            .limit(limit)
            .build();

        self.find(
            "list_messages",
            "messages",
            doc! { "conversationId": conversation_id },
            options,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<Document>, AppError> {
        let options = FindOptions::builder()
            .projection(doc! { "_id": 1, "username": 1, "email": 1, "createdAt": 1 })
            .sort(doc! { "createdAt": -1 })
            .build();

        self.find("list_users", "users", doc! {}, options).await
    }

    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), AppError> {
        let client = self.connect().await?;
        let result = client
            .database(&self.config.database)
            .run_command(doc! { "ping": 1 }, None)
            .await;
        client.shutdown().await;
        result.map(|_| ()).map_err(AppError::from)
    }

    async fn connect(&self) -> Result<MongoClient, AppError> {
        let mut client_options = ClientOptions::parse(self.config.uri()).await?;
        client_options.app_name = Some("ai-ecosystem-bridge".to_string());
        if let Some(timeout) = self.config.server_selection_timeout {
            client_options.server_selection_timeout = Some(timeout);
        }
        if let Some(timeout) = self.config.connect_timeout {
            client_options.connect_timeout = Some(timeout);
        }

        Ok(MongoClient::with_options(client_options)?)
    }

    async fn find(
        &self,
        operation: &'static str,
        collection: &str,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, AppError> {
        let started = Instant::now();

        let result = match self.connect().await {
            Ok(client) => {
                let fetched = self.collect(&client, collection, filter, options).await;
                client.shutdown().await;
                fetched
            }
            Err(e) => Err(e),
        };
        record_store_query(STORE, operation, started, result.is_ok());

        result.map_err(|e| {
            tracing::error!(operation, collection, error = %e, "LibreChat query failed");
            e
        })
    }

    async fn collect(
        &self,
        client: &MongoClient,
        collection: &str,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, AppError> {
        let cursor = client
            .database(&self.config.database)
            .collection::<Document>(collection)
            .find(filter, options)
            .await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        tracing::debug!(documents = documents.len(), "LibreChat query returned");
        Ok(documents)
    }
}
