//! LibreChat handlers. Results are encoded according to the configured
//! `DocumentEncoding`: a JSON string by default, nested JSON in native mode.

use crate::middleware::LibreChatConversationId;
use crate::models::{
    encode_documents, ListParams, DEFAULT_CONVERSATION_LIMIT, DEFAULT_MESSAGE_LIMIT,
};
use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

pub async fn list_conversations(
    State(state): State<AppState>,
    params: ListParams,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit_or(DEFAULT_CONVERSATION_LIMIT);
    let skip = params.skip_or(0) as u64;

    let documents = state.librechat.list_conversations(limit, skip).await?;
    let conversations = encode_documents(documents, state.config.document_encoding)?;

    Ok(Json(json!({ "conversations": conversations })))
}

pub async fn list_messages(
    State(state): State<AppState>,
    LibreChatConversationId(conversation_id): LibreChatConversationId,
    params: ListParams,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit_or(DEFAULT_MESSAGE_LIMIT);

    let documents = state
        .librechat
        .list_messages(&conversation_id, limit)
        .await?;
    let messages = encode_documents(documents, state.config.document_encoding)?;

    Ok(Json(json!({ "messages": messages })))
}

pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let documents = state.librechat.list_users().await?;
    let users = encode_documents(documents, state.config.document_encoding)?;

    Ok(Json(json!({ "users": users })))
}
