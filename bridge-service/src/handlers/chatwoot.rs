use crate::middleware::ChatwootConversationId;
use crate::models::{ListParams, DEFAULT_CONVERSATION_LIMIT, DEFAULT_MESSAGE_LIMIT};
use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

pub async fn list_conversations(
    State(state): State<AppState>,
    params: ListParams,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit_or(DEFAULT_CONVERSATION_LIMIT);
    let offset = params.offset_or(0);

    let conversations = state.chatwoot.list_conversations(limit, offset).await?;

    Ok(Json(json!({ "conversations": conversations })))
}

pub async fn list_messages(
    State(state): State<AppState>,
    ChatwootConversationId(conversation_id): ChatwootConversationId,
    params: ListParams,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit_or(DEFAULT_MESSAGE_LIMIT);

    let messages = state
        .chatwoot
        .list_messages(conversation_id, limit)
        .await?;

    Ok(Json(json!({ "messages": messages })))
}
