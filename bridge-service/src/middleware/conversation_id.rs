use axum::async_trait;
use axum::extract::{FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use service_core::error::AppError;

/// Numeric conversation id taken from the last path segment.
///
/// Only plain decimal digits are accepted. Anything else (signs, letters, an
/// overflowing number) is answered with 404 before the handler runs, exactly as
/// if the route did not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatwootConversationId(pub i64);

impl ChatwootConversationId {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        raw.parse().ok().map(ChatwootConversationId)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ChatwootConversationId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound("Not Found".to_string()))?;

        ChatwootConversationId::parse(&raw).ok_or_else(|| {
            tracing::debug!(segment = %raw, "Rejected non-numeric conversation id");
            AppError::NotFound("Not Found".to_string())
        })
    }
}

/// Rejects a malformed Chatwoot id with 404 ahead of any inner layer, so the
/// route behaves as unmatched whether or not the caller is authenticated.
pub async fn require_conversation_id(
    _id: ChatwootConversationId,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}

/// LibreChat conversation id, taken verbatim from the path. A segment that does
/// not decode to UTF-8 is a 400 with a JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibreChatConversationId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for LibreChatConversationId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<String>::from_request_parts(parts, state)
            .await
            .map(|Path(raw)| LibreChatConversationId(raw))
            .map_err(|rejection| {
                tracing::debug!(error = %rejection, "Rejected conversation id");
                AppError::BadRequest("Invalid conversation id".to_string())
            })
    }
}
