use crate::error::AppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;
use subtle::ConstantTimeEq;

pub const API_KEY_HEADER: &str = "x-api-key";

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized - Invalid API key";

/// Shared-secret check for protected routes. One key for every caller.
#[derive(Clone)]
pub struct ApiKeyGuard {
    expected: Arc<Secret<String>>,
}

impl ApiKeyGuard {
    pub fn new(expected: Secret<String>) -> Self {
        Self {
            expected: Arc::new(expected),
        }
    }

    /// Exact match against the configured key; a missing header never matches.
    pub fn verify(&self, presented: Option<&str>) -> bool {
        match presented {
            Some(key) => {
                let expected = self.expected.expose_secret().as_bytes();
                // ct_eq on slices of different length is false without a byte compare
                expected.ct_eq(key.as_bytes()).into()
            }
            None => false,
        }
    }
}

pub async fn api_key_middleware(
    State(guard): State<ApiKeyGuard>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if guard.verify(presented) {
        return next.run(request).await;
    }

    tracing::warn!(
        path = %request.uri().path(),
        header_present = presented.is_some(),
        "Rejected request with invalid API key"
    );
    AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()).into_response()
}
