pub mod api_key;
pub mod metrics;
pub mod security_headers;
pub mod tracing;

pub use self::api_key::{API_KEY_HEADER, ApiKeyGuard, UNAUTHORIZED_MESSAGE, api_key_middleware};
pub use self::metrics::metrics_middleware;
pub use self::security_headers::security_headers_middleware;
pub use self::tracing::{REQUEST_ID_HEADER, request_id_middleware};
