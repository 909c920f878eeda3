pub mod chatwoot;
pub mod health;
pub mod librechat;

pub use health::{health_check, metrics_endpoint, not_found, readiness_check, SERVICE_NAME};
