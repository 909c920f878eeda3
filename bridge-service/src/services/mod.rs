pub mod chatwoot;
pub mod librechat;
pub mod metrics;

pub use self::chatwoot::ChatwootDb;
pub use self::librechat::LibreChatDb;
pub use self::metrics::{get_metrics, init_metrics, record_store_query};
