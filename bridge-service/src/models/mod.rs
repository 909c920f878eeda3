pub mod columns;
pub mod documents;
pub mod pagination;

pub use columns::{map_row, Column, ColumnKind, JsonRow, CONVERSATION_COLUMNS, MESSAGE_COLUMNS};
pub use documents::{encode_documents, to_extended_json};
pub use pagination::{ListParams, DEFAULT_CONVERSATION_LIMIT, DEFAULT_MESSAGE_LIMIT};
