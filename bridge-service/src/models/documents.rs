use crate::config::DocumentEncoding;
use mongodb::bson::{Bson, Document};
use serde_json::Value;
use service_core::error::AppError;

/// Relaxed extended JSON: ObjectIds become `{"$oid": ..}`, dates `{"$date": ..}`.
pub fn to_extended_json(documents: Vec<Document>) -> Value {
    Value::Array(
        documents
            .into_iter()
            .map(|document| Bson::Document(document).into_relaxed_extjson())
            .collect(),
    )
}

pub fn encode_documents(
    documents: Vec<Document>,
    encoding: DocumentEncoding,
) -> Result<Value, AppError> {
    let extended = to_extended_json(documents);
    match encoding {
        DocumentEncoding::Legacy => serde_json::to_string(&extended)
            .map(Value::String)
            .map_err(|e| AppError::InternalError(e.into())),
        DocumentEncoding::Native => Ok(extended),
    }
}
