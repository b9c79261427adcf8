use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatherlyError {
    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("BSON: {0}")]
    Bson(#[from] bson::error::Error),

    #[error("Collection not found: {0}")]
    NoSuchCollection(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Query error: {0}")]
    Query(String),

    #[error("Realtime error: {0}")]
    Realtime(String),
}
