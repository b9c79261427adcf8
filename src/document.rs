use crate::types::DocumentId;
use bson::{Bson, Document as BsonDocument};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Metadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Metadata {
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self { created_at: now, updated_at: now }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub data: BsonDocument,
    pub metadata: Metadata,
}

impl Document {
    /// Wraps `data` as a stored document. An existing string `_id` in the
    /// data is adopted as the document id; otherwise a fresh uuid is
    /// generated and stamped into the data, so reference lookups by `_id`
    /// always resolve.
    #[must_use]
    pub fn new(mut data: BsonDocument) -> Self {
        let id = match data.get("_id") {
            Some(Bson::String(s)) => DocumentId::from(s.as_str()),
            _ => {
                let id = DocumentId::new();
                data.insert("_id", id.as_str());
                id
            }
        };
        Self { id, data, metadata: Metadata::new() }
    }

    pub fn update(&mut self, new_data: BsonDocument) {
        self.data = new_data;
        if self.data.get("_id").is_none() {
            self.data.insert("_id", self.id.as_str());
        }
        self.metadata.updated_at = Utc::now();
    }
}
