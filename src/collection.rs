use crate::document::Document;
use crate::types::DocumentId;
use bson::Document as BsonDocument;
use parking_lot::RwLock;

/// An insertion-ordered in-memory collection. Pipeline reads take a
/// snapshot of the data in insertion order, which is the collection-default
/// result order when no sort stage is present.
pub struct Collection {
    name: String,
    docs: RwLock<Vec<Document>>,
}

impl Collection {
    #[must_use]
    pub fn new(name: String) -> Self {
        Self { name, docs: RwLock::new(Vec::new()) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn insert_document(&self, doc: Document) -> DocumentId {
        let id = doc.id.clone();
        self.docs.write().push(doc);
        id
    }

    #[must_use]
    pub fn find_document(&self, id: &DocumentId) -> Option<Document> {
        self.docs.read().iter().find(|d| &d.id == id).cloned()
    }

    pub fn update_document(&self, id: &DocumentId, new_data: BsonDocument) -> bool {
        let mut docs = self.docs.write();
        match docs.iter_mut().find(|d| &d.id == id) {
            Some(doc) => {
                doc.update(new_data);
                true
            }
            None => false,
        }
    }

    pub fn delete_document(&self, id: &DocumentId) -> bool {
        let mut docs = self.docs.write();
        let before = docs.len();
        docs.retain(|d| &d.id != id);
        docs.len() != before
    }

    pub fn list_ids(&self) -> Vec<DocumentId> {
        self.docs.read().iter().map(|d| d.id.clone()).collect()
    }

    /// Snapshot of the raw document data in insertion order.
    #[must_use]
    pub fn documents(&self) -> Vec<BsonDocument> {
        self.docs.read().iter().map(|d| d.data.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn insert_adopts_existing_id() {
        let col = Collection::new("venues".into());
        let id = col.insert_document(Document::new(doc! {"_id": "v1", "name": "The Hall"}));
        assert_eq!(id.as_str(), "v1");
        assert!(col.find_document(&id).is_some());
    }

    #[test]
    fn delete_and_order() {
        let col = Collection::new("venues".into());
        let a = col.insert_document(Document::new(doc! {"name": "a"}));
        let b = col.insert_document(Document::new(doc! {"name": "b"}));
        assert_eq!(col.list_ids(), vec![a.clone(), b.clone()]);
        assert!(col.delete_document(&a));
        assert!(!col.delete_document(&a));
        let snapshot = col.documents();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].get_str("name").unwrap(), "b");
    }

    #[test]
    fn update_replaces_data_and_keeps_id() {
        let col = Collection::new("venues".into());
        let id = col.insert_document(Document::new(doc! {"name": "old"}));
        assert!(col.update_document(&id, doc! {"name": "new"}));
        let doc = col.find_document(&id).unwrap();
        assert_eq!(doc.data.get_str("name").unwrap(), "new");
        assert_eq!(doc.data.get_str("_id").unwrap(), id.as_str());
        assert!(!col.update_document(&DocumentId::from("missing"), doc! {}));
    }
}
