use crate::schema::Entity;
use bson::{Document, doc};

/// One `$lookup` per reference field, embedding the referenced documents
/// under the same field name as the id array they replace. Emitted before
/// every other stage so that sort and filter stages can reach into the
/// embedded documents.
#[must_use]
pub fn lookup_stages(entity: Entity) -> Vec<Document> {
    entity
        .reference_fields()
        .iter()
        .map(|r| {
            doc! {"$lookup": {
                "from": r.foreign_collection,
                "localField": r.local_field,
                "foreignField": "_id",
                "as": r.local_field,
            }}
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_lookups_cover_all_reference_fields() {
        let stages = lookup_stages(Entity::Event);
        assert_eq!(stages.len(), 3);
        let first = stages[0].get_document("$lookup").unwrap();
        assert_eq!(first.get_str("from").unwrap(), "users");
        assert_eq!(first.get_str("localField").unwrap(), "organizerList");
        assert_eq!(first.get_str("as").unwrap(), "organizerList");
    }

    #[test]
    fn entity_without_references_yields_no_stages() {
        assert!(lookup_stages(Entity::Venue).is_empty());
        assert!(lookup_stages(Entity::Notification).is_empty());
    }
}
