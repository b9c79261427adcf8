//! Static entity catalog: collection names and reference-field tables.
//!
//! Reference fields are id arrays that the lookup stages replace with the
//! referenced documents. The tables are explicit configuration, consulted
//! by both the lookup builder and nested-filter path detection.

/// One id-array field and the collection its ids point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceField {
    pub local_field: &'static str,
    pub foreign_collection: &'static str,
}

const EVENT_REFS: &[ReferenceField] = &[
    ReferenceField { local_field: "organizerList", foreign_collection: "users" },
    ReferenceField { local_field: "rsvpList", foreign_collection: "rsvps" },
    ReferenceField { local_field: "categoryList", foreign_collection: "event_categories" },
];

const ORGANIZATION_REFS: &[ReferenceField] =
    &[ReferenceField { local_field: "memberList", foreign_collection: "users" }];

const NO_REFS: &[ReferenceField] = &[];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Organization,
    User,
    Event,
    EventCategory,
    Venue,
    Rsvp,
    ChatMessage,
    Notification,
}

impl Entity {
    pub const ALL: [Self; 8] = [
        Self::Organization,
        Self::User,
        Self::Event,
        Self::EventCategory,
        Self::Venue,
        Self::Rsvp,
        Self::ChatMessage,
        Self::Notification,
    ];

    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Organization => "organizations",
            Self::User => "users",
            Self::Event => "events",
            Self::EventCategory => "event_categories",
            Self::Venue => "venues",
            Self::Rsvp => "rsvps",
            Self::ChatMessage => "chat_messages",
            Self::Notification => "notifications",
        }
    }

    /// Singular name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::User => "user",
            Self::Event => "event",
            Self::EventCategory => "event category",
            Self::Venue => "venue",
            Self::Rsvp => "rsvp",
            Self::ChatMessage => "chat message",
            Self::Notification => "notification",
        }
    }

    #[must_use]
    pub const fn reference_fields(self) -> &'static [ReferenceField] {
        match self {
            Self::Event => EVENT_REFS,
            Self::Organization => ORGANIZATION_REFS,
            _ => NO_REFS,
        }
    }

    /// Whether `field` names one of this entity's embedded reference arrays.
    #[must_use]
    pub fn is_reference_field(self, field: &str) -> bool {
        self.reference_fields().iter().any(|r| r.local_field == field)
    }
}
