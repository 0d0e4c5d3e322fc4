//! Cache key definitions.
//!
//! Every key string the crate ever reads, writes, or invalidates is
//! produced here, so the read path and the invalidation path cannot drift
//! on key format. Key segments (ids, grouping values) must not contain
//! `:`; ids are store-assigned UUIDs and grouping values are ids or closed
//! enum tokens, which guarantees this by construction.

use std::fmt;

use crate::domain::types::Page;

/// Entity kinds the cache knows about; `as_str` is the key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Comment,
    Post,
    Company,
    Reservation,
    Trip,
    Location,
    ItineraryItem,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Comment => "comment",
            EntityKind::Post => "post",
            EntityKind::Company => "company",
            EntityKind::Reservation => "reservation",
            EntityKind::Trip => "trip",
            EntityKind::Location => "location",
            EntityKind::ItineraryItem => "itinerary",
        }
    }
}

/// Key for a single cached entity: `<entity>:<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    kind: EntityKind,
    id: String,
}

impl ObjectKey {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.id)
    }
}

/// A grouping field and its value, e.g. `by_post:<post id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grouping {
    name: &'static str,
    value: String,
}

impl Grouping {
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Key for one cached page of an ID list:
/// `<entity>:by_<grouping>:<value>:page:<page>:<size>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionKey {
    kind: EntityKind,
    grouping: Grouping,
    page: Page,
}

impl CollectionKey {
    pub fn new(kind: EntityKind, grouping: Grouping, page: Page) -> Self {
        Self {
            kind,
            grouping,
            page,
        }
    }

    /// The invalidation prefix covering every page of this collection.
    pub fn prefix(&self) -> CollectionPrefix {
        CollectionPrefix::new(self.kind, self.grouping.clone())
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:by_{}:{}:page:{}:{}",
            self.kind.as_str(),
            self.grouping.name,
            self.grouping.value,
            self.page.number(),
            self.page.size()
        )
    }
}

/// Prefix matching every page of one grouping value:
/// `<entity>:by_<grouping>:<value>:page:`.
///
/// The trailing `page:` segment keeps the prefix from swallowing alias
/// keys, which share the `by_` shape but never paginate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPrefix {
    kind: EntityKind,
    grouping: Grouping,
}

impl CollectionPrefix {
    pub fn new(kind: EntityKind, grouping: Grouping) -> Self {
        Self { kind, grouping }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }
}

impl fmt::Display for CollectionPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:by_{}:{}:page:",
            self.kind.as_str(),
            self.grouping.name,
            self.grouping.value
        )
    }
}

/// Key for a secondary unique lookup: `<entity>:by_<name>:<value>`.
///
/// An alias entry stores the primary id as plain text, never a record; the
/// record itself lives only under its object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AliasKey {
    kind: EntityKind,
    name: &'static str,
    value: String,
}

impl AliasKey {
    pub fn new(kind: EntityKind, name: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            name,
            value: value.into(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }
}

impl fmt::Display for AliasKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:by_{}:{}",
            self.kind.as_str(),
            self.name,
            self.value
        )
    }
}

// ============================================================================
// Per-entity constructors
// ============================================================================

/// Grouping constructors per entity, kept together so every call site
/// agrees on field names.
impl Grouping {
    pub fn comments_of_post(post_id: impl Into<String>) -> Self {
        Self::new("post", post_id)
    }

    pub fn comments_of_author(author_id: impl Into<String>) -> Self {
        Self::new("author", author_id)
    }

    pub fn replies_of_comment(parent_id: impl Into<String>) -> Self {
        Self::new("parent", parent_id)
    }

    pub fn posts_of_author(author_id: impl Into<String>) -> Self {
        Self::new("author", author_id)
    }

    pub fn posts_of_parent(parent_id: impl Into<String>) -> Self {
        Self::new("parent", parent_id)
    }

    pub fn companies_of_status(status: &'static str) -> Self {
        Self::new("status", status)
    }

    pub fn reservations_of_user(user_id: impl Into<String>) -> Self {
        Self::new("user", user_id)
    }

    pub fn itinerary_of_trip(trip_id: impl Into<String>) -> Self {
        Self::new("trip", trip_id)
    }
}

impl AliasKey {
    /// Registry-number lookup for companies.
    pub fn company_registry(registry_id: impl Into<String>) -> Self {
        Self::new(EntityKind::Company, "registry", registry_id)
    }
}
