//! Typed lifecycle events
//!
//! Event names are stable strings; log consumers match on them.

use std::fmt;

/// Events emitted by repositories and executors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    // Bootstrap (scope name; logged with _BEGIN/_COMPLETE/_FAILED)
    RepositoryBootstrap,

    // Planning
    QueryMethodParsed,
    QueryMethodRejected,

    // Execution
    QueryExecuted,
    QueryFailed,
    KeyVanished,

    // Writes
    EntitySaved,
    EntityDeleted,

    // Collection clear (scope name)
    CollectionClear,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RepositoryBootstrap => "REPOSITORY_BOOTSTRAP",
            Event::QueryMethodParsed => "QUERY_METHOD_PARSED",
            Event::QueryMethodRejected => "QUERY_METHOD_REJECTED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryFailed => "QUERY_FAILED",
            Event::KeyVanished => "KEY_VANISHED",
            Event::EntitySaved => "ENTITY_SAVED",
            Event::EntityDeleted => "ENTITY_DELETED",
            Event::CollectionClear => "COLLECTION_CLEAR",
        }
    }

    /// Returns true for names used as observation scope prefixes
    pub fn is_scope(&self) -> bool {
        matches!(self, Event::RepositoryBootstrap | Event::CollectionClear)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
