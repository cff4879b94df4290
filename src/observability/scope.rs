//! ObservationScope for bracketed begin/complete logging
//!
//! - `{name}_BEGIN` on creation
//! - `{name}_COMPLETE` or `{name}_FAILED` when closed
//! - `{name}_INCOMPLETE` if dropped while still open

use std::cell::Cell;

use super::events::Event;
use super::logger::Logger;

/// A scope that logs begin and outcome events for a multi-step operation
///
/// ```ignore
/// let scope = ObservationScope::with_fields(Event::CollectionClear, &[("collection", "people")]);
/// // ... delete keys ...
/// scope.complete_with_fields(&[("removed", "2")]);
/// ```
pub struct ObservationScope {
    name: &'static str,
    closed: Cell<bool>,
    fields: Vec<(&'static str, String)>,
}

impl ObservationScope {
    pub fn new(event: Event) -> Self {
        Self::with_fields(event, &[])
    }

    /// Creates a scope whose fields are repeated on every event it logs
    pub fn with_fields(event: Event, fields: &[(&'static str, &str)]) -> Self {
        let scope = Self {
            name: event.as_str(),
            closed: Cell::new(false),
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
        };
        scope.emit_info("BEGIN", &[]);
        scope
    }

    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    pub fn complete_with_fields(self, extra: &[(&str, &str)]) {
        self.closed.set(true);
        self.emit_info("COMPLETE", extra);
    }

    /// Logs `{name}_FAILED` at ERROR level
    pub fn fail(self, reason: &str) {
        self.fail_with_fields(reason, &[]);
    }

    pub fn fail_with_fields(self, reason: &str, extra: &[(&str, &str)]) {
        self.closed.set(true);
        let event = format!("{}_FAILED", self.name);
        let mut fields = self.field_refs();
        fields.push(("reason", reason));
        fields.extend(extra.iter().copied());
        Logger::error(&event, &fields);
    }

    pub fn is_completed(&self) -> bool {
        self.closed.get()
    }

    fn emit_info(&self, suffix: &str, extra: &[(&str, &str)]) {
        let event = format!("{}_{}", self.name, suffix);
        let mut fields = self.field_refs();
        fields.extend(extra.iter().copied());
        Logger::info(&event, &fields);
    }

    fn field_refs(&self) -> Vec<(&str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.closed.get() {
            let event = format!("{}_INCOMPLETE", self.name);
            Logger::warn(&event, &[("reason", "scope dropped without completion")]);
        }
    }
}
