//! Observability for vaultrepo
//!
//! - Structured JSON logging with a process-wide minimum severity
//! - Typed event names
//! - Begin/outcome scopes for multi-step operations
//! - Per-repository counters
//!
//! Observability is read-only: nothing here changes what a query returns.
//!
//! ```ignore
//! use vaultrepo::observability::{Event, Logger, ObservationScope};
//!
//! Logger::trace(Event::QueryExecuted.as_str(), &[("method", "findAll")]);
//!
//! let scope = ObservationScope::new(Event::RepositoryBootstrap);
//! scope.complete();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::ObservationScope;

/// Logs a non-scope event at its usual severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    match event {
        Event::QueryFailed | Event::QueryMethodRejected => Logger::warn(event.as_str(), fields),
        Event::RepositoryBootstrap | Event::CollectionClear => {
            Logger::info(event.as_str(), fields)
        }
        _ => Logger::trace(event.as_str(), fields),
    }
}
