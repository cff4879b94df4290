//! Per-repository counters
//!
//! - Counters only, monotonic
//! - Relaxed atomics; a snapshot is not a consistent cut across counters

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Repository operation counters
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    queries_executed: AtomicU64,
    queries_rejected: AtomicU64,
    /// Keys returned by `list`, folders included
    keys_listed: AtomicU64,
    /// Keys dropped by pushdown before any load
    keys_pruned: AtomicU64,
    records_loaded: AtomicU64,
    /// Keys listed but gone by the time they were read
    keys_vanished: AtomicU64,
    writes: AtomicU64,
    deletes: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_keys_listed(&self, count: u64) {
        self.keys_listed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_keys_pruned(&self, count: u64) {
        self.keys_pruned.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_records_loaded(&self, count: u64) {
        self.records_loaded.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_keys_vanished(&self, count: u64) {
        self.keys_vanished.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_writes(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_deletes(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cache_hits(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cache_misses(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies every counter into a plain value
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            keys_listed: self.keys_listed.load(Ordering::Relaxed),
            keys_pruned: self.keys_pruned.load(Ordering::Relaxed),
            records_loaded: self.records_loaded.load(Ordering::Relaxed),
            keys_vanished: self.keys_vanished.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub queries_executed: u64,
    pub queries_rejected: u64,
    pub keys_listed: u64,
    pub keys_pruned: u64,
    pub records_loaded: u64,
    pub keys_vanished: u64,
    pub writes: u64,
    pub deletes: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}
