//! Shared fixtures and store doubles for integration tests

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use vaultrepo::store::{MemorySecretStore, SecretFields, SecretStore, StoreError, StoreResult};
use vaultrepo::Entity;

pub const PEOPLE: &str = "secret/people";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub firstname: String,
}

impl Person {
    pub fn new(id: &str, firstname: &str) -> Self {
        Self {
            id: id.to_string(),
            firstname: firstname.to_string(),
        }
    }
}

impl Entity for Person {
    fn id(&self) -> &str {
        &self.id
    }
}

pub fn walter() -> Person {
    Person::new("walter", "Walter")
}

pub fn skyler() -> Person {
    Person::new("skyler", "Skyler")
}

pub fn ids(people: &[Person]) -> Vec<&str> {
    people.iter().map(|p| p.id.as_str()).collect()
}

/// Store operations a double can count or fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Get,
    Put,
    Delete,
    List,
}

/// Counts calls per operation
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemorySecretStore,
    gets: AtomicUsize,
    puts: AtomicUsize,
    deletes: AtomicUsize,
    lists: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self, op: Op) -> usize {
        self.counter(op).load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        for op in [Op::Get, Op::Put, Op::Delete, Op::List] {
            self.counter(op).store(0, Ordering::SeqCst);
        }
    }

    fn counter(&self, op: Op) -> &AtomicUsize {
        match op {
            Op::Get => &self.gets,
            Op::Put => &self.puts,
            Op::Delete => &self.deletes,
            Op::List => &self.lists,
        }
    }
}

impl SecretStore for CountingStore {
    fn get(&self, path: &str) -> StoreResult<Option<SecretFields>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(path)
    }

    fn put(&self, path: &str, fields: &SecretFields) -> StoreResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(path, fields)
    }

    fn delete(&self, path: &str) -> StoreResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(path)
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.inner.list(prefix)
    }
}

/// Fails the nth call (1-based) of one operation; every other call passes
pub struct FailingStore {
    pub inner: MemorySecretStore,
    op: Op,
    nth: usize,
    seen: AtomicUsize,
    error: StoreError,
}

impl FailingStore {
    pub fn new(op: Op, nth: usize, error: StoreError) -> Self {
        Self {
            inner: MemorySecretStore::new(),
            op,
            nth,
            seen: AtomicUsize::new(0),
            error,
        }
    }

    fn check(&self, op: Op) -> StoreResult<()> {
        if op == self.op && self.seen.fetch_add(1, Ordering::SeqCst) + 1 == self.nth {
            return Err(self.error.clone());
        }
        Ok(())
    }
}

impl SecretStore for FailingStore {
    fn get(&self, path: &str) -> StoreResult<Option<SecretFields>> {
        self.check(Op::Get)?;
        self.inner.get(path)
    }

    fn put(&self, path: &str, fields: &SecretFields) -> StoreResult<()> {
        self.check(Op::Put)?;
        self.inner.put(path, fields)
    }

    fn delete(&self, path: &str) -> StoreResult<()> {
        self.check(Op::Delete)?;
        self.inner.delete(path)
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        self.check(Op::List)?;
        self.inner.list(prefix)
    }
}

/// Deletes marked paths right after they are listed, as a concurrent
/// writer would between `list` and `get`
#[derive(Default)]
pub struct VanishingStore {
    pub inner: MemorySecretStore,
    doomed: Mutex<HashSet<String>>,
}

impl VanishingStore {
    pub fn doom(&self, path: &str) {
        self.doomed.lock().unwrap().insert(path.to_string());
    }
}

impl SecretStore for VanishingStore {
    fn get(&self, path: &str) -> StoreResult<Option<SecretFields>> {
        self.inner.get(path)
    }

    fn put(&self, path: &str, fields: &SecretFields) -> StoreResult<()> {
        self.inner.put(path, fields)
    }

    fn delete(&self, path: &str) -> StoreResult<()> {
        self.inner.delete(path)
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let keys = self.inner.list(prefix)?;
        let doomed: Vec<String> = self.doomed.lock().unwrap().drain().collect();
        for path in doomed {
            self.inner.delete(&path)?;
        }
        Ok(keys)
    }
}
