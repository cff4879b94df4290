//! Secret store client subsystem for vaultrepo
//!
//! The store exposes only key-addressed primitives:
//!
//! - `get(path)`: read the named-field record at a path, or nothing
//! - `put(path, fields)`: write a record
//! - `delete(path)`: remove a record (missing paths are a no-op)
//! - `list(prefix)`: immediate child segments of a prefix, non-recursive
//!
//! Everything above this layer (filtering, ordering, limits) is built
//! from these four calls.

mod client;
mod errors;
mod memory;
mod path;

pub use client::{SecretFields, SecretStore};
pub use errors::{StoreError, StoreResult};
pub use memory::MemorySecretStore;
pub use path::{is_folder_segment, join_path};
