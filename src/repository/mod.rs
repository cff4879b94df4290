//! Repository surface for vaultrepo
//!
//! A repository binds an entity type to one collection of a secret store
//! and exposes two kinds of operations:
//!
//! - CRUD: `save`, `find_by_id`, `find_all`, `count`, `delete_all`, ...
//! - Derived queries: methods declared by signature and invoked by name
//!
//! ```ignore
//! let repo: Repository<Person, _> = Repository::with_methods(
//!     MemorySecretStore::new(),
//!     RepositoryConfig::new("secret/people"),
//!     [MethodSignature::list("findByIdStartsWith").value_param()],
//! )?;
//! let people = repo.invoke_list("findByIdStartsWith", &["walt".into()])?;
//! ```

mod errors;
mod repository;

pub use errors::{BootstrapError, BootstrapResult};
pub use repository::Repository;
