//! Store failure tests
//!
//! Backend errors reach the caller unchanged, partial deletes stay
//! partial, and keys removed between `list` and `get` are treated as absent.

mod common;

use common::{ids, skyler, walter, FailingStore, Op, Person, VanishingStore, PEOPLE};
use vaultrepo::entity::to_fields;
use vaultrepo::store::join_path;
use vaultrepo::{MethodSignature, Repository, RepositoryConfig, SecretStore, StoreError};

fn declared() -> Vec<MethodSignature> {
    vec![
        MethodSignature::list("findByIdStartsWith").value_param(),
        MethodSignature::optional("findById").value_param(),
        MethodSignature::count("countByIdStartsWith").value_param(),
    ]
}

fn failing(op: Op, nth: usize, error: StoreError) -> Repository<Person, FailingStore> {
    let repo = Repository::with_methods(
        FailingStore::new(op, nth, error),
        RepositoryConfig::new(PEOPLE),
        declared(),
    )
    .unwrap();
    for person in [walter(), skyler()] {
        let fields = to_fields(&person).unwrap();
        repo.store()
            .inner
            .put(&join_path(PEOPLE, &person.id), &fields)
            .unwrap();
    }
    repo
}

// =============================================================================
// Passthrough
// =============================================================================

/// A denied list surfaces as the original store error.
#[test]
fn test_list_error_passthrough() {
    let denied = StoreError::PermissionDenied(PEOPLE.to_string());
    let repo = failing(Op::List, 1, denied.clone());

    let err = repo
        .invoke_list("findByIdStartsWith", &["w".into()])
        .unwrap_err();
    assert_eq!(err.code(), "VAULT_BACKEND_ERROR");
    assert_eq!(err.backend(), Some(&denied));
    assert_eq!(err.to_string(), denied.to_string());

    // the next call goes through
    let found = repo
        .invoke_list("findByIdStartsWith", &["w".into()])
        .unwrap();
    assert_eq!(found, vec![walter()]);
}

/// A failed load aborts the whole query.
#[test]
fn test_get_error_passthrough() {
    let sealed = StoreError::Unavailable("sealed".to_string());
    let repo = failing(Op::Get, 2, sealed.clone());

    let err = repo.find_all().unwrap_err();
    assert_eq!(err.backend(), Some(&sealed));
}

/// Point reads pass errors through too.
#[test]
fn test_point_read_error() {
    let sealed = StoreError::Unavailable("sealed".to_string());
    let repo = failing(Op::Get, 1, sealed.clone());

    let err = repo.invoke_optional("findById", &["walter".into()]).unwrap_err();
    assert_eq!(err.backend(), Some(&sealed));
}

/// Writes surface backend errors and leave nothing behind.
#[test]
fn test_save_error() {
    let denied = StoreError::PermissionDenied("write".to_string());
    let repo = failing(Op::Put, 1, denied.clone());

    let err = repo.save(Person::new("jesse", "Jesse")).unwrap_err();
    assert_eq!(err.backend(), Some(&denied));
    assert_eq!(repo.find_by_id("jesse").unwrap(), None);
}

// =============================================================================
// Partial deleteAll
// =============================================================================

/// A failure on the second delete leaves the first removal in place.
#[test]
fn test_delete_all_partial_failure() {
    let unavailable = StoreError::Unavailable("standby".to_string());
    let repo = failing(Op::Delete, 2, unavailable.clone());

    let err = repo.delete_all().unwrap_err();
    assert_eq!(err.backend(), Some(&unavailable));

    // listing order is ascending, so skyler went first
    let left = repo.find_all().unwrap();
    assert_eq!(ids(&left), vec!["walter"]);
    assert_eq!(repo.metrics().deletes, 1);
}

// =============================================================================
// Vanished keys
// =============================================================================

/// A key deleted between list and get is skipped, not an error.
#[test]
fn test_vanished_key_is_absent() {
    let repo: Repository<Person, VanishingStore> = Repository::with_methods(
        VanishingStore::default(),
        RepositoryConfig::new(PEOPLE),
        declared(),
    )
    .unwrap();
    repo.save_all([walter(), skyler()]).unwrap();
    repo.store().doom("secret/people/walter");

    let found = repo
        .invoke_list("findByIdStartsWith", &["".into()])
        .unwrap();
    assert_eq!(found, vec![skyler()]);
    assert_eq!(repo.metrics().keys_vanished, 1);
}

/// Counts skip vanished keys as well.
#[test]
fn test_vanished_key_not_counted() {
    let repo: Repository<Person, VanishingStore> = Repository::with_methods(
        VanishingStore::default(),
        RepositoryConfig::new(PEOPLE),
        declared(),
    )
    .unwrap();
    repo.save_all([walter(), skyler()]).unwrap();
    repo.store().doom("secret/people/skyler");

    assert_eq!(
        repo.invoke_count("countByIdStartsWith", &["".into()]).unwrap(),
        1
    );
}
