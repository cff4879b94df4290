//! CLI command tests
//!
//! Runs `query` and `explain` against config and data files in a temporary
//! directory.

use std::fs;
use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;
use vaultrepo::cli::{explain, parse_sort, query, CliErrorCode, QueryRequest};
use vaultrepo::planner::ReturnShape;
use vaultrepo::MethodSignature;

struct Fixture {
    _dir: TempDir,
    config: PathBuf,
    data: PathBuf,
}

fn fixture(config: &str) -> Fixture {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("vaultrepo.json");
    let data_path = dir.path().join("people.json");
    fs::write(&config_path, config).unwrap();
    fs::write(
        &data_path,
        json!({
            "walter": { "firstname": "Walter" },
            "skyler": { "firstname": "Skyler" },
            "walt-jr": { "id": "ignored", "firstname": "Walter Jr" }
        })
        .to_string(),
    )
    .unwrap();
    Fixture {
        _dir: dir,
        config: config_path,
        data: data_path,
    }
}

fn people() -> Fixture {
    fixture(r#"{ "collection": "secret/people" }"#)
}

fn request(method: &str, returns: ReturnShape) -> QueryRequest {
    QueryRequest {
        method: method.to_string(),
        values: Vec::new(),
        sort: None,
        limit: None,
        returns,
    }
}

// =============================================================================
// query
// =============================================================================

#[test]
fn test_query_prefix() {
    let f = people();
    let mut req = request("findByIdStartsWith", ReturnShape::List);
    req.values.push("walt".to_string());

    let data = query(&f.config, &f.data, &req).unwrap();
    assert_eq!(
        data,
        json!([
            { "id": "walt-jr", "firstname": "Walter Jr" },
            { "id": "walter", "firstname": "Walter" }
        ])
    );
}

/// Runtime sort and limit flags become trailing parameters.
#[test]
fn test_query_sort_and_limit() {
    let f = people();
    let mut req = request("findAllBy", ReturnShape::List);
    req.sort = parse_sort(&["firstname:desc".to_string()]).unwrap();
    req.limit = Some(2);

    let data = query(&f.config, &f.data, &req).unwrap();
    let ids: Vec<&str> = data
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["walt-jr", "walter"]);
}

#[test]
fn test_query_scalar_shapes() {
    let f = people();

    let mut count = request("countByIdStartsWith", ReturnShape::Count);
    count.values.push("w".to_string());
    assert_eq!(query(&f.config, &f.data, &count).unwrap(), json!(2));

    let mut exists = request("existsByIdStartsWith", ReturnShape::Boolean);
    exists.values.push("jesse".to_string());
    assert_eq!(query(&f.config, &f.data, &exists).unwrap(), json!(false));

    let mut one = request("findById", ReturnShape::Optional);
    one.values.push("skyler".to_string());
    assert_eq!(
        query(&f.config, &f.data, &one).unwrap(),
        json!({ "id": "skyler", "firstname": "Skyler" })
    );
}

/// Lazy config: the rejection surfaces when the query runs.
#[test]
fn test_query_unsupported_property() {
    let f = people();
    let mut req = request("findByFirstname", ReturnShape::List);
    req.values.push("Walter".to_string());

    let err = query(&f.config, &f.data, &req).unwrap_err();
    assert_eq!(err.code(), &CliErrorCode::QueryFailed);
    assert_eq!(err.code_str(), "VAULT_QUERY_UNSUPPORTED_PROPERTY");
}

/// Eager config: the same method fails at bootstrap with the same code.
#[test]
fn test_query_unsupported_property_eager() {
    let f = fixture(r#"{ "collection": "secret/people", "validation": "eager" }"#);
    let mut req = request("findByFirstname", ReturnShape::List);
    req.values.push("Walter".to_string());

    let err = query(&f.config, &f.data, &req).unwrap_err();
    assert_eq!(err.code_str(), "VAULT_QUERY_UNSUPPORTED_PROPERTY");
}

#[test]
fn test_query_bad_config() {
    let f = fixture(r#"{ "collection": "secret/people", "cache": true }"#);
    let err = query(&f.config, &f.data, &request("findAll", ReturnShape::List)).unwrap_err();
    assert_eq!(err.code(), &CliErrorCode::ConfigError);
}

#[test]
fn test_query_missing_data_file() {
    let f = people();
    let missing = f.data.with_file_name("absent.json");
    let err = query(&f.config, &missing, &request("findAll", ReturnShape::List)).unwrap_err();
    assert_eq!(err.code(), &CliErrorCode::IoError);
}

// =============================================================================
// explain
// =============================================================================

#[test]
fn test_explain_prefix_pushdown() {
    let plan = explain(&MethodSignature::list("findByIdStartsWith").value_param());
    assert!(plan.accepted);
    assert!(!plan.pushdown.is_empty());
    assert!(plan.rejection_code.is_none());
}

#[test]
fn test_explain_unsupported_property() {
    let plan = explain(&MethodSignature::list("findByFirstname").value_param());
    assert!(!plan.accepted);
    assert_eq!(
        plan.rejection_code.as_deref(),
        Some("VAULT_QUERY_UNSUPPORTED_PROPERTY")
    );
}
