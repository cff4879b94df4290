//! CLI command implementations
//!
//! Commands build a method signature from flags, so a query method can be
//! tried without declaring it in code. `query` seeds an in-memory store
//! from a data file; nothing is persisted.

use std::path::Path;

use serde_json::{Map, Value};

use crate::config::RepositoryConfig;
use crate::entity::DynamicEntity;
use crate::executor::{Argument, QueryResult};
use crate::planner::{
    ExplainPlan, MethodNameParser, MethodSignature, OrderSpec, ReturnShape, SortSpec,
};
use crate::repository::Repository;
use crate::store::MemorySecretStore;

use super::args::{Cli, Command, ParamArg};
use super::errors::{CliError, CliResult};
use super::io::{read_data_file, write_error, write_response, write_text};

/// Parses process arguments and runs the command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Explain {
            method,
            params,
            returns,
            json,
        } => {
            let plan = explain(&explain_signature(method, &params, returns.into()));
            if json {
                write_response(serde_json::to_value(&plan)?)
            } else {
                write_text(&plan.to_string())
            }
        }
        Command::Query {
            config,
            data,
            method,
            args,
            sort,
            limit,
            returns,
        } => {
            let outcome = parse_sort(&sort).and_then(|sort| {
                let request = QueryRequest {
                    method,
                    values: args,
                    sort,
                    limit,
                    returns: returns.into(),
                };
                query(&config, &data, &request)
            });
            match outcome {
                Ok(data) => write_response(data),
                Err(err) => {
                    write_error(err.code_str(), err.message())?;
                    Err(err)
                }
            }
        }
    }
}

fn explain_signature(method: String, params: &[ParamArg], returns: ReturnShape) -> MethodSignature {
    params
        .iter()
        .fold(MethodSignature::new(method, returns), |sig, param| {
            sig.param((*param).into())
        })
}

/// Explains a signature. Rejected names produce a rejected plan, not an error.
pub fn explain(signature: &MethodSignature) -> ExplainPlan {
    match MethodNameParser::parse(signature) {
        Ok(descriptor) => ExplainPlan::from_descriptor(&descriptor),
        Err(err) => ExplainPlan::from_error(&err),
    }
}

/// One query invocation described by command-line flags
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub method: String,
    /// Predicate values, declared as leading value parameters
    pub values: Vec<String>,
    /// Declares a trailing sort parameter when present
    pub sort: Option<OrderSpec>,
    /// Declares a trailing limit parameter when present
    pub limit: Option<usize>,
    pub returns: ReturnShape,
}

impl QueryRequest {
    /// Signature implied by the supplied flags: values, then sort, then limit
    pub fn signature(&self) -> MethodSignature {
        let mut signature = MethodSignature::new(self.method.clone(), self.returns);
        for _ in &self.values {
            signature = signature.value_param();
        }
        if self.sort.is_some() {
            signature = signature.sort_param();
        }
        if self.limit.is_some() {
            signature = signature.limit_param();
        }
        signature
    }

    pub fn arguments(&self) -> Vec<Argument> {
        let mut args: Vec<Argument> = self.values.iter().map(|v| v.as_str().into()).collect();
        if let Some(order) = &self.sort {
            args.push(Argument::Sort(order.clone()));
        }
        if let Some(limit) = self.limit {
            args.push(Argument::Limit(limit));
        }
        args
    }
}

/// Parses `property` or `property:asc|desc` flags into one ordering
pub fn parse_sort(specs: &[String]) -> CliResult<Option<OrderSpec>> {
    if specs.is_empty() {
        return Ok(None);
    }

    let mut order = OrderSpec::unsorted();
    for spec in specs {
        let (property, direction) = match spec.split_once(':') {
            Some((property, direction)) => (property, direction),
            None => (spec.as_str(), "asc"),
        };
        if property.is_empty() {
            return Err(CliError::invalid_argument(format!(
                "sort '{}' names no property",
                spec
            )));
        }
        let sort = match direction.to_ascii_lowercase().as_str() {
            "asc" => SortSpec::asc(property),
            "desc" => SortSpec::desc(property),
            other => {
                return Err(CliError::invalid_argument(format!(
                    "sort '{}' has unknown direction '{}'",
                    spec, other
                )))
            }
        };
        order = order.and(sort);
    }
    Ok(Some(order))
}

/// Loads config and data, then runs the request
pub fn query(config_path: &Path, data_path: &Path, request: &QueryRequest) -> CliResult<Value> {
    let config = RepositoryConfig::load(config_path)?;
    let entries = read_data_file(data_path)?;
    run_query(config, entries, request)
}

/// Seeds an in-memory repository with `entries` and runs the request
pub fn run_query(
    config: RepositoryConfig,
    entries: Map<String, Value>,
    request: &QueryRequest,
) -> CliResult<Value> {
    let repository: Repository<DynamicEntity, MemorySecretStore> =
        Repository::with_methods(MemorySecretStore::new(), config, [request.signature()])?;

    for (id, fields) in entries {
        let mut properties = match fields {
            Value::Object(properties) => properties,
            _ => {
                return Err(CliError::invalid_data(format!(
                    "entry '{}' must be an object of fields",
                    id
                )))
            }
        };
        // the key is authoritative
        properties.remove("id");
        repository.save(DynamicEntity { id, properties })?;
    }

    let data = match repository.invoke(&request.method, &request.arguments())? {
        QueryResult::List(items) => serde_json::to_value(items)?,
        QueryResult::Optional(item) => serde_json::to_value(item)?,
        QueryResult::Boolean(exists) => Value::Bool(exists),
        QueryResult::Count(count) => Value::from(count),
    };
    Ok(data)
}
