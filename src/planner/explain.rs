//! Explain output for query method descriptors
//!
//! Splits a plan into what the store does (pushdown) and what runs over
//! loaded records in memory.

use std::fmt;

use serde::Serialize;

use super::ast::PredicateSpec;
use super::descriptor::QueryMethodDescriptor;
use super::errors::PlannerError;

/// Explain plan output
#[derive(Debug, Clone, Serialize)]
pub struct ExplainPlan {
    /// Method the plan belongs to
    pub method: String,
    /// Whether the plan can run
    pub accepted: bool,
    /// Predicate kind
    pub predicate: Option<String>,
    /// Work done by the store before any record is loaded
    pub pushdown: Vec<String>,
    /// Work done over loaded records
    pub in_memory: Vec<String>,
    /// Declared return shape
    pub returns: Option<String>,
    /// Rejection reason (if rejected)
    pub rejection_reason: Option<String>,
    /// Rejection error code (if rejected)
    pub rejection_code: Option<String>,
}

impl ExplainPlan {
    /// Creates an explain plan from a parsed descriptor.
    ///
    /// Unsupported-property descriptors are reported as rejected.
    pub fn from_descriptor(descriptor: &QueryMethodDescriptor) -> Self {
        if let Err(err) = descriptor.validate() {
            return Self::from_error(&err);
        }

        let mut pushdown = Vec::new();
        let mut in_memory = Vec::new();

        match descriptor.predicate() {
            PredicateSpec::IdEquals { parameter } => {
                pushdown.push(format!("point read of id from argument {}", parameter));
            }
            PredicateSpec::IdPrefix { parameter } => {
                pushdown.push("list collection".to_string());
                pushdown.push(format!(
                    "prune keys not starting with argument {} before load",
                    parameter
                ));
            }
            _ => pushdown.push("list collection".to_string()),
        }

        // count and exists results never need ordering
        if descriptor.returns_entities() {
            if let Some(parameter) = descriptor.sort_parameter() {
                in_memory.push(format!("sort by argument {}", parameter));
            } else if !descriptor.order().is_empty() {
                in_memory.push(format!("sort by {}", descriptor.order()));
            }
            if descriptor.requires_ordering() {
                in_memory.push("tie-break by id asc".to_string());
            }
        }
        if let Some(limit) = descriptor.limit() {
            in_memory.push(format!("limit {}", limit.get()));
        } else if let Some(parameter) = descriptor.limit_parameter() {
            in_memory.push(format!("limit from argument {}", parameter));
        }

        Self {
            method: descriptor.method().to_string(),
            accepted: true,
            predicate: Some(descriptor.predicate().name().to_string()),
            pushdown,
            in_memory,
            returns: Some(descriptor.returns().as_str().to_string()),
            rejection_reason: None,
            rejection_code: None,
        }
    }

    /// Creates an explain plan from a planning error
    pub fn from_error(err: &PlannerError) -> Self {
        Self {
            method: err.method().to_string(),
            accepted: false,
            predicate: None,
            pushdown: Vec::new(),
            in_memory: Vec::new(),
            returns: None,
            rejection_reason: Some(err.message().to_string()),
            rejection_code: Some(err.code().code().to_string()),
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN {} ===", self.method)?;

        if self.accepted {
            writeln!(f, "Status: ACCEPTED")?;
            if let Some(predicate) = &self.predicate {
                writeln!(f, "Predicate: {}", predicate)?;
            }
            writeln!(f, "Pushdown:")?;
            for step in &self.pushdown {
                writeln!(f, "  - {}", step)?;
            }
            if !self.in_memory.is_empty() {
                writeln!(f, "In memory:")?;
                for step in &self.in_memory {
                    writeln!(f, "  - {}", step)?;
                }
            }
            if let Some(returns) = &self.returns {
                writeln!(f, "Returns: {}", returns)?;
            }
        } else {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
        }

        Ok(())
    }
}
