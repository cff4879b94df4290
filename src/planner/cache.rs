//! Per-repository descriptor cache
//!
//! Parsing is pure, so concurrent first lookups of the same method may
//! both parse. The first insert wins and every caller gets that instance.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::ast::MethodSignature;
use super::descriptor::QueryMethodDescriptor;
use super::errors::PlannerResult;
use super::parser::MethodNameParser;

/// Cache of parsed descriptors keyed by method name.
///
/// Owned by one repository instance and dropped with it.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    descriptors: RwLock<HashMap<String, Arc<QueryMethodDescriptor>>>,
}

/// Outcome of a cache lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLookup {
    Hit,
    Miss,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached descriptor for a method, if any
    pub fn get(&self, method: &str) -> Option<Arc<QueryMethodDescriptor>> {
        self.descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(method)
            .cloned()
    }

    /// Returns the descriptor for `signature`, parsing it on first use.
    ///
    /// Parse failures are not cached; they are deterministic and will
    /// recur on the next attempt.
    pub fn get_or_parse(
        &self,
        signature: &MethodSignature,
    ) -> PlannerResult<(Arc<QueryMethodDescriptor>, CacheLookup)> {
        if let Some(descriptor) = self.get(&signature.name) {
            return Ok((descriptor, CacheLookup::Hit));
        }

        // Parse outside the lock
        let parsed = Arc::new(MethodNameParser::parse(signature)?);

        let mut descriptors = self
            .descriptors
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let descriptor = descriptors
            .entry(signature.name.clone())
            .or_insert(parsed)
            .clone();
        Ok((descriptor, CacheLookup::Miss))
    }

    pub fn len(&self) -> usize {
        self.descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
