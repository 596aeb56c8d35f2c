//! Fetch parameters passed through to the gateway.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// Parameters of a single gateway fetch.
///
/// `scope` is the parent identifier the list is filtered by (grade level for
/// subjects and classes, subject for learning units). `filters` are passed
/// through untouched. A sorted map keeps the derived cache key independent of
/// the order filters were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<EntityId>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, String>,
}

impl FetchParams {
    /// Unfiltered parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters scoped to one parent.
    pub fn scoped(scope: EntityId) -> Self {
        Self {
            scope: Some(scope),
            filters: BTreeMap::new(),
        }
    }

    /// Set or clear the parent scope.
    pub fn with_scope(mut self, scope: Option<EntityId>) -> Self {
        self.scope = scope;
        self
    }

    /// Add a free-form filter.
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.scope.is_none() && self.filters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let params = FetchParams::scoped(EntityId::from(1)).with_filter("q", "mat");
        assert_eq!(params.scope, Some(EntityId::from(1)));
        assert_eq!(params.filters.get("q").map(String::as_str), Some("mat"));
        assert!(!params.is_empty());
        assert!(FetchParams::new().is_empty());
    }

    #[test]
    fn test_with_scope_none_clears_scope() {
        let params = FetchParams::scoped(EntityId::from(3)).with_scope(None);
        assert!(params.scope.is_none());
    }
}
