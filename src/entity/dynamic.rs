//! Schema-less entity

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Entity;

/// An entity with an id and an open set of properties.
///
/// Useful when the record shape is only known at runtime (the CLI,
/// fixtures, administrative tooling).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicEntity {
    pub id: String,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl DynamicEntity {
    /// Creates an entity with no properties
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: Map::new(),
        }
    }

    /// Sets a property
    pub fn with(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(property.into(), value.into());
        self
    }

    /// Returns a property value
    pub fn get(&self, property: &str) -> Option<&Value> {
        self.properties.get(property)
    }
}

impl Entity for DynamicEntity {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{from_fields, to_fields};

    #[test]
    fn test_flattened_marshalling() {
        let entity = DynamicEntity::new("walter")
            .with("firstname", "Walter")
            .with("age", 52);

        let fields = to_fields(&entity).unwrap();
        assert_eq!(fields["id"], "walter");
        assert_eq!(fields["age"], 52);

        let back: DynamicEntity = from_fields("walter", fields).unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn test_get_property() {
        let entity = DynamicEntity::new("skyler").with("active", true);
        assert_eq!(entity.get("active"), Some(&Value::Bool(true)));
        assert_eq!(entity.get("missing"), None);
    }
}
