//! Entity <-> named-field record mapping

use serde_json::Value;
use thiserror::Error;

use crate::store::SecretFields;

use super::Entity;

/// Result type for marshalling
pub type MarshalResult<T> = Result<T, MarshalError>;

/// Marshalling failures
#[derive(Debug, Error)]
pub enum MarshalError {
    #[error("Entity must marshal to a field record, got {0}")]
    NotARecord(&'static str),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// Marshals an entity into the record written to the store.
pub fn to_fields<E: Entity>(entity: &E) -> MarshalResult<SecretFields> {
    match serde_json::to_value(entity)? {
        Value::Object(fields) => Ok(fields),
        other => Err(MarshalError::NotARecord(kind(&other))),
    }
}

/// Unmarshals a stored record.
///
/// The key the record was read from is authoritative: when the record does
/// not carry the id property it is filled in from `key`.
pub fn from_fields<E: Entity>(key: &str, mut fields: SecretFields) -> MarshalResult<E> {
    if !fields.contains_key(E::ID_PROPERTY) {
        fields.insert(E::ID_PROPERTY.to_string(), Value::String(key.to_string()));
    }
    Ok(serde_json::from_value(Value::Object(fields))?)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
