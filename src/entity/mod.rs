//! Entity model and marshalling
//!
//! An entity is a record with one key-bearing property (conventionally
//! `id`) plus scalar properties. Entities cross the store boundary as
//! named-field records whose field names match the property names used in
//! query method names and sort arguments.

mod dynamic;
mod marshal;

pub use dynamic::DynamicEntity;
pub use marshal::{from_fields, to_fields, MarshalError, MarshalResult};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A type stored by a repository.
///
/// The id is the backend key: the record lives at `collection/id`.
pub trait Entity: Serialize + DeserializeOwned + Clone {
    /// Name of the key-bearing property in the marshalled record
    const ID_PROPERTY: &'static str = "id";

    /// Returns the entity's key
    fn id(&self) -> &str;
}
