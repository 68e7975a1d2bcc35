#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]

mod field_type;
mod fragments;
mod schema;

use displaydoc::Display;
pub use field_type::FieldType;
pub(crate) use fragments::Fragments;
pub use schema::Schema;
pub use schema::SchemaSource;
pub use schema::TypeKind;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

pub(crate) const TYPENAME: &str = "__typename";

/// Disagreements between a document and the schema it is walked against.
///
/// These cannot happen for a document that passed validation against the same schema.
#[derive(Error, Debug, Display, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SpecError {
    /// type '{0}' is not defined in the schema
    UnknownType(String),
    /// cannot query field '{0}' on type '{1}'
    InvalidField(String, String),
    /// type '{0}' of kind {1} cannot be selected
    InvalidType(String, TypeKind),
    /// the schema does not define a root type for {0} operations
    MissingRootOperation(String),
}
