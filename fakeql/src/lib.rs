//! Mock responses for GraphQL operations.
//!
//! [`generate`] walks the selection set of an operation together with the types of the schema
//! and builds a response of the same shape, filled with placeholder values. Callers can
//! replace the value of any type with [`Resolvers`].
//!
//! ```ignore
//! let schema = SchemaSource::sdl("type Query { me: User } type User { name: String! age: Int! }");
//! let mock = fakeql::generate_from_str("{ me { name age } }", Some(schema), Default::default())?;
//! // { "me": { "name": "mock-value-for-field-\"name\"", "age": 42 } }
//! ```

pub mod configuration;
pub mod error;
pub mod introspection;
pub mod json_ext;
mod mock;
pub mod spec;

pub use crate::error::MockError;
pub use crate::introspection::IntrospectionResponse;
pub use crate::json_ext::Object;
pub use crate::json_ext::Path;
pub use crate::json_ext::Value;
pub use crate::json_ext::ValueExt;
pub use crate::mock::GenerateOptions;
pub use crate::mock::Resolver;
pub use crate::mock::Resolvers;
pub use crate::mock::ValidationRule;
pub use crate::mock::ValidationRules;
pub use crate::mock::generate;
pub use crate::mock::generate_from_str;
pub use crate::spec::Schema;
pub use crate::spec::SchemaSource;
