//! GraphQL schema.

use std::sync::Arc;

use apollo_compiler::ast::OperationType;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::FieldLookupError;
use apollo_compiler::validation::Valid;
use displaydoc::Display;
use serde::Deserialize;
use serde::Serialize;

use super::FieldType;
use super::SpecError;
use crate::error::MockError;
use crate::introspection;
use crate::introspection::IntrospectionResponse;

/// Where the schema handed to [`generate`](crate::generate) comes from.
#[derive(Debug, Clone)]
pub enum SchemaSource {
    /// An already built type system.
    Schema(apollo_compiler::Schema),
    /// Schema definition language text.
    Sdl { sdl: String, path: String },
    /// The result of an introspection query.
    Introspection(Arc<IntrospectionResponse>),
}

impl SchemaSource {
    pub fn sdl(sdl: impl Into<String>) -> Self {
        SchemaSource::Sdl {
            sdl: sdl.into(),
            path: "schema.graphql".to_string(),
        }
    }
}

impl From<apollo_compiler::Schema> for SchemaSource {
    fn from(schema: apollo_compiler::Schema) -> Self {
        SchemaSource::Schema(schema)
    }
}

impl From<IntrospectionResponse> for SchemaSource {
    fn from(introspection: IntrospectionResponse) -> Self {
        SchemaSource::Introspection(Arc::new(introspection))
    }
}

/// Kind of a named schema type.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    /// scalar
    Scalar,
    /// enum
    Enum,
    /// object
    Object,
    /// interface
    Interface,
    /// union
    Union,
    /// input object
    InputObject,
}

impl From<&ExtendedType> for TypeKind {
    fn from(ty: &ExtendedType) -> Self {
        match ty {
            ExtendedType::Scalar(_) => TypeKind::Scalar,
            ExtendedType::Object(_) => TypeKind::Object,
            ExtendedType::Interface(_) => TypeKind::Interface,
            ExtendedType::Union(_) => TypeKind::Union,
            ExtendedType::Enum(_) => TypeKind::Enum,
            ExtendedType::InputObject(_) => TypeKind::InputObject,
        }
    }
}

/// A GraphQL schema, read only for the duration of a generation.
#[derive(Debug, Clone)]
pub struct Schema {
    definitions: Valid<apollo_compiler::Schema>,
}

impl Schema {
    /// Parses and validates schema definition language text.
    pub fn parse(sdl: &str, path: &str) -> Result<Self, MockError> {
        Self::load(
            SchemaSource::Sdl {
                sdl: sdl.to_string(),
                path: path.to_string(),
            },
            true,
        )
    }

    /// Builds the type system from `source`.
    ///
    /// With `validate` unset the schema is trusted as is, only syntax and build errors are
    /// reported.
    pub(crate) fn load(source: SchemaSource, validate: bool) -> Result<Self, MockError> {
        let schema = match source {
            SchemaSource::Schema(schema) => schema,
            SchemaSource::Sdl { sdl, path } => apollo_compiler::Schema::parse(sdl, path)
                .map_err(|errors| MockError::InvalidSchema(errors.into()))?,
            SchemaSource::Introspection(response) => {
                introspection::to_schema(&response).map_err(MockError::InvalidSchema)?
            }
        };
        let definitions = if validate {
            schema
                .validate()
                .map_err(|errors| MockError::InvalidSchema(errors.into()))?
        } else {
            Valid::assume_valid(schema)
        };
        Ok(Self { definitions })
    }

    pub fn definitions(&self) -> &Valid<apollo_compiler::Schema> {
        &self.definitions
    }

    /// Returns the kind of the named type, if the schema defines it.
    pub fn kind(&self, type_name: &str) -> Option<TypeKind> {
        self.definitions.types.get(type_name).map(TypeKind::from)
    }

    /// Returns the declared type of `field_name` on the composite type `parent_type`.
    pub fn field_type(&self, parent_type: &str, field_name: &str) -> Result<FieldType, SpecError> {
        self.definitions
            .type_field(parent_type, field_name)
            .map(|definition| FieldType::from(&definition.ty))
            .map_err(|error| match error {
                FieldLookupError::NoSuchType => SpecError::UnknownType(parent_type.to_string()),
                FieldLookupError::NoSuchField(..) => {
                    SpecError::InvalidField(field_name.to_string(), parent_type.to_string())
                }
            })
    }

    /// Returns the name of the root type for operations of the given kind.
    pub fn root_operation_name(&self, kind: OperationType) -> Result<&str, SpecError> {
        self.definitions
            .root_operation(kind)
            .map(|name| name.as_str())
            .ok_or_else(|| {
                SpecError::MissingRootOperation(
                    match kind {
                        OperationType::Query => "query",
                        OperationType::Mutation => "mutation",
                        OperationType::Subscription => "subscription",
                    }
                    .to_string(),
                )
            })
    }

    /// Returns the first declared member of the enum `type_name`.
    ///
    /// `None` for an enum without members, or when `type_name` is not an enum.
    pub fn first_enum_value(&self, type_name: &str) -> Option<&str> {
        self.definitions
            .get_enum(type_name)?
            .values
            .keys()
            .next()
            .map(|value| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SDL: &str = r#"
        type Query { me: User search: [SearchResult!]! }
        interface Node { id: ID! }
        type User implements Node { id: ID! name: String! role: Role }
        type Team { name: String }
        union SearchResult = User | Team
        enum Role { ADMIN MEMBER }
        input UserFilter { name: String }
        scalar DateTime
    "#;

    // Query does not provide the `id` field required by Node
    const INVALID_SDL: &str = "interface Node { id: ID! } type Query implements Node { name: String }";

    fn schema() -> Schema {
        Schema::parse(SDL, "schema.graphql").unwrap()
    }

    #[test]
    fn kinds() {
        let schema = schema();
        assert_eq!(schema.kind("User"), Some(TypeKind::Object));
        assert_eq!(schema.kind("Node"), Some(TypeKind::Interface));
        assert_eq!(schema.kind("SearchResult"), Some(TypeKind::Union));
        assert_eq!(schema.kind("Role"), Some(TypeKind::Enum));
        assert_eq!(schema.kind("UserFilter"), Some(TypeKind::InputObject));
        assert_eq!(schema.kind("DateTime"), Some(TypeKind::Scalar));
        assert_eq!(schema.kind("String"), Some(TypeKind::Scalar));
        assert_eq!(schema.kind("Missing"), None);
    }

    #[test]
    fn field_lookup() {
        let schema = schema();
        assert_eq!(
            schema.field_type("Query", "search").unwrap().to_string(),
            "[SearchResult!]!"
        );
        assert_eq!(
            schema.field_type("Node", "id").unwrap(),
            FieldType::NonNull(Box::new(FieldType::Id))
        );
        assert_eq!(
            schema.field_type("User", "age"),
            Err(SpecError::InvalidField("age".to_string(), "User".to_string()))
        );
        assert_eq!(
            schema.field_type("Nope", "age"),
            Err(SpecError::UnknownType("Nope".to_string()))
        );
    }

    #[test]
    fn root_operations() {
        let schema = schema();
        assert_eq!(
            schema.root_operation_name(OperationType::Query).unwrap(),
            "Query"
        );
        assert_eq!(
            schema.root_operation_name(OperationType::Mutation),
            Err(SpecError::MissingRootOperation("mutation".to_string()))
        );
    }

    #[test]
    fn enum_values_in_declaration_order() {
        let schema = schema();
        assert_eq!(schema.first_enum_value("Role"), Some("ADMIN"));
        assert_eq!(schema.first_enum_value("User"), None);
    }

    #[test]
    fn invalid_schema_is_reported() {
        let error = Schema::parse(INVALID_SDL, "schema.graphql").unwrap_err();
        assert!(matches!(error, MockError::InvalidSchema(_)));
        assert!(!error.underlying_errors().is_empty());
    }

    #[test]
    fn unvalidated_schema_is_trusted() {
        let source = SchemaSource::sdl(INVALID_SDL);
        assert!(Schema::load(source, false).is_ok());
    }
}
