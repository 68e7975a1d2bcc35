use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::spec::Schema;
use crate::spec::TypeKind;

/// Generator for the mock of one named type.
pub type Resolver = Arc<dyn Fn() -> Value + Send + Sync>;

/// Caller supplied mocks, keyed by type name.
///
/// For a scalar or enum type the generated value is used verbatim. For an object, interface
/// or union type it is merged over the mock synthesized from the selection set: keys it
/// provides win, the other selected fields keep their synthesized value.
#[derive(Clone, Default)]
pub struct Resolvers {
    resolvers: HashMap<String, Resolver>,
}

impl Resolvers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `resolver` as the generator for `type_name`, replacing any previous one.
    pub fn insert<F>(&mut self, type_name: impl Into<String>, resolver: F) -> &mut Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.resolvers.insert(type_name.into(), Arc::new(resolver));
        self
    }

    /// Builder flavour of [`Resolvers::insert`].
    pub fn with<F>(mut self, type_name: impl Into<String>, resolver: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.insert(type_name, resolver);
        self
    }

    /// One resolver per entry of `constants`, each returning a copy of the entry's value.
    pub fn from_constants(constants: Object) -> Self {
        let mut resolvers = Self::new();
        for (type_name, value) in constants {
            resolvers.insert(type_name.as_str(), move || value.clone());
        }
        resolvers
    }

    pub fn get(&self, type_name: &str) -> Option<&Resolver> {
        self.resolvers.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.resolvers.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Runs the resolver registered for `type_name`, if any.
    pub(crate) fn resolve(&self, type_name: &str) -> Option<Value> {
        self.get(type_name).map(|resolver| {
            tracing::trace!(type_name, "calling resolver");
            resolver()
        })
    }
}

impl fmt::Debug for Resolvers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut type_names: Vec<_> = self.resolvers.keys().collect();
        type_names.sort();
        f.debug_struct("Resolvers")
            .field("type_names", &type_names)
            .finish()
    }
}

/// Mock value for a leaf field named `field_name` of scalar or enum type `type_name`.
///
/// A resolver registered for the type always wins. Otherwise built-in scalars get a constant
/// and every other scalar is treated like a string. Enums produce their first declared
/// member, so an enum without members produces nothing.
pub(crate) fn value_for(
    schema: &Schema,
    type_name: &str,
    field_name: &str,
    resolvers: &Resolvers,
) -> Option<Value> {
    if let Some(value) = resolvers.resolve(type_name) {
        return Some(value);
    }
    if schema.kind(type_name) == Some(TypeKind::Enum) {
        let value = schema.first_enum_value(type_name);
        if value.is_none() {
            tracing::warn!(type_name, field_name, "enum type has no values to mock with");
        }
        return value.map(|value| Value::String(value.into()));
    }
    Some(scalar_default(type_name, field_name))
}

fn scalar_default(type_name: &str, field_name: &str) -> Value {
    match type_name {
        "Int" => Value::from(42),
        "Float" => Value::from(4.2),
        "Boolean" => Value::Bool(false),
        // String, ID and custom scalars
        _ => Value::String(format!("mock-value-for-field-\"{field_name}\"").into()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use rstest::rstest;
    use serde_json_bytes::json;

    use super::*;

    fn schema() -> Schema {
        Schema::parse(
            r#"
            type Query { a: String }
            enum Episode { NEWHOPE EMPIRE JEDI }
            scalar DateTime
            "#,
            "schema.graphql",
        )
        .unwrap()
    }

    #[rstest]
    #[case::string("String", json!("mock-value-for-field-\"name\""))]
    #[case::id("ID", json!("mock-value-for-field-\"name\""))]
    #[case::custom_scalar("DateTime", json!("mock-value-for-field-\"name\""))]
    #[case::int("Int", json!(42))]
    #[case::float("Float", json!(4.2))]
    #[case::boolean("Boolean", json!(false))]
    #[case::enum_first_member("Episode", json!("NEWHOPE"))]
    fn builtin_defaults(#[case] type_name: &str, #[case] expected: Value) {
        let value = value_for(&schema(), type_name, "name", &Resolvers::new());
        assert_eq!(value, Some(expected));
    }

    #[test]
    fn resolver_overrides_any_kind() {
        let resolvers = Resolvers::new()
            .with("Int", || json!(7))
            .with("Episode", || json!("JEDI"))
            .with("DateTime", || json!("2020-01-01T00:00:00Z"));
        let schema = schema();
        assert_eq!(value_for(&schema, "Int", "age", &resolvers), Some(json!(7)));
        assert_eq!(
            value_for(&schema, "Episode", "episode", &resolvers),
            Some(json!("JEDI"))
        );
        assert_eq!(
            value_for(&schema, "DateTime", "createdAt", &resolvers),
            Some(json!("2020-01-01T00:00:00Z"))
        );
    }

    #[test]
    fn resolvers_are_called_each_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let resolvers = Resolvers::new().with("String", move || {
            json!(counter.fetch_add(1, Ordering::SeqCst))
        });
        let schema = schema();
        assert_eq!(value_for(&schema, "String", "a", &resolvers), Some(json!(0)));
        assert_eq!(value_for(&schema, "String", "b", &resolvers), Some(json!(1)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn constants() {
        let constants = json!({ "Int": 1, "User": { "name": "Hello" } });
        let resolvers = Resolvers::from_constants(constants.as_object().unwrap().clone());
        assert_eq!(resolvers.len(), 2);
        assert!(resolvers.contains("User"));
        assert_eq!(resolvers.resolve("User"), Some(json!({ "name": "Hello" })));
        assert_eq!(resolvers.resolve("Int"), Some(json!(1)));
        assert_eq!(resolvers.resolve("Float"), None);
    }
}
