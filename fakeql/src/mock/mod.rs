//! Mock response generation.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]

use std::path::PathBuf;

use apollo_compiler::ast;
use serde::Deserialize;
use serde::Serialize;

use crate::configuration;
use crate::error::MockError;
use crate::error::ValidationErrors;
use crate::json_ext::Value;
use crate::spec::Fragments;
use crate::spec::Schema;
use crate::spec::SchemaSource;

mod resolver;
mod traverse;

pub use resolver::Resolver;
pub use resolver::Resolvers;

/// A structural check run before generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    /// The schema is well formed.
    Schema,
    /// The document is valid against the schema.
    Document,
}

/// The set of checks run before generation. Runs every check by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationRules(Vec<ValidationRule>);

impl ValidationRules {
    pub fn new(rules: impl IntoIterator<Item = ValidationRule>) -> Self {
        Self(rules.into_iter().collect())
    }

    /// No check at all, for documents or schemas that are malformed on purpose.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn contains(&self, rule: ValidationRule) -> bool {
        self.0.contains(&rule)
    }
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self(vec![ValidationRule::Schema, ValidationRule::Document])
    }
}

/// Options of a [`generate`] call.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub resolvers: Resolvers,
    pub validation_rules: ValidationRules,
    /// Operation to mock. The first operation of the document when unset.
    pub operation_name: Option<String>,
    /// Directory the project configuration is searched from when no schema is given.
    pub config_root: Option<PathBuf>,
}

#[buildstructor::buildstructor]
impl GenerateOptions {
    #[builder(visibility = "pub")]
    fn new(
        resolvers: Option<Resolvers>,
        validation_rules: Option<ValidationRules>,
        operation_name: Option<String>,
        config_root: Option<PathBuf>,
    ) -> Self {
        Self {
            resolvers: resolvers.unwrap_or_default(),
            validation_rules: validation_rules.unwrap_or_default(),
            operation_name,
            config_root,
        }
    }
}

/// Generates a mock response for an operation of `document`.
///
/// When `schema` is `None` it is loaded from the graphql-config file found from
/// [`GenerateOptions::config_root`], or the current directory.
///
/// The result has the shape of the operation's selection set: objects for composite fields,
/// single element lists for each list wrapper and placeholder values at the leaves.
pub fn generate(
    document: &ast::Document,
    schema: Option<SchemaSource>,
    options: GenerateOptions,
) -> Result<Value, MockError> {
    let GenerateOptions {
        resolvers,
        validation_rules,
        operation_name,
        config_root,
    } = options;

    let operation = find_operation(document, operation_name.as_deref())?;

    let source = match schema {
        Some(source) => source,
        None => {
            let root = match config_root {
                Some(root) => root,
                None => std::env::current_dir().map_err(|error| {
                    configuration::ConfigurationError::Read {
                        path: ".".to_string(),
                        error,
                    }
                })?,
            };
            SchemaSource::Schema(configuration::discover(&root)?)
        }
    };
    let schema = Schema::load(source, validation_rules.contains(ValidationRule::Schema))?;

    if validation_rules.contains(ValidationRule::Document) {
        document
            .to_executable_validate(schema.definitions())
            .map_err(|errors| MockError::InvalidDocument(ValidationErrors::from(errors)))?;
    }

    let root_type = schema.root_operation_name(operation.operation_type)?;
    tracing::debug!(
        operation = ?operation.name,
        root_type,
        "generating mock response"
    );

    let context = traverse::Context {
        schema: &schema,
        resolvers: &resolvers,
    };
    let mut fragments = Fragments::from_ast(document);
    let mock = traverse::selection_set(
        &context,
        &mut fragments,
        root_type,
        &operation.selection_set,
    )?;
    Ok(Value::Object(mock))
}

/// Parses `query` then calls [`generate`]. Syntax errors are reported as
/// [`MockError::InvalidDocument`].
pub fn generate_from_str(
    query: &str,
    schema: Option<SchemaSource>,
    options: GenerateOptions,
) -> Result<Value, MockError> {
    let document = ast::Document::parse(query, "query.graphql")
        .map_err(|errors| MockError::InvalidDocument(errors.into()))?;
    generate(&document, schema, options)
}

fn find_operation<'a>(
    document: &'a ast::Document,
    name: Option<&str>,
) -> Result<&'a ast::OperationDefinition, MockError> {
    let mut operations = document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            ast::Definition::OperationDefinition(operation) => Some(&**operation),
            _ => None,
        })
        .peekable();
    if operations.peek().is_none() {
        return Err(MockError::MissingOperation);
    }
    match name {
        None => operations.next().ok_or(MockError::MissingOperation),
        Some(name) => operations
            .find(|operation| operation.name.as_ref().is_some_and(|n| n.as_str() == name))
            .ok_or_else(|| MockError::UnknownOperation(name.to_string())),
    }
}
