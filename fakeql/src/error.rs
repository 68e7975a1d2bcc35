//! Mock generation errors.
use std::fmt;

use apollo_compiler::response::GraphQLError;
use apollo_compiler::validation::DiagnosticList;
use apollo_compiler::validation::WithErrors;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

pub use crate::configuration::ConfigurationError;
pub use crate::spec::SpecError;

/// Error returned by [`generate`](crate::generate).
///
/// Every variant is a caller input error: generation is aborted as a whole and nothing is
/// retried. [`MockError::message`] is the headline, [`MockError::underlying_errors`] lists
/// the causes it aggregates.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MockError {
    /// The document does not contain any operation definition.
    #[error("{}", self.message_with_causes())]
    MissingOperation,
    /// The document has no operation with the requested name.
    #[error("{}", self.message_with_causes())]
    UnknownOperation(String),
    /// The schema is not well formed.
    #[error("{}", self.message_with_causes())]
    InvalidSchema(ValidationErrors),
    /// The document does not validate against the schema.
    #[error("{}", self.message_with_causes())]
    InvalidDocument(ValidationErrors),
    /// No schema was given and none could be found from the project configuration.
    #[error("{}", self.message_with_causes())]
    SchemaAcquisition(#[from] ConfigurationError),
    /// The document and the schema disagree although validation passed or was disabled.
    #[error("{}", self.message_with_causes())]
    Spec(#[from] SpecError),
}

impl MockError {
    /// Human readable summary of the failure.
    pub fn message(&self) -> String {
        match self {
            MockError::MissingOperation => "FakeQL: Document has no operations. \
                Ensure your GraphQL document has a query directive"
                .to_string(),
            MockError::UnknownOperation(name) => {
                format!("FakeQL: Document has no operation named \"{name}\"")
            }
            MockError::InvalidSchema(_) => "FakeQL: Schema is invalid".to_string(),
            MockError::InvalidDocument(_) => {
                "FakeQL: Document does not validate against the schema".to_string()
            }
            MockError::SchemaAcquisition(_) => {
                "FakeQL: Could not load a schema from the project configuration".to_string()
            }
            MockError::Spec(_) => {
                "FakeQL: Document does not match the schema it was generated against".to_string()
            }
        }
    }

    /// The causes aggregated by this error, one message per cause.
    pub fn underlying_errors(&self) -> Vec<String> {
        match self {
            MockError::MissingOperation | MockError::UnknownOperation(_) => Vec::new(),
            MockError::InvalidSchema(errors) | MockError::InvalidDocument(errors) => {
                errors.messages().collect()
            }
            MockError::SchemaAcquisition(error) => vec![error.to_string()],
            MockError::Spec(error) => vec![error.to_string()],
        }
    }

    fn message_with_causes(&self) -> String {
        let mut message = self.message();
        let underlying = self.underlying_errors();
        if !underlying.is_empty() {
            message.push_str("\nUnderlying errors:");
            for error in underlying {
                message.push_str("\n  ");
                message.push_str(&error);
            }
        }
        message
    }
}

/// Collection of schema or document validation errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<GraphQLError>,
}

impl ValidationErrors {
    pub(crate) fn single(message: impl Into<String>) -> Self {
        Self {
            errors: vec![GraphQLError::new(message, None, &Default::default())],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// One line per error, prefixed with its first location.
    fn messages(&self) -> impl Iterator<Item = String> + '_ {
        self.errors.iter().map(|error| match error.locations.first() {
            Some(location) => {
                format!("[{}:{}] {}", location.line, location.column, error.message)
            }
            None => error.message.clone(),
        })
    }
}

impl From<DiagnosticList> for ValidationErrors {
    fn from(errors: DiagnosticList) -> Self {
        Self {
            errors: errors.iter().map(|error| error.to_json()).collect(),
        }
    }
}

impl<T> From<WithErrors<T>> for ValidationErrors {
    fn from(WithErrors { errors, .. }: WithErrors<T>) -> Self {
        errors.into()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, message) in self.messages().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_operation_message() {
        insta::assert_snapshot!(
            MockError::MissingOperation.to_string(),
            @"FakeQL: Document has no operations. Ensure your GraphQL document has a query directive"
        );
    }

    #[test]
    fn display_lists_underlying_errors() {
        let mut errors = ValidationErrors::from(
            apollo_compiler::Schema::parse_and_validate("type Query { a: Missing }", "schema.graphql")
                .map(|_| ())
                .unwrap_err(),
        );
        errors.errors.extend(ValidationErrors::single("second").errors);
        let error = MockError::InvalidDocument(errors);
        let display = error.to_string();
        let lines: Vec<&str> = display.lines().collect();
        assert_eq!(
            lines[..2],
            [
                "FakeQL: Document does not validate against the schema",
                "Underlying errors:"
            ]
        );
        assert!(lines[2].starts_with("  [1:"));
        assert!(lines[2].contains("Missing"));
        assert_eq!(lines.last(), Some(&"  second"));
        assert_eq!(error.underlying_errors().len(), lines.len() - 2);
    }

    #[test]
    fn wrapped_errors_are_sources() {
        let error = MockError::from(SpecError::UnknownType("User".to_string()));
        assert!(std::error::Error::source(&error).is_some());
        assert!(std::error::Error::source(&MockError::MissingOperation).is_none());
    }

    #[test]
    fn validation_errors_from_diagnostics() {
        let errors = apollo_compiler::Schema::parse_and_validate("type Query { a: Missing }", "")
            .map(|_| ())
            .unwrap_err();
        let errors = ValidationErrors::from(errors);
        assert!(!errors.is_empty());
        assert!(errors.errors[0].message.contains("Missing"));
        assert!(!errors.errors[0].locations.is_empty());
    }
}
