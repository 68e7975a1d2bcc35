use std::collections::HashMap;

use apollo_compiler::ast;

use crate::error::MockError;
use crate::error::ValidationErrors;
use crate::json_ext::Object;

/// Fragment definitions of one document, keyed by name, along with the mock generated for
/// each of them.
///
/// A table lives for a single generation: a fragment is traversed on its first spread and
/// every later spread, wherever it is in the document, gets a copy of the same mock.
#[derive(Debug, Default)]
pub(crate) struct Fragments<'a> {
    map: HashMap<&'a str, Fragment<'a>>,
}

#[derive(Debug)]
pub(crate) struct Fragment<'a> {
    pub(crate) type_condition: &'a str,
    pub(crate) selection_set: &'a [ast::Selection],
    state: MockState,
}

#[derive(Debug)]
enum MockState {
    NotGenerated,
    InProgress,
    Generated(Object),
}

impl<'a> Fragments<'a> {
    pub(crate) fn from_ast(document: &'a ast::Document) -> Self {
        let mut map = HashMap::new();
        for definition in &document.definitions {
            // Spec: https://spec.graphql.org/draft/#FragmentDefinition
            if let ast::Definition::FragmentDefinition(fragment) = definition {
                map.entry(fragment.name.as_str()).or_insert(Fragment {
                    type_condition: fragment.type_condition.as_str(),
                    selection_set: &fragment.selection_set,
                    state: MockState::NotGenerated,
                });
            }
        }
        Fragments { map }
    }

    /// Returns the mock for fragment `name`, running `traverse` over the fragment's selection
    /// set (with its type condition as the type cursor) if this is the first time it is
    /// requested.
    pub(crate) fn resolve<F>(&mut self, name: &str, traverse: F) -> Result<Object, MockError>
    where
        F: FnOnce(&mut Self, &'a str, &'a [ast::Selection]) -> Result<Object, MockError>,
    {
        let fragment = self.map.get_mut(name).ok_or_else(|| {
            MockError::InvalidDocument(ValidationErrors::single(format!(
                "Unknown fragment \"{name}\"."
            )))
        })?;
        let (type_condition, selection_set) = match &fragment.state {
            MockState::Generated(mock) => {
                tracing::trace!(fragment = name, "reusing generated fragment mock");
                return Ok(mock.clone());
            }
            MockState::InProgress => {
                return Err(MockError::InvalidDocument(ValidationErrors::single(
                    format!("Cannot spread fragment \"{name}\" within itself."),
                )));
            }
            MockState::NotGenerated => (fragment.type_condition, fragment.selection_set),
        };
        fragment.state = MockState::InProgress;

        tracing::trace!(fragment = name, type_condition, "generating fragment mock");
        let mock = traverse(self, type_condition, selection_set)?;
        if let Some(fragment) = self.map.get_mut(name) {
            fragment.state = MockState::Generated(mock.clone());
        }
        Ok(mock)
    }
}

#[cfg(test)]
mod tests {
    use serde_json_bytes::json;

    use super::*;

    const DOCUMENT: &str = r#"
        query { me { ...user ...user } }
        fragment user on User { name ...team }
        fragment team on User { teams { name } }
    "#;

    fn object(value: serde_json_bytes::Value) -> Object {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn collects_fragment_definitions() {
        let document = ast::Document::parse(DOCUMENT, "query.graphql").unwrap();
        let fragments = Fragments::from_ast(&document);
        assert_eq!(fragments.map.len(), 2);
        let user = &fragments.map["user"];
        assert_eq!(user.type_condition, "User");
        assert_eq!(user.selection_set.len(), 2);
        assert!(!fragments.map.contains_key("missing"));
    }

    #[test]
    fn traverses_each_fragment_once() {
        let document = ast::Document::parse(DOCUMENT, "query.graphql").unwrap();
        let mut fragments = Fragments::from_ast(&document);
        let mut calls = 0;
        for _ in 0..3 {
            let mock = fragments
                .resolve("team", |_, type_condition, _| {
                    calls += 1;
                    assert_eq!(type_condition, "User");
                    Ok(object(json!({ "teams": { "name": "x" } })))
                })
                .unwrap();
            assert_eq!(mock, object(json!({ "teams": { "name": "x" } })));
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn unknown_fragment_is_an_invalid_document() {
        let document = ast::Document::parse(DOCUMENT, "query.graphql").unwrap();
        let mut fragments = Fragments::from_ast(&document);
        let error = fragments
            .resolve("missing", |_, _, _| Ok(Object::new()))
            .unwrap_err();
        assert!(matches!(error, MockError::InvalidDocument(_)));
    }

    #[test]
    fn self_spread_is_rejected() {
        let document = ast::Document::parse(DOCUMENT, "query.graphql").unwrap();
        let mut fragments = Fragments::from_ast(&document);
        let error = fragments
            .resolve("user", |fragments, _, _| {
                fragments.resolve("user", |_, _, _| Ok(Object::new()))
            })
            .unwrap_err();
        assert!(error.to_string().contains("within itself"));
    }
}
