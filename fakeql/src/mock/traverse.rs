//! The type directed walk producing a mock.
//!
//! The selection tree of the document and the type tree of the schema are walked in lock
//! step. The only state carried along is the fragment table, handed down by reference.

use apollo_compiler::ast;
use serde_json_bytes::ByteString;

use super::resolver::Resolvers;
use super::resolver::value_for;
use crate::error::MockError;
use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::json_ext::merge_into;
use crate::spec::Fragments;
use crate::spec::Schema;
use crate::spec::SpecError;
use crate::spec::TYPENAME;
use crate::spec::TypeKind;

/// Read only inputs of a generation.
pub(crate) struct Context<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) resolvers: &'a Resolvers,
}

/// Builds the mock for `set`, selected on the composite type `parent_type`.
///
/// Each selection contributes a partial object and the partial objects are merged in document
/// order, a later key replacing an earlier one.
pub(crate) fn selection_set<'a>(
    context: &Context<'_>,
    fragments: &mut Fragments<'a>,
    parent_type: &str,
    set: &'a [ast::Selection],
) -> Result<Object, MockError> {
    let mut mock = Object::new();
    for selection in set {
        match selection {
            ast::Selection::Field(def) => {
                if let Some(value) = field(context, fragments, parent_type, def)? {
                    let key = def.alias.as_ref().unwrap_or(&def.name);
                    mock.insert(ByteString::from(key.as_str()), value);
                }
            }
            ast::Selection::FragmentSpread(def) => {
                let fragment_mock = fragments.resolve(
                    def.fragment_name.as_str(),
                    |fragments, type_condition, fragment_set| {
                        selection_set(context, fragments, type_condition, fragment_set)
                    },
                )?;
                merge_into(&mut mock, fragment_mock);
            }
            ast::Selection::InlineFragment(def) => {
                let fragment_type = def.type_condition.as_deref().unwrap_or(parent_type);
                let fragment_mock =
                    selection_set(context, fragments, fragment_type, &def.selection_set)?;
                merge_into(&mut mock, fragment_mock);
            }
        }
    }
    Ok(mock)
}

/// Mock for a single field, `None` when its type has no value to offer.
fn field<'a>(
    context: &Context<'_>,
    fragments: &mut Fragments<'a>,
    parent_type: &str,
    def: &'a ast::Field,
) -> Result<Option<Value>, MockError> {
    if def.name.as_str() == TYPENAME {
        return Ok(Some(Value::String(parent_type.into())));
    }

    let field_type = context.schema.field_type(parent_type, &def.name)?;
    let (inner_type, depth) = field_type.unwrap_list_depth();
    let type_name = inner_type.inner_type_name();
    let kind = context
        .schema
        .kind(type_name)
        .ok_or_else(|| SpecError::UnknownType(type_name.to_string()))?;

    let value = match kind {
        TypeKind::Scalar | TypeKind::Enum => {
            value_for(context.schema, type_name, &def.name, context.resolvers)
        }
        TypeKind::Object | TypeKind::Interface | TypeKind::Union => {
            Some(composite(context, fragments, type_name, def)?)
        }
        TypeKind::InputObject => {
            return Err(SpecError::InvalidType(type_name.to_string(), kind).into());
        }
    };
    Ok(value.map(|value| wrap(value, depth)))
}

/// Mock for a field of object, interface or union type, with the type's resolver applied
/// over the synthesized object.
fn composite<'a>(
    context: &Context<'_>,
    fragments: &mut Fragments<'a>,
    type_name: &str,
    def: &'a ast::Field,
) -> Result<Value, MockError> {
    let mut mock = selection_set(context, fragments, type_name, &def.selection_set)?;
    match context.resolvers.resolve(type_name) {
        Some(Value::Object(overrides)) => {
            merge_into(&mut mock, overrides);
            Ok(Value::Object(mock))
        }
        // anything else than an object (null included) replaces the mock
        Some(value) => Ok(value),
        None => Ok(Value::Object(mock)),
    }
}

/// Nests `value` in `depth` single element lists.
fn wrap(value: Value, depth: usize) -> Value {
    (0..depth).fold(value, |value, _| Value::Array(vec![value]))
}
