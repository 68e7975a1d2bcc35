//! Schemas obtained from an introspection query.
//!
//! The payload is turned back into schema definition language and parsed, so the result is
//! the same type system a server would publish as SDL.

use std::fmt;

use graphql_introspection_query::introspection_response::FullType;
use graphql_introspection_query::introspection_response::FullTypeFields;
use graphql_introspection_query::introspection_response::Schema as IntrospectionSchema;
use graphql_introspection_query::introspection_response::TypeRef;
use graphql_introspection_query::introspection_response::__TypeKind;

use crate::error::ValidationErrors;

/// The result of an introspection query, as a full response (`{"data": {"__schema": ...}}`)
/// or as its data (`{"__schema": ...}`).
pub use graphql_introspection_query::introspection_response::IntrospectionResponse;

const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// Schema definition language for the introspected types, `None` when the response carries
/// no `__schema`.
///
/// Field arguments are not part of the introspection model and are not printed.
pub fn to_sdl(response: &IntrospectionResponse) -> Option<String> {
    response
        .as_schema()
        .schema
        .as_ref()
        .map(|schema| Sdl(schema).to_string())
}

pub(crate) fn to_schema(
    response: &IntrospectionResponse,
) -> Result<apollo_compiler::Schema, ValidationErrors> {
    let sdl = to_sdl(response)
        .ok_or_else(|| ValidationErrors::single("introspection result has no __schema"))?;
    Ok(apollo_compiler::Schema::parse(sdl, "introspection.graphql")?)
}

struct Sdl<'a>(&'a IntrospectionSchema);

impl fmt::Display for Sdl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schema = self.0;
        let roots = [
            ("query", schema.query_type.as_ref().and_then(|ty| ty.name.as_ref())),
            ("mutation", schema.mutation_type.as_ref().and_then(|ty| ty.name.as_ref())),
            (
                "subscription",
                schema.subscription_type.as_ref().and_then(|ty| ty.name.as_ref()),
            ),
        ];
        if roots.iter().any(|(_, name)| name.is_some()) {
            f.write_str("schema {\n")?;
            for (operation, name) in roots {
                if let Some(name) = name {
                    writeln!(f, "  {operation}: {name}")?;
                }
            }
            f.write_str("}\n")?;
        }
        let types = schema.types.iter().flatten().flatten();
        for ty in types.map(|ty| &ty.full_type) {
            let Some(name) = ty.name.as_deref() else {
                continue;
            };
            if name.starts_with("__") || BUILTIN_SCALARS.contains(&name) {
                continue;
            }
            f.write_str("\n")?;
            write_type(f, name, ty)?;
        }
        Ok(())
    }
}

fn write_type(f: &mut fmt::Formatter<'_>, name: &str, ty: &FullType) -> fmt::Result {
    let Some(kind) = &ty.kind else {
        return Ok(());
    };
    write_description(f, ty.description.as_deref(), "")?;
    match kind {
        __TypeKind::SCALAR => writeln!(f, "scalar {name}"),
        __TypeKind::OBJECT | __TypeKind::INTERFACE => {
            let keyword = if matches!(kind, __TypeKind::OBJECT) {
                "type"
            } else {
                "interface"
            };
            write!(f, "{keyword} {name}")?;
            let interfaces = ty.interfaces.iter().flatten();
            for (index, interface) in interfaces.enumerate() {
                let separator = if index == 0 { " implements " } else { " & " };
                f.write_str(separator)?;
                write_type_ref(f, &interface.type_ref)?;
            }
            let fields = ty.fields.as_deref().unwrap_or_default();
            if fields.is_empty() {
                return f.write_str("\n");
            }
            f.write_str(" {\n")?;
            for field in fields {
                write_field(f, field)?;
            }
            f.write_str("}\n")
        }
        __TypeKind::UNION => {
            write!(f, "union {name}")?;
            let members = ty.possible_types.iter().flatten();
            for (index, member) in members.enumerate() {
                f.write_str(if index == 0 { " = " } else { " | " })?;
                write_type_ref(f, &member.type_ref)?;
            }
            f.write_str("\n")
        }
        __TypeKind::ENUM => {
            write!(f, "enum {name}")?;
            let values = ty.enum_values.as_deref().unwrap_or_default();
            if values.is_empty() {
                return f.write_str("\n");
            }
            f.write_str(" {\n")?;
            for value in values {
                write_description(f, value.description.as_deref(), "  ")?;
                write!(f, "  {}", value.name.as_deref().unwrap_or_default())?;
                write_deprecated(
                    f,
                    value.is_deprecated.unwrap_or_default(),
                    value.deprecation_reason.as_deref(),
                )?;
                f.write_str("\n")?;
            }
            f.write_str("}\n")
        }
        __TypeKind::INPUT_OBJECT => {
            write!(f, "input {name}")?;
            let fields = ty.input_fields.as_deref().unwrap_or_default();
            if fields.is_empty() {
                return f.write_str("\n");
            }
            f.write_str(" {\n")?;
            for field in fields {
                let input = &field.input_value;
                write_description(f, input.description.as_deref(), "  ")?;
                write!(f, "  {}: ", input.name)?;
                write_type_ref(f, &input.type_)?;
                if let Some(default_value) = &input.default_value {
                    write!(f, " = {default_value}")?;
                }
                f.write_str("\n")?;
            }
            f.write_str("}\n")
        }
        // wrappers and unknown kinds are not named types
        _ => Ok(()),
    }
}

fn write_field(f: &mut fmt::Formatter<'_>, field: &FullTypeFields) -> fmt::Result {
    write_description(f, field.description.as_deref(), "  ")?;
    write!(f, "  {}: ", field.name.as_deref().unwrap_or_default())?;
    if let Some(ty) = &field.type_ {
        write_type_ref(f, &ty.type_ref)?;
    }
    write_deprecated(
        f,
        field.is_deprecated.unwrap_or_default(),
        field.deprecation_reason.as_deref(),
    )?;
    f.write_str("\n")
}

/// A malformed reference prints nothing and fails to parse.
fn write_type_ref(f: &mut fmt::Formatter<'_>, ty: &TypeRef) -> fmt::Result {
    match (&ty.kind, &ty.of_type) {
        (Some(__TypeKind::LIST), Some(inner)) => {
            f.write_str("[")?;
            write_type_ref(f, inner)?;
            f.write_str("]")
        }
        (Some(__TypeKind::NON_NULL), Some(inner)) => {
            write_type_ref(f, inner)?;
            f.write_str("!")
        }
        _ => f.write_str(ty.name.as_deref().unwrap_or_default()),
    }
}

fn write_description(
    f: &mut fmt::Formatter<'_>,
    description: Option<&str>,
    indent: &str,
) -> fmt::Result {
    match description {
        Some(description) if !description.is_empty() => {
            writeln!(f, "{indent}{}", quote(description))
        }
        _ => Ok(()),
    }
}

fn write_deprecated(
    f: &mut fmt::Formatter<'_>,
    is_deprecated: bool,
    reason: Option<&str>,
) -> fmt::Result {
    match (is_deprecated, reason) {
        (false, _) => Ok(()),
        (true, Some(reason)) => write!(f, " @deprecated(reason: {})", quote(reason)),
        (true, None) => f.write_str(" @deprecated"),
    }
}

/// GraphQL string literal for `value`. JSON escapes are valid GraphQL escapes.
fn quote(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}
