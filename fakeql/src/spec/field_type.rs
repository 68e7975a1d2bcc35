use apollo_compiler::ast;
use serde::Deserialize;
use serde::Serialize;

// Primitives are taken from scalars: https://spec.graphql.org/draft/#sec-Scalars
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// A named type other than the built-in scalars.
    Named(String),
    /// A list of the inner type.
    List(Box<FieldType>),
    /// The inner type, never null.
    NonNull(Box<FieldType>),
    String,
    Int,
    Float,
    /// The `ID` scalar.
    Id,
    Boolean,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Named(ty) => write!(f, "{ty}"),
            FieldType::List(ty) => write!(f, "[{ty}]"),
            FieldType::NonNull(ty) => write!(f, "{ty}!"),
            FieldType::String => write!(f, "String"),
            FieldType::Int => write!(f, "Int"),
            FieldType::Float => write!(f, "Float"),
            FieldType::Id => write!(f, "ID"),
            FieldType::Boolean => write!(f, "Boolean"),
        }
    }
}

impl FieldType {
    /// Strips every list and non-null wrapper, counting the list layers.
    ///
    /// Example: `[[[String!]!]!]` returns `(String, 3)` and `User!` returns `(User, 0)`.
    pub fn unwrap_list_depth(&self) -> (&FieldType, usize) {
        let mut ty = self;
        let mut depth = 0;
        loop {
            match ty {
                FieldType::NonNull(inner) => ty = inner,
                FieldType::List(inner) => {
                    depth += 1;
                    ty = inner;
                }
                _ => return (ty, depth),
            }
        }
    }

    /// Returns the name of the type on which selections happen
    ///
    /// Example if we get the field `list: [User!]!`, it will return "User"
    pub fn inner_type_name(&self) -> &str {
        match self.unwrap_list_depth().0 {
            FieldType::Named(name) => name.as_str(),
            FieldType::String => "String",
            FieldType::Int => "Int",
            FieldType::Float => "Float",
            FieldType::Id => "ID",
            FieldType::Boolean => "Boolean",
            // unwrap_list_depth never stops on a wrapper
            FieldType::List(inner) | FieldType::NonNull(inner) => inner.inner_type_name(),
        }
    }

    fn from_name(name: &str) -> Self {
        match name {
            "String" => Self::String,
            "Int" => Self::Int,
            "Float" => Self::Float,
            "ID" => Self::Id,
            "Boolean" => Self::Boolean,
            _ => Self::Named(name.to_string()),
        }
    }
}

// Spec: https://spec.graphql.org/draft/#sec-Type-References
impl From<&'_ ast::Type> for FieldType {
    fn from(ty: &'_ ast::Type) -> Self {
        match ty {
            ast::Type::Named(name) => Self::from_name(name),
            ast::Type::NonNullNamed(name) => Self::NonNull(Box::new(Self::from_name(name))),
            ast::Type::List(inner) => Self::List(Box::new((&**inner).into())),
            ast::Type::NonNullList(inner) => {
                Self::NonNull(Box::new(Self::List(Box::new((&**inner).into()))))
            }
        }
    }
}
