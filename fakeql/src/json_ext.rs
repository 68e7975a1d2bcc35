//! Value aliases and helpers shared by the mock engine and its callers.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use serde_json_bytes::ByteString;
use serde_json_bytes::Map;
pub use serde_json_bytes::Value;

/// A JSON object.
pub type Object = Map<ByteString, Value>;

/// A path into a mock value. This can be composed of keys and list indices.
/// e.g `/me/teams/0/name`
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Path(pub Vec<PathElement>);

/// A path element that is composed of object keys or list indices.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathElement {
    /// A list index.
    Index(usize),

    /// An object key.
    Key(String),
}

impl Path {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.0.iter()
    }
}

impl From<Vec<PathElement>> for Path {
    fn from(elements: Vec<PathElement>) -> Self {
        Self(elements)
    }
}

impl<'a> FromIterator<&'a str> for Path {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|segment| match segment.parse::<usize>() {
                    Ok(index) => PathElement::Index(index),
                    Err(_) => PathElement::Key(segment.to_string()),
                })
                .collect(),
        )
    }
}

impl FromStr for Path {
    type Err = std::convert::Infallible;

    /// Numeric segments become list indices, everything else is an object key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.split('/').filter(|segment| !segment.is_empty()).collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.0 {
            match element {
                PathElement::Index(index) => write!(f, "/{index}")?,
                PathElement::Key(key) => write!(f, "/{key}")?,
            }
        }
        Ok(())
    }
}

/// Most nulls a single assignment may append to a list.
const MAX_LIST_PADDING: usize = 4096;

/// Extension trait for [`Value`].
pub trait ValueExt {
    /// Sets `value` at `path`, creating every missing (or null) level on the way.
    ///
    /// A level is created as a list when the next path element is an index and
    /// as an object otherwise. An index on an existing object is used as a key.
    /// Indices past the end of a list pad it with nulls.
    ///
    /// The assignment is dropped when the path goes through a scalar, uses a key on a
    /// list, or pads a list with more than 4096 nulls. An empty path leaves `self`
    /// untouched.
    fn assign(&mut self, path: &Path, value: Value);
}

impl ValueExt for Value {
    fn assign(&mut self, path: &Path, value: Value) {
        if path.is_empty() {
            return;
        }
        if assign_at(self, &path.0, value).is_none() {
            tracing::debug!(%path, "ignored assignment outside of the value");
        }
    }
}

fn assign_at(current: &mut Value, path: &[PathElement], value: Value) -> Option<()> {
    match path.split_first() {
        None => *current = value,
        Some((element, rest)) => assign_at(slot(current, element)?, rest, value)?,
    }
    Some(())
}

fn slot<'a>(current: &'a mut Value, element: &PathElement) -> Option<&'a mut Value> {
    if current.is_null() {
        *current = match element {
            PathElement::Index(_) => Value::Array(Vec::new()),
            PathElement::Key(_) => Value::Object(Object::new()),
        };
    }
    match (element, current) {
        (PathElement::Key(key), Value::Object(map)) => Some(
            map.entry(ByteString::from(key.as_str()))
                .or_insert(Value::Null),
        ),
        (PathElement::Index(index), Value::Object(map)) => Some(
            map.entry(ByteString::from(index.to_string()))
                .or_insert(Value::Null),
        ),
        (PathElement::Index(index), Value::Array(items)) => {
            if items.len() <= *index {
                let len = index
                    .checked_add(1)
                    .filter(|len| len - items.len() <= MAX_LIST_PADDING)?;
                items.resize(len, Value::Null);
            }
            items.get_mut(*index)
        }
        _ => None,
    }
}

/// Merges `other` into `target`, key by key. On collision the value from `other` wins and
/// keeps the position of the existing key.
pub(crate) fn merge_into(target: &mut Object, other: Object) {
    for (key, value) in other {
        target.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json_bytes::json;

    use super::*;

    fn path(s: &str) -> Path {
        s.parse().unwrap()
    }

    #[test]
    fn empty_path_leaves_value_unmodified() {
        let mut value = json!({ "name": "Wei Shi Lindon" });
        value.assign(&Path::empty(), json!(""));
        assert_eq!(value, json!({ "name": "Wei Shi Lindon" }));
    }

    #[test]
    fn assigns_to_the_value_at_path() {
        let mut value = json!({ "name": "" });
        value.assign(&path("name"), json!("Wei Shi Lindon"));
        assert_eq!(value, json!({ "name": "Wei Shi Lindon" }));
    }

    #[test]
    fn assigns_nested_paths() {
        let mut value = json!({ "me": {} });
        value.assign(&path("me/name"), json!("Wei Shi Lindon"));
        assert_eq!(value, json!({ "me": { "name": "Wei Shi Lindon" } }));
    }

    #[test]
    fn creates_missing_levels() {
        let mut value = json!({});
        value.assign(&path("me/name"), json!("Wei Shi Lindon"));
        assert_eq!(value, json!({ "me": { "name": "Wei Shi Lindon" } }));
    }

    #[test]
    fn replaces_null_levels() {
        let mut value = json!({ "me": null });
        value.assign(&path("me/name"), json!("Wei Shi Lindon"));
        assert_eq!(value, json!({ "me": { "name": "Wei Shi Lindon" } }));
    }

    #[test]
    fn supports_list_indices() {
        let mut value = json!({ "me": { "teams": [] } });
        value.assign(&path("me/teams/0/name"), json!("Arelius"));
        assert_eq!(value, json!({ "me": { "teams": [{ "name": "Arelius" }] } }));
    }

    #[test]
    fn creates_lists_for_index_elements_and_pads_with_null() {
        let mut value = json!({});
        value.assign(&path("scores/2"), json!(7));
        assert_eq!(value, json!({ "scores": [null, null, 7] }));
    }

    #[test]
    fn numeric_segments_are_keys_of_existing_objects() {
        let mut value = json!({ "me": { "name": "x" } });
        value.assign(&path("me/0"), json!(1));
        assert_eq!(value, json!({ "me": { "name": "x", "0": 1 } }));
    }

    #[test]
    fn ignores_out_of_range_indices() {
        let mut value = json!({ "scores": [1] });
        value.assign(&path("scores/18446744073709551615"), json!(7));
        assert_eq!(value, json!({ "scores": [1] }));

        value.assign(&path("scores/1000000"), json!(7));
        assert_eq!(value, json!({ "scores": [1] }));
    }

    #[test]
    fn keeps_scalars_and_lists_it_cannot_descend_into() {
        let mut value = json!({ "name": "x", "teams": [1] });
        value.assign(&path("name/first"), json!("y"));
        value.assign(&path("teams/size"), json!(2));
        assert_eq!(value, json!({ "name": "x", "teams": [1] }));
    }

    #[test]
    fn path_round_trips_through_display() {
        let parsed = path("/me/teams/0/name");
        assert_eq!(
            parsed,
            Path(vec![
                PathElement::Key("me".to_string()),
                PathElement::Key("teams".to_string()),
                PathElement::Index(0),
                PathElement::Key("name".to_string()),
            ])
        );
        assert_eq!(parsed.to_string(), "/me/teams/0/name");
    }

    #[test]
    fn merge_into_keeps_position_and_takes_later_value() {
        let mut target = json!({ "a": 1, "b": 2 }).as_object().unwrap().clone();
        let other = json!({ "a": 3, "c": 4 }).as_object().unwrap().clone();
        merge_into(&mut target, other);
        assert_eq!(Value::Object(target), json!({ "a": 3, "b": 2, "c": 4 }));
    }
}
