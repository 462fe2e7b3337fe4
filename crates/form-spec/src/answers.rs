use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::spec::NavigationPolicy;

/// JSON object snapshot addressed by dot-paths.
///
/// Used both for user answers and for read-only external data. Paths are
/// dot-separated (`applicant.address.city`); numeric segments index arrays
/// and `people[1].name` is accepted as a synonym for `people.1.name`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct DataMap(Map<String, Value>);

pub type AnswerMap = DataMap;
pub type ExternalDataMap = DataMap;

impl DataMap {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wraps a JSON value; anything but an object is treated as empty.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up a dot-path. A flat key equal to the whole path wins.
    pub fn get(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.0.get(path) {
            return Some(value);
        }
        let mut segments = split_path(path);
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Whether `path` holds a provided value under `policy`.
    pub fn has_value(&self, path: &str, policy: NavigationPolicy) -> bool {
        match self.get(path) {
            None => false,
            Some(Value::Null) => policy.null_is_answered,
            Some(_) => true,
        }
    }

    /// Writes `value` at `path`, creating intermediate objects as needed.
    ///
    /// Numeric segments index into existing arrays, padding them with
    /// `null`. Other non-object values along the path are replaced.
    pub fn insert(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = split_path(path).collect();
        let Some((first, rest)) = segments.split_first() else {
            return;
        };
        let slot = self
            .0
            .entry((*first).to_string())
            .or_insert(Value::Null);
        insert_at(slot, rest, value);
    }
}

fn insert_at(slot: &mut Value, segments: &[&str], value: Value) {
    let Some((segment, rest)) = segments.split_first() else {
        *slot = value;
        return;
    };
    if let Value::Array(items) = slot
        && let Ok(index) = segment.parse::<usize>()
    {
        if index >= items.len() {
            items.resize(index + 1, Value::Null);
        }
        insert_at(&mut items[index], rest, value);
        return;
    }
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(map) = slot {
        let next = map.entry((*segment).to_string()).or_insert(Value::Null);
        insert_at(next, rest, value);
    }
}

impl From<Map<String, Value>> for DataMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<DataMap> for Value {
    fn from(map: DataMap) -> Self {
        map.into_value()
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split(['.', '[', ']']).filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn answers(value: Value) -> DataMap {
        DataMap::from_value(value)
    }

    #[test]
    fn get_walks_nested_objects_and_arrays() {
        let map = answers(json!({
            "applicant": { "address": { "city": "Reykjavik" } },
            "children": [ { "name": "Anna" }, { "name": "Jon" } ]
        }));
        assert_eq!(map.get("applicant.address.city"), Some(&json!("Reykjavik")));
        assert_eq!(map.get("children.1.name"), Some(&json!("Jon")));
        assert_eq!(map.get("children[0].name"), Some(&json!("Anna")));
        assert_eq!(map.get("children.2.name"), None);
        assert_eq!(map.get("applicant.missing"), None);
    }

    #[test]
    fn flat_dotted_key_wins_over_nested_lookup() {
        let map = answers(json!({ "a.b": 1, "a": { "b": 2 } }));
        assert_eq!(map.get("a.b"), Some(&json!(1)));
    }

    #[test]
    fn null_counts_only_under_policy() {
        let map = answers(json!({ "cleared": null }));
        assert!(!map.has_value("cleared", NavigationPolicy::default()));
        assert!(map.has_value(
            "cleared",
            NavigationPolicy {
                null_is_answered: true
            }
        ));
    }

    #[test]
    fn insert_creates_intermediate_objects() {
        let mut map = DataMap::new();
        map.insert("applicant.name", json!("Anna"));
        map.insert("applicant.age", json!(30));
        assert_eq!(
            map.into_value(),
            json!({ "applicant": { "name": "Anna", "age": 30 } })
        );
    }

    #[test]
    fn insert_indexes_into_existing_arrays() {
        let mut map = answers(json!({ "periods": [{}, {}] }));
        map.insert("periods[1].start", json!("2026-01-01"));
        assert_eq!(
            map.into_value(),
            json!({ "periods": [{}, { "start": "2026-01-01" }] })
        );
    }

    #[test]
    fn non_object_json_becomes_empty() {
        assert!(DataMap::from_value(json!([1, 2])).is_empty());
    }
}
