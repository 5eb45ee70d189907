//! Nested, insertion-ordered store addressed by delimited paths.
//!
//! A path such as `"a.b.c"` is split on the separator and every segment
//! selects one nesting level. Absence is reported as `None`/`false`, never
//! as an error. A key holding `Value::Null` still counts as present.

use crate::value::{serialize_map, Key, Map, Value};
use serde::{Serialize, Serializer};

/// Separator used by the path methods that do not take one.
pub const DEFAULT_SEPARATOR: char = '.';

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathStore {
    items: Map,
}

fn split(path: &str, separator: char) -> Vec<Key> {
    path.split(separator).map(Key::from_segment).collect()
}

// Replaces a non-mapping slot with an empty mapping and hands it back.
fn ensure_map(slot: &mut Value) -> &mut Map {
    match slot {
        Value::Map(map) => map,
        _ => {
            *slot = Value::Map(Map::new());
            ensure_map(slot)
        }
    }
}

impl PathStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(items: Map) -> Self {
        Self { items }
    }

    // ---- path access -------------------------------------------------

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.get_sep(path, DEFAULT_SEPARATOR)
    }

    /// Walks `path` and stops at the first missing segment. The empty path
    /// is not special here: it looks up the key `""`.
    pub fn get_sep(&self, path: &str, separator: char) -> Option<&Value> {
        self.resolve(&split(path, separator))
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut Value> {
        self.get_mut_sep(path, DEFAULT_SEPARATOR)
    }

    /// Mutable view into the value at `path`, valid for the current borrow only.
    pub fn get_mut_sep(&mut self, path: &str, separator: char) -> Option<&mut Value> {
        self.resolve_mut(&split(path, separator))
    }

    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> bool {
        self.set_sep(path, value, DEFAULT_SEPARATOR)
    }

    /// Writes `value` at `path`, creating missing levels on the way.
    ///
    /// The empty path replaces the whole store with a single element at
    /// index 0. Scalars found at intermediate levels are replaced by
    /// mappings. Always returns `true`.
    pub fn set_sep(&mut self, path: &str, value: impl Into<Value>, separator: char) -> bool {
        let value = value.into();
        if path.is_empty() {
            self.items = Map::new();
            self.items.insert(Key::Int(0), value);
            return true;
        }

        let mut keys = split(path, separator);
        let Some(last) = keys.pop() else {
            return true;
        };

        let mut container = &mut self.items;
        for key in keys {
            let slot = container
                .entry(key)
                .or_insert_with(|| Value::Map(Map::new()));
            container = ensure_map(slot);
        }
        container.insert(last, value);
        true
    }

    pub fn exists(&self, path: &str) -> bool {
        self.exists_sep(path, DEFAULT_SEPARATOR)
    }

    pub fn exists_sep(&self, path: &str, separator: char) -> bool {
        self.get_sep(path, separator).is_some()
    }

    pub fn remove(&mut self, path: &str) -> bool {
        self.remove_sep(path, DEFAULT_SEPARATOR)
    }

    /// Deletes the last segment of `path` from its parent mapping.
    ///
    /// The empty path clears the store. Emptied ancestors are kept.
    pub fn remove_sep(&mut self, path: &str, separator: char) -> bool {
        if path.is_empty() {
            self.clear();
            return true;
        }

        let mut keys = split(path, separator);
        let Some(last) = keys.pop() else {
            return false;
        };

        let parent = if keys.is_empty() {
            Some(&mut self.items)
        } else {
            self.resolve_mut(&keys).and_then(Value::as_map_mut)
        };

        match parent {
            Some(map) => map.shift_remove(&last).is_some(),
            None => false,
        }
    }

    fn resolve(&self, keys: &[Key]) -> Option<&Value> {
        let (first, rest) = keys.split_first()?;
        let mut current = self.items.get(first)?;
        for key in rest {
            current = current.as_map()?.get(key)?;
        }
        Some(current)
    }

    fn resolve_mut(&mut self, keys: &[Key]) -> Option<&mut Value> {
        let (first, rest) = keys.split_first()?;
        let mut current = self.items.get_mut(first)?;
        for key in rest {
            current = current.as_map_mut()?.get_mut(key)?;
        }
        Some(current)
    }

    // ---- container ---------------------------------------------------

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends `item`, at `id` when given or else at the next free integer
    /// index (one past the largest non-negative integer key).
    ///
    /// Returns `false` and stores nothing when `i64::MAX` is already taken.
    pub fn push(&mut self, item: impl Into<Value>, id: Option<Key>) -> bool {
        let key = match id {
            Some(key) => key,
            None => {
                let last = self
                    .items
                    .keys()
                    .filter_map(Key::as_int)
                    .filter(|n| *n >= 0)
                    .max();
                match last {
                    None => Key::Int(0),
                    Some(n) => match n.checked_add(1) {
                        Some(next) => Key::Int(next),
                        None => return false,
                    },
                }
            }
        };
        self.items.insert(key, item.into());
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Single-level lookup by key.
    pub fn item(&self, key: &Key) -> Option<&Value> {
        self.items.get(key)
    }

    pub fn items(&self) -> &Map {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Map {
        &mut self.items
    }

    /// Replaces the contents with `map`. Without `set_keys` the entries are
    /// renumbered from 0 in order.
    pub fn fill_from_map(&mut self, map: Map, set_keys: bool) {
        self.clear();
        for (key, item) in map {
            let id = set_keys.then_some(key);
            self.push(item, id);
        }
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.items.iter()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a PathStore {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Serialize for PathStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_map(&self.items, serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> PathStore {
        let mut store = PathStore::new();
        store.set("a.b.c", 5);
        store.set("a.d", "text");
        store.set("list.0", "first");
        store
    }

    #[test]
    fn test_nested_set_creates_levels() {
        let store = sample();
        let b = store.get("a.b").unwrap();
        assert_eq!(*b, Value::from_entries([("c", 5)]));
        assert_eq!(store.get("a.b.c"), Some(&Value::Int(5)));
    }

    #[test]
    fn test_get_stops_at_first_missing_segment() {
        let store = sample();
        assert!(store.get("a.x.c").is_none());
        assert!(store.get("missing.path").is_none());
        // walking through a scalar is a miss
        assert!(store.get("a.d.e").is_none());
    }

    #[test]
    fn test_empty_path_lookup_is_literal() {
        let mut store = PathStore::new();
        assert!(store.get("").is_none());
        store.items_mut().insert(Key::from(""), Value::from("blank"));
        assert_eq!(store.get(""), Some(&Value::from("blank")));
    }

    #[test]
    fn test_null_value_is_found() {
        let mut store = PathStore::new();
        store.set("a.b", Value::Null);
        assert!(store.exists("a.b"));
        assert_eq!(store.get("a.b"), Some(&Value::Null));
    }

    #[test]
    fn test_set_overwrites_mapping_and_scalar() {
        let mut store = sample();
        store.set("a.b", "flat");
        assert_eq!(store.get("a.b"), Some(&Value::from("flat")));
        assert!(!store.exists("a.b.c"));

        store.set("a.d.e", 1);
        assert_eq!(store.get("a.d"), Some(&Value::from_entries([("e", 1)])));
    }

    #[test]
    fn test_set_empty_path_replaces_root() {
        let mut store = sample();
        assert!(store.set("", "only"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.item(&Key::Int(0)), Some(&Value::from("only")));
        assert!(!store.exists("a"));
    }

    #[test]
    fn test_custom_separator() {
        let mut store = PathStore::new();
        store.set_sep("a/b", 1, '/');
        assert_eq!(store.get("a.b"), Some(&Value::Int(1)));
        assert!(store.exists_sep("a/b", '/'));
        assert!(store.remove_sep("a/b", '/'));
        assert!(!store.exists("a.b"));
    }

    #[test]
    fn test_remove() {
        let mut store = sample();
        assert!(store.remove("a.b.c"));
        assert!(!store.exists("a.b.c"));
        // the emptied parent is not pruned
        assert_eq!(store.get("a.b"), Some(&Value::Map(Map::new())));

        assert!(!store.remove("a.b.c"));
        assert!(!store.remove("nope.x"));
        assert!(!store.remove("a.d.x"));

        assert!(store.remove("list"));
        assert!(!store.exists("list"));
    }

    #[test]
    fn test_remove_keeps_sibling_order() {
        let mut store = PathStore::new();
        store.set("x", 1);
        store.set("y", 2);
        store.set("z", 3);
        store.remove("y");
        let keys: Vec<String> = store.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["x", "z"]);
    }

    #[test]
    fn test_remove_empty_path_clears() {
        let mut store = sample();
        assert!(store.remove(""));
        assert!(store.is_empty());
    }

    #[test]
    fn test_get_mut_edits_in_place() {
        let mut store = sample();
        if let Some(Value::Map(a)) = store.get_mut("a") {
            a.insert(Key::from("new"), Value::Bool(true));
        }
        assert_eq!(store.get("a.new"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_push_indices() {
        let mut store = PathStore::new();
        store.push("zero", None);
        store.push("named", Some(Key::from("name")));
        store.push("five", Some(Key::Int(5)));
        store.push("six", None);
        assert_eq!(store.item(&Key::Int(0)), Some(&Value::from("zero")));
        assert_eq!(store.item(&Key::Int(6)), Some(&Value::from("six")));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_push_after_largest_index_is_refused() {
        let mut store = PathStore::new();
        store.set("9223372036854775807", 1);
        assert_eq!(store.item(&Key::Int(i64::MAX)), Some(&Value::Int(1)));

        assert!(!store.push("next", None));
        assert_eq!(store.len(), 1);
        // explicit ids are still accepted
        assert!(store.push("named", Some(Key::from("name"))));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_fill_from_map_renumbers_without_keys() {
        let mut source = Map::new();
        source.insert(Key::from("b"), Value::from(1));
        source.insert(Key::from("a"), Value::from(2));

        let mut store = sample();
        store.fill_from_map(source.clone(), false);
        assert_eq!(store.to_json().unwrap(), "[1,2]");

        store.fill_from_map(source, true);
        assert_eq!(store.to_json().unwrap(), r#"{"b":1,"a":2}"#);
    }

    #[test]
    fn test_json_and_iteration_order() {
        let store = sample();
        assert_eq!(
            store.to_json().unwrap(),
            r#"{"a":{"b":{"c":5},"d":"text"},"list":["first"]}"#
        );
        let keys: Vec<&Key> = (&store).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![&Key::from("a"), &Key::from("list")]);
    }

    fn path_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-c0-2]{1,2}", 1..4).prop_map(|segments| segments.join("."))
    }

    proptest! {
        #[test]
        fn prop_set_then_get_round_trips(path in path_strategy(), n in any::<i64>()) {
            let mut store = sample();
            store.set(&path, n);
            prop_assert_eq!(store.get(&path), Some(&Value::Int(n)));
            prop_assert_eq!(store.exists(&path), store.get(&path).is_some());
        }

        #[test]
        fn prop_remove_after_set_hides_path(path in path_strategy()) {
            let mut store = sample();
            store.set(&path, "v");
            prop_assert!(store.remove(&path));
            prop_assert!(!store.exists(&path));
        }

        #[test]
        fn prop_remove_of_missing_path_changes_nothing(path in path_strategy()) {
            let mut store = sample();
            prop_assume!(!store.exists(&path));
            let before = store.clone();
            prop_assert!(!store.remove(&path));
            prop_assert_eq!(store, before);
        }
    }
}
