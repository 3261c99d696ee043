// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde_json::{Map, Value};

/// Ordered mapping of tag names to values. Keys keep insertion order so the
/// rendering layer emits `<meta>` elements in the order they were set.
pub type TagMap = Map<String, Value>;

const OPEN_GRAPH_ALIAS: &str = "open_graph";
const OPEN_GRAPH_KEY: &str = "og";

/// Renames the legacy top-level `open_graph` key to the canonical `og`. When
/// the mapping carries both, the renamed value replaces the explicit `og`.
pub(crate) fn normalize_open_graph(mut map: TagMap) -> TagMap {
    if let Some(value) = map.remove(OPEN_GRAPH_ALIAS) {
        map.insert(OPEN_GRAPH_KEY.to_string(), value);
    }
    map
}

/// Merges `incoming` into `current`. Where both sides hold mappings at a key
/// the merge recurses; otherwise the incoming value replaces the current one.
/// Existing keys keep their position, new keys append.
pub(crate) fn deep_merge(current: &mut TagMap, incoming: TagMap) {
    for (key, value) in incoming {
        if let Value::Object(update) = value {
            if let Some(Value::Object(existing)) = current.get_mut(&key) {
                deep_merge(existing, update);
                continue;
            }
            current.insert(key, Value::Object(update));
        } else {
            current.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(value: Value) -> TagMap {
        match value {
            Value::Object(map) => map,
            other => panic!("Expected a mapping, got {:?}", other),
        }
    }

    #[test]
    fn merge_unions_nested_mappings() {
        let mut current = mapping(json!({"og": {"title": "t"}}));
        deep_merge(&mut current, mapping(json!({"og": {"admin": {"id": 1}}})));
        assert_eq!(
            Value::Object(current),
            json!({"og": {"title": "t", "admin": {"id": 1}}})
        );
    }

    #[test]
    fn incoming_wins_on_conflicting_keys() {
        let mut current = mapping(json!({"og": {"title": "old", "type": "article"}}));
        deep_merge(&mut current, mapping(json!({"og": {"title": "new"}})));
        assert_eq!(
            Value::Object(current),
            json!({"og": {"title": "new", "type": "article"}})
        );
    }

    #[test]
    fn mapping_replaces_scalar_at_same_key() {
        let mut current = mapping(json!({"og": "plain"}));
        deep_merge(&mut current, mapping(json!({"og": {"title": "t"}})));
        assert_eq!(Value::Object(current), json!({"og": {"title": "t"}}));
    }

    #[test]
    fn scalar_replaces_mapping_at_same_key() {
        let mut current = mapping(json!({"og": {"title": "t"}}));
        deep_merge(&mut current, mapping(json!({"og": "plain"})));
        assert_eq!(Value::Object(current), json!({"og": "plain"}));
    }

    #[test]
    fn merge_is_idempotent() {
        let input = mapping(json!({"title": "hello", "og": {"title": "hello"}}));
        let mut current = TagMap::new();
        deep_merge(&mut current, input.clone());
        let after_first = current.clone();
        deep_merge(&mut current, input);
        assert_eq!(current, after_first);
    }

    #[test]
    fn existing_keys_keep_their_position() {
        let mut current = mapping(json!({"title": "a", "description": "b"}));
        deep_merge(&mut current, mapping(json!({"title": "c", "keywords": "d"})));
        let keys: Vec<&str> = current.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["title", "description", "keywords"]);
    }

    #[test]
    fn open_graph_alias_renamed_to_og() {
        let map = normalize_open_graph(mapping(json!({"open_graph": {"title": "t"}})));
        assert_eq!(Value::Object(map), json!({"og": {"title": "t"}}));
    }

    #[test]
    fn renamed_alias_overwrites_explicit_og() {
        let map = normalize_open_graph(mapping(json!({
            "og": {"title": "explicit"},
            "open_graph": {"title": "legacy"}
        })));
        assert_eq!(Value::Object(map), json!({"og": {"title": "legacy"}}));
    }

    #[test]
    fn mapping_without_alias_is_unchanged() {
        let input = mapping(json!({"title": "hello", "og": {"title": "t"}}));
        let map = normalize_open_graph(input.clone());
        assert_eq!(map, input);
    }
}
