// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::MetaTagsConfig;
use crate::merge::{TagMap, deep_merge, normalize_open_graph};
use log::debug;
use serde_json::Value;
use std::fmt;

/// Capability for types that expose their own meta tags, e.g. a content
/// record carrying title and Open Graph data. The store takes the returned
/// mapping as a read-only snapshot at call time.
pub trait MetaTagsSource {
    fn to_meta_tags(&self) -> TagMap;
}

#[derive(Debug)]
pub enum MetaTagsError {
    InvalidInput(String),
}

impl fmt::Display for MetaTagsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaTagsError::InvalidInput(msg) => write!(f, "Invalid meta tags input: {}", msg),
        }
    }
}

impl std::error::Error for MetaTagsError {}

/// Accepted input for [`MetaTagsStore::set`]: either a mapping value or a
/// reference to something that can produce one.
pub enum MetaTagsInput<'a> {
    Value(Value),
    Source(&'a dyn MetaTagsSource),
}

impl From<Value> for MetaTagsInput<'_> {
    fn from(value: Value) -> Self {
        MetaTagsInput::Value(value)
    }
}

impl From<TagMap> for MetaTagsInput<'_> {
    fn from(map: TagMap) -> Self {
        MetaTagsInput::Value(Value::Object(map))
    }
}

impl<'a, S: MetaTagsSource> From<&'a S> for MetaTagsInput<'a> {
    fn from(source: &'a S) -> Self {
        MetaTagsInput::Source(source)
    }
}

impl<'a> From<&'a dyn MetaTagsSource> for MetaTagsInput<'a> {
    fn from(source: &'a dyn MetaTagsSource) -> Self {
        MetaTagsInput::Source(source)
    }
}

/// Per-request holder for the meta tags of a rendered page. Updates are
/// deep-merged, so handlers can layer page data over the configured defaults
/// without clobbering sibling keys.
#[derive(Debug, Clone, Default)]
pub struct MetaTagsStore {
    tags: TagMap,
    defaults: TagMap,
}

impl MetaTagsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `defaults`; [`reset`](Self::reset)
    /// restores this exact mapping. The legacy `open_graph` key is
    /// normalized up front so a reset never reintroduces it.
    pub fn with_defaults(defaults: TagMap) -> Self {
        let defaults = normalize_open_graph(defaults);
        Self {
            tags: defaults.clone(),
            defaults,
        }
    }

    pub fn from_config(config: &MetaTagsConfig) -> Self {
        Self::with_defaults(config.defaults.clone())
    }

    /// Deep-merges the given tags into the store. Accepts a mapping value
    /// directly or any [`MetaTagsSource`]; a non-mapping value is rejected
    /// without touching the current tags.
    pub fn set<'a>(&mut self, input: impl Into<MetaTagsInput<'a>>) -> Result<(), MetaTagsError> {
        let map = match input.into() {
            MetaTagsInput::Value(Value::Object(map)) => map,
            MetaTagsInput::Value(other) => {
                return Err(MetaTagsError::InvalidInput(format!(
                    "Meta tags must be a mapping, got {}",
                    value_kind(&other)
                )));
            }
            MetaTagsInput::Source(source) => source.to_meta_tags(),
        };
        let map = normalize_open_graph(map);
        deep_merge(&mut self.tags, map);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.tags.get(key)
    }

    /// Removes a tag and returns its value, if present.
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.tags.remove(key)
    }

    /// Removes a tag for rendering, so the same value is not emitted twice.
    pub fn extract(&mut self, key: &str) -> Option<Value> {
        self.delete(key)
    }

    /// Restores the tags captured at construction time.
    pub fn reset(&mut self) {
        debug!("Resetting meta tags to {} default entries", self.defaults.len());
        self.tags = self.defaults.clone();
    }

    /// Read view for rendering collaborators.
    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}
