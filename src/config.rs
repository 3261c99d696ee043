// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::merge::{TagMap, normalize_open_graph};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

const MAX_DEFAULT_TAG_COUNT: usize = 1000;
const MAX_TAG_KEY_CHARS: usize = 128;
const MAX_NESTING_DEPTH: usize = 16;

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Process-wide meta tag defaults. Each store captures a copy of `defaults`
/// at construction, so resetting a store never reads hidden global state.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct MetaTagsConfig {
    #[serde(default)]
    pub defaults: TagMap,
}

impl MetaTagsConfig {
    /// Loads the defaults from a YAML file. A missing file is not an error;
    /// the built-in (empty) defaults apply.
    pub fn load_and_validate(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!(
                "Meta tags config {} not found, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|err| {
            ConfigError::LoadError(format!("Failed to read {}: {}", path.display(), err))
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: MetaTagsConfig = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content).map_err(|err| {
                ConfigError::LoadError(format!("Failed to parse meta tags config: {}", err))
            })?
        };
        config.validate()?;
        debug!("Loaded {} default meta tag entries", config.defaults.len());
        Ok(Self {
            defaults: normalize_open_graph(config.defaults),
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.defaults.len() > MAX_DEFAULT_TAG_COUNT {
            return Err(ConfigError::ValidationError(format!(
                "Default meta tags must be at most {} entries",
                MAX_DEFAULT_TAG_COUNT
            )));
        }
        validate_map(&self.defaults, 1)
    }
}

fn validate_map(map: &TagMap, depth: usize) -> Result<(), ConfigError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(ConfigError::ValidationError(format!(
            "Default meta tags must nest at most {} levels deep",
            MAX_NESTING_DEPTH
        )));
    }
    for (key, value) in map {
        if key.is_empty() {
            return Err(ConfigError::ValidationError(
                "Meta tag keys must not be empty".to_string(),
            ));
        }
        if key.chars().count() > MAX_TAG_KEY_CHARS {
            return Err(ConfigError::ValidationError(format!(
                "Meta tag key must be at most {} characters",
                MAX_TAG_KEY_CHARS
            )));
        }
        if let Value::Object(nested) = value {
            validate_map(nested, depth + 1)?;
        }
    }
    Ok(())
}
