//! Forest settings with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Optional TOML file passed by the caller
//! 3. Environment variables: `SPATIAL_TREE_*` prefix

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::errors::TreeResult;

pub const ENV_PREFIX: &str = "SPATIAL_TREE";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ForestSettings {
    /// Back new user-data stores with a linked list instead of a vector
    pub linked_user_data: bool,
    /// Node slots preallocated by the arena
    pub initial_capacity: usize,
}

impl Default for ForestSettings {
    fn default() -> Self {
        Self {
            linked_user_data: false,
            initial_capacity: 16,
        }
    }
}

impl ForestSettings {
    /// Load settings with layered precedence.
    ///
    /// A missing file is not an error; a malformed one is.
    #[instrument(level = "debug")]
    pub fn load(path: Option<&Path>) -> TreeResult<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("linked_user_data", defaults.linked_user_data)?
            .set_default("initial_capacity", defaults.initial_capacity as i64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Self = builder.build()?.try_deserialize()?;
        tracing::debug!(?settings, "Loaded forest settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_vector_backing() {
        let settings = ForestSettings::default();
        assert!(!settings.linked_user_data);
        assert_eq!(settings.initial_capacity, 16);
    }
}
