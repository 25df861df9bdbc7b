//! Viewer, color and asset options with TOML file support.
//!
//! Every section uses `#[serde(default)]`, so a partial TOML file (e.g. only
//! overriding `[colors]`) fills the rest with defaults.

mod assets;
mod colors;
mod viewer;

use std::path::Path;

pub use assets::{AssetOptions, ShimOptions};
pub use colors::ColorOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use viewer::ViewerOptions;

use crate::error::TrajviewError;

/// Top-level options container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Frame selection and topology caching.
    pub viewer: ViewerOptions,
    /// Element color overrides.
    pub colors: ColorOptions,
    /// Browser asset module paths.
    pub assets: AssetOptions,
}

impl Options {
    /// Generate JSON Schema describing the options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, TrajviewError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, TrajviewError> {
        toml::from_str(content)
            .map_err(|e| TrajviewError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), TrajviewError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TrajviewError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
