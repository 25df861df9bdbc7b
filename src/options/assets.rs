use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Module-path configuration for the browser-side assets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Assets", inline)]
#[serde(default)]
pub struct AssetOptions {
    /// URL prefix the host serves installed assets under.
    pub url_prefix: String,
    /// Extra logical module name → URL (without `.js`) entries, e.g. a
    /// renderer library the widget script depends on.
    pub extra_paths: BTreeMap<String, String>,
    /// Per-module shim settings for non-AMD scripts.
    pub shims: BTreeMap<String, ShimOptions>,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            url_prefix: "/nbextensions/".to_owned(),
            extra_paths: BTreeMap::new(),
            shims: BTreeMap::new(),
        }
    }
}

/// require.js shim entry for a script that does not define a module.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(default)]
pub struct ShimOptions {
    /// Logical modules that must load first.
    pub deps: Vec<String>,
    /// Global the script defines, exported as the module value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exports: Option<String>,
}
