//! Browser-side assets and their staging into a host's static directory.
//!
//! The files under `static/` are embedded at compile time. A host either
//! copies them into the directory its display layer serves
//! ([`install_assets`]) or serves them directly ([`get_asset`]). In both
//! cases [`enable_script`] yields the one-time activation script: a
//! require.js path configuration so the scripts resolve by logical name,
//! stylesheet links, and the update bridge.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rust_embed::RustEmbed;
use serde::Serialize;

use crate::bridge::BRIDGE_JS;
use crate::error::TrajviewError;
use crate::options::{AssetOptions, ShimOptions};

/// Embedded `static/` directory.
#[derive(RustEmbed)]
#[folder = "static/"]
struct StaticAssets;

/// One embedded file with its MIME type.
#[derive(Debug, Clone)]
pub struct Asset {
    /// File contents.
    pub data: Cow<'static, [u8]>,
    /// MIME type guessed from the extension.
    pub mime: String,
}

/// Relative paths of every embedded asset, sorted.
#[must_use]
pub fn asset_names() -> Vec<String> {
    let mut names: Vec<String> =
        StaticAssets::iter().map(Cow::into_owned).collect();
    names.sort();
    names
}

/// Look up an embedded asset by relative path. A leading `/` is ignored.
#[must_use]
pub fn get_asset(path: &str) -> Option<Asset> {
    let path = path.strip_prefix('/').unwrap_or(path);
    StaticAssets::get(path).map(|file| Asset {
        data: file.data,
        mime: mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string(),
    })
}

/// Copy every embedded asset into `target`, creating directories as needed.
///
/// Returns the written paths. The first I/O failure is returned as is;
/// files already written are left in place.
pub fn install_assets(target: &Path) -> Result<Vec<PathBuf>, TrajviewError> {
    std::fs::create_dir_all(target)?;
    let mut written = Vec::new();
    for name in asset_names() {
        let Some(file) = StaticAssets::get(&name) else {
            continue;
        };
        let dest = target.join(&name);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&dest, file.data.as_ref())?;
        log::debug!("installed {}", dest.display());
        written.push(dest);
    }
    log::info!("installed {} assets into {}", written.len(), target.display());
    Ok(written)
}

/// require.js configuration mapping logical module names to URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequireConfig {
    /// Logical name → URL without the `.js` suffix.
    pub paths: BTreeMap<String, String>,
    /// Shim entries for non-AMD scripts.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub shim: BTreeMap<String, ShimOptions>,
}

impl RequireConfig {
    /// One path per embedded script (file stem under `url_prefix`), plus the
    /// configured extra paths and shims. Extra paths win on name clashes.
    #[must_use]
    pub fn from_options(options: &AssetOptions) -> Self {
        let mut paths: BTreeMap<String, String> = asset_names()
            .iter()
            .filter_map(|name| {
                let stem = name.strip_suffix(".js")?;
                let module = stem.rsplit('/').next().unwrap_or(stem);
                Some((
                    module.to_owned(),
                    join_url(&options.url_prefix, stem),
                ))
            })
            .collect();
        paths.extend(
            options
                .extra_paths
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        Self {
            paths,
            shim: options.shims.clone(),
        }
    }

    /// `require.config({...});` script text.
    pub fn to_script(&self) -> Result<String, TrajviewError> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(format!("require.config({json});"))
    }
}

/// URLs of the embedded stylesheets under `url_prefix`.
#[must_use]
pub fn stylesheet_urls(options: &AssetOptions) -> Vec<String> {
    asset_names()
        .iter()
        .filter(|name| name.ends_with(".css"))
        .map(|name| join_url(&options.url_prefix, name))
        .collect()
}

/// Activation script: require config, stylesheet links, then the bridge.
pub fn enable_script(options: &AssetOptions) -> Result<String, TrajviewError> {
    let mut script = RequireConfig::from_options(options).to_script()?;
    for url in stylesheet_urls(options) {
        let href = serde_json::to_string(&url)?;
        script.push_str(&format!(
            "\n(function() {{\n    var link = document.createElement('link');\n    \
             link.rel = 'stylesheet';\n    link.href = {href};\n    \
             document.head.appendChild(link);\n}})();"
        ));
    }
    script.push_str(BRIDGE_JS);
    Ok(script)
}

fn join_url(prefix: &str, path: &str) -> String {
    if prefix.is_empty() || prefix.ends_with('/') {
        format!("{prefix}{path}")
    } else {
        format!("{prefix}/{path}")
    }
}
