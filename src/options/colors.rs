use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::colors::element_color;
use crate::error::TrajviewError;

/// Element color overrides layered over the built-in table.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[schemars(title = "Colors", inline)]
#[serde(default)]
pub struct ColorOptions {
    /// Per-element `0xRRGGBB` colors keyed by symbol (any case). Checked
    /// before the built-in table.
    pub overrides: BTreeMap<String, u32>,
    /// Color for symbols missing from both the overrides and the table.
    /// Unset means an unknown symbol is an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<u32>,
}

impl ColorOptions {
    /// Resolve the display color for an element symbol.
    pub fn resolve(&self, symbol: &str) -> Result<u32, TrajviewError> {
        let trimmed = symbol.trim();
        if let Some(&color) = self
            .overrides
            .iter()
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(trimmed))
            .map(|(_, color)| color)
        {
            return Ok(color);
        }
        match (element_color(symbol), self.fallback) {
            (Ok(color), _) => Ok(color),
            (Err(TrajviewError::UnknownElement(_)), Some(fallback)) => {
                log::warn!("no color for element {symbol:?}, using fallback");
                Ok(fallback)
            }
            (Err(e), _) => Err(e),
        }
    }
}
