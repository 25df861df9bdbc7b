use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Frame selection and topology caching for the state mirror.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Viewer", inline)]
#[serde(default)]
pub struct ViewerOptions {
    /// Frame shown when a viewer is constructed.
    #[schemars(title = "Initial Frame")]
    pub initial_frame: usize,
    /// Reuse the previous topology snapshot when a new trajectory shares the
    /// same topology object.
    #[schemars(title = "Memoize Topology")]
    pub memoize_topology: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            initial_frame: 0,
            memoize_topology: true,
        }
    }
}
