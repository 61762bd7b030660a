//! Folder tree and document engine configuration.

use serde::{Deserialize, Serialize};

/// Settings for the folder tree and document engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Deepest folder nesting any tree walk will follow.
    #[serde(default = "default_max_tree_depth")]
    pub max_tree_depth: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            max_tree_depth: default_max_tree_depth(),
        }
    }
}

fn default_max_tree_depth() -> usize {
    256
}
