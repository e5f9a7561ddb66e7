//! Content storage and search configuration.

use serde::{Deserialize, Serialize};

/// Content storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root path for uploaded file contents.
    #[serde(default = "default_root")]
    pub root_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root(),
        }
    }
}

/// Name search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum results returned per entity kind.
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
        }
    }
}

fn default_root() -> String {
    "./data/uploads".to_string()
}

fn default_result_limit() -> u32 {
    20
}
