//! Ingestion configuration.

use serde::{Deserialize, Serialize};

/// Settings for a batch ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Screenplay file extensions to pick up (without dots, case-insensitive).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Screenplay files read and built concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_extensions() -> Vec<String> {
    vec!["json".to_string()]
}

fn default_concurrency() -> usize {
    8
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            concurrency: default_concurrency(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
