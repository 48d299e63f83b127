//! Log destinations from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL season transcript
    pub season_log: Option<PathBuf>,
    /// Diagnostic `tracing` output, in addition to stderr
    pub trace_log: Option<PathBuf>,
}
