//! `[output]` section: how the season is shown on the terminal

use house_domain::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Report printed after the finale; `--output` wins over this
    pub format: Option<OutputFormat>,
    pub color: bool,
    /// Narrate each ceremony as it happens
    pub narrate: bool,
    /// Spinner for the running phase (only while narrating)
    pub show_progress: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            narrate: true,
            show_progress: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_section_overrides_only_given_keys() {
        let toml_str = r#"
[output]
format = "json"
narrate = false
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.narrate);
        assert!(config.output.color);
        assert!(config.output.show_progress);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let result: Result<super::super::FileConfig, _> =
            toml::from_str("[output]\nformat = \"synthesis\"");
        assert!(result.is_err());
    }
}
