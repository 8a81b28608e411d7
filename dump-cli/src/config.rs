//! Configuration loading and parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Dump file to decode
    pub file: PathBuf,
    /// Parse as the packed binary format instead of text
    #[serde(default)]
    pub binary: bool,
    /// Field-spec passed to every read (whitespace-separated identifiers)
    #[serde(default = "default_fields")]
    pub fields: String,
    /// Stop after this many frames (0 = all)
    #[serde(default)]
    pub max_frames: usize,
}

fn default_fields() -> String {
    "id type x y z".to_string()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Output file (default: stdout)
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            file = "trajectory.dump"
            fields = "id x y z"

            [output]
            format = "json"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.file, PathBuf::from("trajectory.dump"));
        assert!(!config.input.binary);
        assert_eq!(config.input.fields, "id x y z");
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.path.is_none());
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = toml::from_str("[input]\nfile = \"a.bin\"\nbinary = true")
            .unwrap();
        assert!(config.input.binary);
        assert_eq!(config.input.fields, "id type x y z");
        assert_eq!(config.output.format, OutputFormat::Summary);
    }
}
