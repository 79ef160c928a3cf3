//! # CLI Configuration
//!
//! Settings come from four layers, highest precedence first:
//!
//! 1. command-line flags (`--schema`, `--format`);
//! 2. the `ALERTGATE_SCHEMA` environment variable (schema path only);
//! 3. a YAML config file passed with `--config`;
//! 4. built-in defaults (embedded schema, text output).

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

use alertgate_schema::AlertSchemaValidator;

/// Environment variable naming a schema artifact to load instead of the
/// embedded one.
pub const SCHEMA_ENV_VAR: &str = "ALERTGATE_SCHEMA";

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per document.
    Json,
}

/// Contents of the `--config` YAML file.
///
/// ```yaml
/// schema_path: schemas/inbound-alert.schema.json
/// format: json
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Schema artifact to load instead of the embedded one.
    pub schema_path: Option<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
}

impl CliConfig {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: CliConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config file");
        Ok(config)
    }
}

/// Effective settings after all layers are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Schema artifact path; `None` means the embedded schema.
    pub schema_path: Option<PathBuf>,
    pub format: OutputFormat,
}

impl Settings {
    /// Merge the configuration layers.
    pub fn resolve(
        file: Option<CliConfig>,
        env_schema: Option<PathBuf>,
        flag_schema: Option<PathBuf>,
        flag_format: Option<OutputFormat>,
    ) -> Self {
        let file = file.unwrap_or_default();
        Self {
            schema_path: flag_schema.or(env_schema).or(file.schema_path),
            format: flag_format.unwrap_or(file.format),
        }
    }

    /// Schema path from the environment, ignoring an empty value.
    pub fn env_schema() -> Option<PathBuf> {
        schema_from_env_value(std::env::var_os(SCHEMA_ENV_VAR))
    }

    /// Build the validator these settings select.
    pub fn load_validator(&self) -> Result<AlertSchemaValidator> {
        let validator = match &self.schema_path {
            Some(path) => AlertSchemaValidator::from_path(path)
                .with_context(|| format!("failed to load alert schema {}", path.display()))?,
            None => AlertSchemaValidator::new().context("failed to compile embedded alert schema")?,
        };
        tracing::info!(schema = %validator.source_name(), "loaded alert schema");
        Ok(validator)
    }
}

fn schema_from_env_value(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_embedded_schema_and_text() {
        let settings = Settings::resolve(None, None, None, None);
        assert_eq!(settings, Settings::default());
        assert!(settings.schema_path.is_none());
        assert_eq!(settings.format, OutputFormat::Text);
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let file = CliConfig {
            schema_path: Some(PathBuf::from("file.json")),
            format: OutputFormat::Json,
        };

        let s = Settings::resolve(Some(file.clone()), None, None, None);
        assert_eq!(s.schema_path, Some(PathBuf::from("file.json")));
        assert_eq!(s.format, OutputFormat::Json);

        let s = Settings::resolve(Some(file.clone()), Some("env.json".into()), None, None);
        assert_eq!(s.schema_path, Some(PathBuf::from("env.json")));

        let s = Settings::resolve(
            Some(file),
            Some("env.json".into()),
            Some("flag.json".into()),
            Some(OutputFormat::Text),
        );
        assert_eq!(s.schema_path, Some(PathBuf::from("flag.json")));
        assert_eq!(s.format, OutputFormat::Text);
    }

    #[test]
    fn empty_env_value_is_ignored() {
        assert_eq!(schema_from_env_value(None), None);
        assert_eq!(schema_from_env_value(Some(OsString::new())), None);
        assert_eq!(
            schema_from_env_value(Some(OsString::from("env.json"))),
            Some(PathBuf::from("env.json"))
        );
    }

    // The only test that touches ALERTGATE_SCHEMA.
    #[test]
    fn env_schema_reads_variable() {
        std::env::set_var(SCHEMA_ENV_VAR, "");
        assert_eq!(Settings::env_schema(), None);
        let file = CliConfig {
            schema_path: Some(PathBuf::from("file.json")),
            format: OutputFormat::Text,
        };
        let s = Settings::resolve(Some(file), Settings::env_schema(), None, None);
        assert_eq!(s.schema_path, Some(PathBuf::from("file.json")));

        std::env::set_var(SCHEMA_ENV_VAR, "env.json");
        assert_eq!(Settings::env_schema(), Some(PathBuf::from("env.json")));
        std::env::remove_var(SCHEMA_ENV_VAR);
        assert_eq!(Settings::env_schema(), None);
    }

    #[test]
    fn load_yaml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alertgate.yaml");
        std::fs::write(&path, "schema_path: custom.schema.json\nformat: json\n").unwrap();
        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.schema_path, Some(PathBuf::from("custom.schema.json")));
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alertgate.yaml");
        std::fs::write(&path, "format: json\n").unwrap();
        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.schema_path, None);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn unknown_config_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alertgate.yaml");
        std::fs::write(&path, "schema: x.json\n").unwrap();
        assert!(CliConfig::load(&path).is_err());
    }

    #[test]
    fn missing_config_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CliConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("cannot read config file"));
    }

    #[test]
    fn embedded_validator_loads() {
        let v = Settings::default().load_validator().unwrap();
        assert_eq!(v.accepted_alert_types(), ["email", "push", "sms"]);
    }

    #[test]
    fn missing_schema_path_is_error() {
        let settings = Settings {
            schema_path: Some(PathBuf::from("/nonexistent/alert.schema.json")),
            format: OutputFormat::Text,
        };
        let err = settings.load_validator().unwrap_err();
        assert!(format!("{err:#}").contains("failed to load alert schema"));
    }
}
