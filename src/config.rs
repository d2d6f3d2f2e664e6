//! Configuration file support
//!
//! Handles parsing of `.inspection-cert.toml` configuration files and
//! environment variable overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::{DEFAULT_SCALE_FACTOR, ExportOptions, PageSize};
use crate::import::CsvMode;
use crate::validation::validate_sample_size;

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".inspection-cert.toml";

/// Environment variable for the export output directory
pub const ENV_OUTPUT_DIR: &str = "INSPECTION_CERT_OUTPUT_DIR";

/// Environment variable for the PDF page size
pub const ENV_PAGE_SIZE: &str = "INSPECTION_CERT_PAGE_SIZE";

/// Environment variable for the rasterization scale factor
pub const ENV_SCALE_FACTOR: &str = "INSPECTION_CERT_SCALE_FACTOR";

/// Environment variable for the template CSV mode
pub const ENV_CSV_MODE: &str = "INSPECTION_CERT_CSV_MODE";

/// Error loading configuration
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(String),
    #[error("Failed to parse config: {0}")]
    Parse(String),
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Export configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSection {
    /// Directory exported files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default)]
    pub page_size: PageSize,

    #[serde(default = "default_scale_factor")]
    pub scale_factor: f32,
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_scale_factor() -> f32 {
    DEFAULT_SCALE_FACTOR
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            page_size: PageSize::default(),
            scale_factor: default_scale_factor(),
        }
    }
}

/// Template configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSection {
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Header of the value column
    #[serde(default = "default_value_label")]
    pub value_label: String,

    /// Filename prefix for generated templates
    #[serde(default = "default_template_name")]
    pub template_name: String,

    #[serde(default)]
    pub csv_mode: CsvMode,
}

fn default_sample_size() -> usize {
    10
}

fn default_value_label() -> String {
    "Value".to_string()
}

fn default_template_name() -> String {
    "template".to_string()
}

impl Default for TemplateSection {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            value_label: default_value_label(),
            template_name: default_template_name(),
            csv_mode: CsvMode::default(),
        }
    }
}

/// Main configuration structure
///
/// Represents the `.inspection-cert.toml` configuration file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CertificateConfig {
    #[serde(default)]
    pub export: ExportSection,

    #[serde(default)]
    pub template: TemplateSection,
}

impl CertificateConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a working directory
    ///
    /// Looks for `.inspection-cert.toml` in the directory and falls back to
    /// defaults if it is missing. Environment overrides are applied last.
    pub fn load(dir: &Path) -> ConfigResult<Self> {
        Self::load_file(&dir.join(CONFIG_FILENAME), false)
    }

    /// Load configuration from an explicit path, which must exist
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        Self::load_file(path, true)
    }

    fn load_file(path: &Path, required: bool) -> ConfigResult<Self> {
        let mut config = if required || path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
            Self::parse(&content)?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup` (environment variables in
    /// production, a map in tests)
    pub fn apply_overrides_with<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.export.output_dir = dir;
        }

        if let Some(size) = lookup(ENV_PAGE_SIZE) {
            self.export.page_size = size.parse().map_err(|reason| ConfigError::InvalidValue {
                key: ENV_PAGE_SIZE.to_string(),
                reason,
            })?;
        }

        if let Some(scale) = lookup(ENV_SCALE_FACTOR) {
            self.export.scale_factor =
                scale
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseFloatError| ConfigError::InvalidValue {
                        key: ENV_SCALE_FACTOR.to_string(),
                        reason: e.to_string(),
                    })?;
        }

        if let Some(mode) = lookup(ENV_CSV_MODE) {
            self.template.csv_mode = mode.parse().map_err(|reason| ConfigError::InvalidValue {
                key: ENV_CSV_MODE.to_string(),
                reason,
            })?;
        }

        Ok(())
    }

    /// Check value ranges the TOML types cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        let scale = self.export.scale_factor;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "export.scale_factor".to_string(),
                reason: format!("must be greater than 0, got {}", scale),
            });
        }
        validate_sample_size(self.template.sample_size).map_err(|e| ConfigError::InvalidValue {
            key: "template.sample_size".to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Output directory, resolved against `base` when relative
    pub fn output_dir(&self, base: &Path) -> PathBuf {
        let dir = Path::new(&self.export.output_dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            base.join(dir)
        }
    }

    /// Export options for a document with the given title
    pub fn export_options(&self, title: impl Into<String>) -> ExportOptions {
        ExportOptions {
            page_size: self.export.page_size,
            scale_factor: self.export.scale_factor,
            title: title.into(),
        }
    }
}

/// Generate a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# Inspection Certificate SDK Configuration

[export]
# Directory for exported PDFs and images (relative to the working directory)
output_dir = "."

# Page width used for PDF export: "a4" (default) or "letter"
page_size = "a4"

# Device pixels per CSS pixel when rasterizing
scale_factor = 2.0

[template]
# Rows in generated sample templates
sample_size = 10
value_label = "Value"
template_name = "template"

# "naive" splits on every comma; "strict" understands quoted fields
csv_mode = "naive"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CertificateConfig::new();
        assert_eq!(config.export.page_size, PageSize::A4);
        assert_eq!(config.export.scale_factor, 2.0);
        assert_eq!(config.template.sample_size, 10);
        assert_eq!(config.template.csv_mode, CsvMode::Naive);
    }

    #[test]
    fn test_sample_config_parses_to_defaults() {
        let config = CertificateConfig::parse(sample_config()).unwrap();
        assert_eq!(config, CertificateConfig::default());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[export]
page_size = "letter"

[template]
sample_size = 32
csv_mode = "strict"
"#;
        let config = CertificateConfig::parse(toml).unwrap();
        assert_eq!(config.export.page_size, PageSize::Letter);
        assert_eq!(config.export.output_dir, ".");
        assert_eq!(config.template.sample_size, 32);
        assert_eq!(config.template.csv_mode, CsvMode::Strict);
        assert_eq!(config.template.value_label, "Value");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CertificateConfig::new();
        config
            .apply_overrides_with(lookup(&[
                (ENV_OUTPUT_DIR, "/tmp/ic"),
                (ENV_PAGE_SIZE, "LETTER"),
                (ENV_SCALE_FACTOR, "3"),
                (ENV_CSV_MODE, "strict"),
            ]))
            .unwrap();
        assert_eq!(config.export.output_dir, "/tmp/ic");
        assert_eq!(config.export.page_size, PageSize::Letter);
        assert_eq!(config.export.scale_factor, 3.0);
        assert_eq!(config.template.csv_mode, CsvMode::Strict);
    }

    #[test]
    fn test_invalid_env_override() {
        let mut config = CertificateConfig::new();
        let err = config
            .apply_overrides_with(lookup(&[(ENV_SCALE_FACTOR, "big")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_SCALE_FACTOR));
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let mut config = CertificateConfig::new();
        config.export.scale_factor = 0.0;
        assert!(config.validate().is_err());

        let mut config = CertificateConfig::new();
        config.template.sample_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILENAME),
            "[template]\nvalue_label = \"Toe Load (N)\"\n",
        )
        .unwrap();
        let config = CertificateConfig::load(dir.path()).unwrap();
        assert_eq!(config.template.value_label, "Toe Load (N)");
        assert_eq!(config.template.sample_size, 10);
        assert!(CertificateConfig::load_from(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_round_trip_toml() {
        let mut config = CertificateConfig::new();
        config.template.template_name = "LOT-001".to_string();
        let text = config.to_toml().unwrap();
        assert_eq!(CertificateConfig::parse(&text).unwrap(), config);
    }

    #[test]
    fn test_output_dir_resolution() {
        let mut config = CertificateConfig::new();
        config.export.output_dir = "out".to_string();
        assert_eq!(config.output_dir(Path::new("/work")), PathBuf::from("/work/out"));
    }
}
