//! Configuration schema (ttlgen.toml)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use crate::diagnostic::{Diagnostic, DiagnosticCode, Severity};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "ttlgen.toml";

/// Severity threshold overrides for specific diagnostic codes
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeverityThreshold {
    /// Map of diagnostic code to severity override
    #[serde(default)]
    pub overrides: BTreeMap<String, Severity>,
}

impl SeverityThreshold {
    /// Get severity for a diagnostic code, or default
    pub fn get_severity(&self, code: DiagnosticCode, default: Severity) -> Severity {
        self.overrides
            .get(code.as_str())
            .copied()
            .unwrap_or(default)
    }

    /// Set severity override for a code
    pub fn set_override(&mut self, code: DiagnosticCode, severity: Severity) {
        self.overrides.insert(code.as_str().to_string(), severity);
    }

    /// Apply the override (if any) to a diagnostic
    pub fn apply(&self, diagnostic: Diagnostic) -> Diagnostic {
        let severity = self.get_severity(diagnostic.code, diagnostic.severity);
        diagnostic.with_severity(severity)
    }
}

/// Where and how binding annotations are found
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindingConfig {
    /// Fully-qualified path of the binding annotation
    #[serde(default = "default_annotation")]
    pub annotation: String,

    /// Root of the module tree (`lib.rs` / `main.rs` live here)
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            annotation: default_annotation(),
            source_root: default_source_root(),
        }
    }
}

/// Schema document discovery
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// File extension of schema documents, matched case-insensitively
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Directories searched for schema documents
    #[serde(default = "default_schema_dirs")]
    pub directories: Vec<PathBuf>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            directories: default_schema_dirs(),
        }
    }
}

/// Generated artifact naming and placement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Suffix appended to the type name to form the artifact name
    #[serde(default = "default_suffix")]
    pub artifact_suffix: String,

    /// Directory generated artifacts are written to
    #[serde(default = "default_out_dir")]
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            artifact_suffix: default_suffix(),
            directory: default_out_dir(),
        }
    }
}

fn default_annotation() -> String {
    "ttlgen::from_ttl".to_string()
}

fn default_source_root() -> PathBuf {
    PathBuf::from("src")
}

fn default_extension() -> String {
    "ttl".to_string()
}

fn default_schema_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("schemas")]
}

fn default_suffix() -> String {
    ".g.rs".to_string()
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("src/generated")
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Config {
    /// Binding annotation settings
    #[serde(default)]
    pub binding: BindingConfig,

    /// Schema document settings
    #[serde(default)]
    pub schema: SchemaConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Severity thresholds
    #[serde(default)]
    pub severity: SeverityThreshold,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            binding: BindingConfig::default(),
            schema: SchemaConfig::default(),
            output: OutputConfig::default(),
            severity: SeverityThreshold::default(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Resolve a configured path against the project root
    pub fn resolve(&self, path: &std::path::Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.binding.annotation, "ttlgen::from_ttl");
        assert_eq!(config.schema.extension, "ttl");
        assert_eq!(config.output.artifact_suffix, ".g.rs");
    }

    #[test]
    fn severity_override() {
        let mut threshold = SeverityThreshold::default();
        threshold.set_override(DiagnosticCode::DuplicateSchemaKey, Severity::Warn);

        assert_eq!(
            threshold.get_severity(DiagnosticCode::DuplicateSchemaKey, Severity::Error),
            Severity::Warn
        );

        let diag = threshold.apply(Diagnostic::new(DiagnosticCode::DuplicateSchemaKey, ["a.ttl", "x, y"]));
        assert_eq!(diag.severity, Severity::Warn);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [binding]
            annotation = "vocab::bind"

            [schema]
            extension = "TTL"

            [severity.overrides]
            duplicate-artifact-name = "warn"
            "#,
        )
        .unwrap();

        assert_eq!(config.binding.annotation, "vocab::bind");
        assert_eq!(config.binding.source_root, PathBuf::from("src"));
        assert_eq!(config.schema.extension, "TTL");
        assert_eq!(config.schema.directories, vec![PathBuf::from("schemas")]);
        assert_eq!(
            config.severity.get_severity(DiagnosticCode::DuplicateArtifactName, Severity::Error),
            Severity::Warn
        );
    }

    #[test]
    fn config_toml_roundtrip() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.binding, parsed.binding);
        assert_eq!(config.output, parsed.output);
    }
}
