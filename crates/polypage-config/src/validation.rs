//! Pluggable config validation strategies
//!
//! Separates schema validation (shape of the entry map and flag values, no
//! filesystem access) from filesystem validation (referenced files exist
//! under a project root). Malformed entry maps fail fast here, before any
//! composition runs; missing entry *files* are deliberately not an error at
//! this layer - the entry resolver owns that fallback policy.

use std::path::Path;

use crate::entry::EntryMap;
use crate::error::{ConfigError, Result};
use crate::project::ProjectConfig;

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    /// Validate a project configuration
    fn validate(&self, config: &ProjectConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use polypage_config::{ProjectConfig, SchemaValidator, ConfigValidator};
///
/// let config = ProjectConfig::default();
/// SchemaValidator.validate(&config).unwrap();
/// ```
pub struct SchemaValidator;

impl SchemaValidator {
    fn validate_entry_map(entries: &EntryMap) -> Result<()> {
        for (name, spec) in entries {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyEntryName);
            }
            if spec.candidate().is_none() {
                return Err(ConfigError::EmptyEntrySequence { name: name.clone() });
            }
        }
        Ok(())
    }
}

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &ProjectConfig) -> Result<()> {
        Self::validate_entry_map(&config.webpack.entry)?;
        if let Some(entries) = &config.build.entry {
            Self::validate_entry_map(entries)?;
        }

        // Gzip extensions must be non-empty strings when present
        for ext in &config.build.production_gzip_extensions {
            if ext.trim().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: "gzip extensions cannot be empty strings".to_string(),
                    hint: Some(
                        "Remove empty strings from 'production_gzip_extensions'".to_string(),
                    ),
                });
            }
        }

        if config.build.assets_public_path.is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: "assets_public_path cannot be empty".to_string(),
                hint: Some("Use \"/\" for root-relative asset URLs".to_string()),
            });
        }

        Ok(())
    }
}

/// Filesystem validator (for CLI use)
///
/// Runs schema validation, then checks that the configured template and lint
/// config directory exist on disk. Entry files are intentionally *not*
/// checked: a missing entry file is resolved by the entry fallback policy,
/// not rejected up front.
pub struct FsValidator {
    root: std::path::PathBuf,
}

impl FsValidator {
    /// Create a new filesystem validator with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &ProjectConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        if let Some(template) = &config.webpack.template {
            let path = self.root.join(template);
            if !path.exists() {
                return Err(ConfigError::TemplateNotFound { path });
            }
        }

        if config.settings.enable_eslint {
            let path = self.root.join(&config.settings.eslint_config_dir);
            if !path.exists() {
                return Err(ConfigError::LintConfigNotFound { path });
            }
        }

        Ok(())
    }
}

/// Convenience function for schema-only validation
pub fn validate_schema(config: &ProjectConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

/// Convenience function for filesystem validation
pub fn validate_fs(config: &ProjectConfig, root: impl AsRef<Path>) -> Result<()> {
    FsValidator::new(root).validate(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntrySpec;
    use serde_json::json;

    #[test]
    fn schema_validator_accepts_default_config() {
        assert!(SchemaValidator.validate(&ProjectConfig::default()).is_ok());
    }

    #[test]
    fn schema_validator_rejects_empty_path_sequence() {
        let mut config = ProjectConfig::default();
        config
            .webpack
            .entry
            .insert("app", EntrySpec::Sequence(vec![]));

        let result = SchemaValidator.validate(&config);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::EmptyEntrySequence { .. }
        ));
    }

    #[test]
    fn schema_validator_rejects_blank_entry_name() {
        let mut config = ProjectConfig::default();
        config.webpack.entry.insert("  ", "src/main.ts");

        let result = SchemaValidator.validate(&config);
        assert!(matches!(result.unwrap_err(), ConfigError::EmptyEntryName));
    }

    #[test]
    fn schema_validator_rejects_blank_gzip_extension() {
        let config = ProjectConfig::from_value(json!({
            "build": { "production_gzip_extensions": ["js", " "] }
        }))
        .unwrap();

        let result = SchemaValidator.validate(&config);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::SchemaValidation { .. }
        ));
    }

    #[test]
    fn schema_validator_checks_build_entry_override() {
        let mut config = ProjectConfig::default();
        let mut entries = EntryMap::new();
        entries.insert("broken", EntrySpec::Sequence(vec![]));
        config.build.entry = Some(entries);

        assert!(SchemaValidator.validate(&config).is_err());
    }
}
