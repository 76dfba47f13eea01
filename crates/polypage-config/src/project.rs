//! Project configuration schema.
//!
//! `ProjectConfig` is the full external configuration surface consumed by the
//! composition pipeline. It is read once per invocation and passed explicitly
//! into every component; nothing in this workspace keeps an ambient copy.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entry::EntryMap;
use crate::error::{ConfigError, Result as ConfigResult};
use crate::flags::FeatureFlags;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub webpack: WebpackOptions,

    #[serde(default)]
    pub build: BuildOptions,

    #[serde(default)]
    pub settings: ProjectSettings,

    /// Literal replacements injected by the parameter-substitution rule.
    #[serde(default)]
    pub env_params: HashMap<String, String>,
}

/// Bundler-facing options forwarded into the base configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebpackOptions {
    /// Explicit entry mapping. Empty means "auto-discover".
    #[serde(default)]
    pub entry: EntryMap,

    /// Module-resolution policy, passed through to the bundler opaquely.
    #[serde(default)]
    pub resolve: Value,

    /// Override path for the page template shared by generated pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
}

/// Production build options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Local directory receiving build output.
    #[serde(default = "default_assets_root")]
    pub assets_root: PathBuf,

    /// URL prefix for published assets.
    #[serde(default = "default_public_path")]
    pub assets_public_path: String,

    /// Subdirectory under `assets_root` for emitted static assets.
    #[serde(default = "default_assets_sub_directory")]
    pub assets_sub_directory: PathBuf,

    /// Build mode handed to the bundler (`production` by default).
    #[serde(rename = "NODE_ENV", default = "default_node_env")]
    pub node_env: String,

    #[serde(default)]
    pub production_source_map: bool,

    #[serde(default)]
    pub production_gzip: bool,

    #[serde(default = "default_gzip_extensions")]
    pub production_gzip_extensions: Vec<String>,

    #[serde(default)]
    pub bundle_analyzer_report: bool,

    /// Entry override; takes precedence over `webpack.entry` when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<EntryMap>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            assets_root: default_assets_root(),
            assets_public_path: default_public_path(),
            assets_sub_directory: default_assets_sub_directory(),
            node_env: default_node_env(),
            production_source_map: false,
            production_gzip: false,
            production_gzip_extensions: default_gzip_extensions(),
            bundle_analyzer_report: false,
            entry: None,
        }
    }
}

/// Workspace-wide behaviour toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Run lint rules ahead of script processing.
    #[serde(default = "default_true")]
    pub enable_eslint: bool,

    /// Directory holding the per-language lint configuration files.
    #[serde(default = "default_lint_config_dir")]
    pub eslint_config_dir: PathBuf,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            enable_eslint: true,
            eslint_config_dir: default_lint_config_dir(),
        }
    }
}

impl ProjectConfig {
    /// Create from serde_json::Value (for programmatic config from an API)
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Snapshot the feature toggles for one composition run.
    pub fn feature_flags(&self) -> FeatureFlags {
        FeatureFlags {
            enable_lint: self.settings.enable_eslint,
            production_source_map: self.build.production_source_map,
            production_gzip: self.build.production_gzip,
            bundle_analyzer_report: self.build.bundle_analyzer_report,
            gzip_extensions: self.build.production_gzip_extensions.clone(),
        }
    }

    /// The entry map the resolver starts from: `build.entry` wins over
    /// `webpack.entry` when both are configured.
    pub fn effective_entry(&self) -> &EntryMap {
        self.build.entry.as_ref().unwrap_or(&self.webpack.entry)
    }
}

// Helper defaults
fn default_true() -> bool {
    true
}

fn default_assets_root() -> PathBuf {
    PathBuf::from("dist")
}

fn default_public_path() -> String {
    "/".to_string()
}

fn default_assets_sub_directory() -> PathBuf {
    PathBuf::from("static")
}

fn default_node_env() -> String {
    "production".to_string()
}

fn default_gzip_extensions() -> Vec<String> {
    vec!["js".to_string(), "css".to_string()]
}

fn default_lint_config_dir() -> PathBuf {
    PathBuf::from("config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_creates_config() {
        let value = json!({
            "webpack": {
                "entry": { "app": "src/main.ts" }
            },
            "build": {
                "production_gzip": true
            }
        });

        let config = ProjectConfig::from_value(value).unwrap();
        assert_eq!(config.webpack.entry.len(), 1);
        assert!(config.build.production_gzip);
        assert_eq!(config.build.assets_root, PathBuf::from("dist"));
        assert_eq!(config.build.node_env, "production");
    }

    #[test]
    fn feature_flags_snapshot_matches_config() {
        let config = ProjectConfig::from_value(json!({
            "build": {
                "production_source_map": true,
                "production_gzip_extensions": ["js", "css", "svg"]
            },
            "settings": { "enable_eslint": false }
        }))
        .unwrap();

        let flags = config.feature_flags();
        assert!(!flags.enable_lint);
        assert!(flags.production_source_map);
        assert_eq!(flags.gzip_extensions, vec!["js", "css", "svg"]);
    }

    #[test]
    fn build_entry_takes_precedence() {
        let config = ProjectConfig::from_value(json!({
            "webpack": { "entry": { "app": "src/main.ts" } },
            "build": { "entry": { "admin": "src/admin.ts" } }
        }))
        .unwrap();

        let names: Vec<_> = config.effective_entry().names().cloned().collect();
        assert_eq!(names, vec!["admin"]);
    }

    #[test]
    fn node_env_uses_upstream_field_name() {
        let config = ProjectConfig::from_value(json!({
            "build": { "NODE_ENV": "staging" }
        }))
        .unwrap();
        assert_eq!(config.build.node_env, "staging");
    }
}
