//! File-based config discovery.
//!
//! Finds and loads the project configuration from conventional locations,
//! layering sources with figment: defaults, then the config file, then
//! `POLYPAGE_*` environment variables. This is primarily for CLI use -
//! library users should use `ProjectConfig::from_value()` directly.

use std::fs;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format as _, Serialized, Toml};
use figment::Figment;
use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::project::ProjectConfig;

/// File-based configuration discovery rooted at a project directory.
///
/// # Example
///
/// ```no_run
/// use polypage_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    /// Create a new config discovery with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. TOML config: polypage.toml
    /// 2. package.json (polypage field)
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join("polypage.toml");
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.exists() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed.get("polypage").is_some() && !parsed["polypage"].is_null() {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Load config from the discovered file, layered with environment
    /// variables (`POLYPAGE_BUILD__PRODUCTION_GZIP=true` and friends).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<ProjectConfig> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        debug!(path = %path.display(), "loading project config");

        let mut figment = Figment::new().merge(Serialized::defaults(ProjectConfig::default()));

        if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
            figment = figment.merge(Serialized::defaults(self.package_json_section(&path)?));
        } else {
            figment = figment.merge(Toml::file(&path));
        }

        figment
            .merge(Env::prefixed("POLYPAGE_").split("__"))
            .extract()
            .map_err(|e| ConfigError::InvalidValue {
                field: "config".to_string(),
                hint: Some(e.to_string()),
            })
    }

    fn package_json_section(&self, path: &Path) -> Result<Value> {
        let content = fs::read_to_string(path)?;

        let parsed: Value =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
                field: "package.json".to_string(),
                hint: Some(format!("Invalid JSON: {}", e)),
            })?;

        let section = parsed
            .get("polypage")
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "polypage".to_string(),
                hint: Some("Add a 'polypage' field to your package.json".to_string()),
            })?;

        if section.is_null() {
            return Err(ConfigError::InvalidValue {
                field: "polypage".to_string(),
                hint: Some("The 'polypage' field cannot be null".to_string()),
            });
        }

        Ok(section.clone())
    }
}

/// Discover and load config from the current directory (convenience function)
///
/// # Example
///
/// ```no_run
/// use polypage_config::discover;
///
/// let config = discover().unwrap();
/// ```
pub fn discover() -> Result<ProjectConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}
