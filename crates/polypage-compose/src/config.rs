//! Composed bundler configuration value.
//!
//! `BundlerConfig` serves both as a partial fragment (base layer, overlay)
//! and as the final composed value handed to the external bundler runtime.
//! It is pure data: composing it has no side effects and nothing retains a
//! reference to it afterwards.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use polypage_config::EntryMap;

use crate::rules::TransformRule;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundlerConfig {
    /// Build mode (`production`, `development`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(default, skip_serializing_if = "EntryMap::is_empty")]
    pub entry: EntryMap,

    #[serde(default)]
    pub output: OutputPolicy,

    /// Module-resolution policy, passed through opaquely.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub resolve: Value,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<TransformRule>,

    /// Source-map policy (`#source-map` in production when enabled).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devtool: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization: Option<OptimizationPolicy>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<PluginSpec>,
}

/// Where and under what names build artifacts are emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPolicy {
    /// Local output directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<std::path::PathBuf>,

    /// URL prefix for published assets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_filename: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationPolicy {
    #[serde(default)]
    pub split_chunks: SplitChunksPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitChunksPolicy {
    /// Cache groups in declaration order.
    #[serde(default)]
    pub cache_groups: IndexMap<String, CacheGroup>,
}

/// One shared-chunk extraction policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheGroup {
    /// Module-path test; `None` means any module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,

    pub name: String,

    pub chunks: String,

    /// Minimum number of entries referencing a module before extraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_chunks: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,

    #[serde(default)]
    pub reuse_existing_chunk: bool,
}

/// One bundler plugin instance: a name plus literal options. Plugin
/// implementations are external collaborators; this system only declares
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

impl PluginSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Value::Null,
        }
    }

    pub fn with_options(name: impl Into<String>, options: Value) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

impl BundlerConfig {
    /// Names of the configured plugins, in order.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name.as_str()).collect()
    }

    /// First plugin with the given name, if any.
    pub fn plugin(&self, name: &str) -> Option<&PluginSpec> {
        self.plugins.iter().find(|p| p.name == name)
    }
}
