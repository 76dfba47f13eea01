//! Feature flags driving one composition run.

use serde::{Deserialize, Serialize};

/// Immutable snapshot of the feature toggles for a single composition run.
///
/// Derived from [`crate::ProjectConfig::feature_flags`]; never mutated while
/// a configuration is being composed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Insert lint rules ahead of script/type processing.
    #[serde(default)]
    pub enable_lint: bool,

    /// Emit external source maps in production builds.
    #[serde(default)]
    pub production_source_map: bool,

    /// Append the gzip compression plugin to production builds.
    #[serde(default)]
    pub production_gzip: bool,

    /// Append the static bundle-composition report plugin.
    #[serde(default)]
    pub bundle_analyzer_report: bool,

    /// Extensions eligible for gzip compression. An empty list turns
    /// compression into a no-op even when `production_gzip` is set.
    #[serde(default)]
    pub gzip_extensions: Vec<String>,
}
