//! The end-to-end composition pipeline.
//!
//! One invocation builds one immutable [`BundlerConfig`] from scratch:
//! base rule set, production overlay merge, entry override, entry
//! resolution, page artifacts, then the flag-gated compression and report
//! plugins. No state survives between invocations; results are only as
//! stable as the filesystem between calls.

use std::path::Path;

use serde_json::json;
use tracing::info;

use polypage_config::{validate_schema, FeatureFlags, ProjectConfig};

use crate::config::{BundlerConfig, OutputPolicy, PluginSpec};
use crate::error::Result;
use crate::html::{default_template_path, generate_pages};
use crate::merge::merge;
use crate::overlay::production_overlay;
use crate::resolver::{resolve, scan_pages};
use crate::rules::{build_rules, RuleContext};

/// The environment-independent base layer: ordered rules, plain `[name].js`
/// output naming, the opaque resolve policy, and the markup-component
/// companion plugin.
pub fn base_config(project: &ProjectConfig, flags: &FeatureFlags) -> BundlerConfig {
    BundlerConfig {
        mode: None,
        entry: project.webpack.entry.clone(),
        output: OutputPolicy {
            filename: Some("[name].js".to_string()),
            ..OutputPolicy::default()
        },
        resolve: project.webpack.resolve.clone(),
        rules: build_rules(flags, &RuleContext::from_project(project)),
        devtool: None,
        optimization: None,
        plugins: vec![PluginSpec::new("vue-loader")],
    }
}

/// Compose the production configuration for a project rooted at `root`.
///
/// Fails fast on malformed entry configuration; missing entry *files* are
/// not an error here - they flow through the resolver's fallback policy.
pub fn compose_production(project: &ProjectConfig, root: &Path) -> Result<BundlerConfig> {
    validate_schema(project)?;

    let flags = project.feature_flags();
    let base = base_config(project, &flags);
    let overlay = production_overlay(project, &flags);
    let mut composed = merge(&base, &overlay)?;

    // build.entry wins over webpack.entry when both are configured
    if let Some(entries) = &project.build.entry {
        composed.entry = entries.clone();
    }

    let resolution = resolve(
        &composed.entry,
        |path| {
            if path.is_absolute() {
                path.exists()
            } else {
                root.join(path).exists()
            }
        },
        || scan_pages(root),
    );
    info!(mode = ?resolution.mode, entries = resolution.entries.len(), "entries resolved");

    let template = project
        .webpack
        .template
        .clone()
        .unwrap_or_else(default_template_path);
    let pages = generate_pages(&resolution, &template);
    composed.entry = resolution.entries;
    composed.plugins.extend(pages.iter().map(PluginSpec::from));

    if flags.production_gzip && !flags.gzip_extensions.is_empty() {
        composed.plugins.push(PluginSpec::with_options(
            "compression",
            json!({
                "test": format!("\\.({})$", flags.gzip_extensions.join("|")),
                "filename": "[path].gz[query]",
                "algorithm": "gzip",
                "threshold": 240,
                "minRatio": 0.8,
            }),
        ));
    }

    if flags.bundle_analyzer_report {
        composed.plugins.push(PluginSpec::new("bundle-analyzer"));
    }

    Ok(composed)
}
