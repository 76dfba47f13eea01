//! Production environment overlay.
//!
//! Everything the production target layers on top of the base rule set:
//! content-hashed output naming, style extraction rules, the source-map
//! policy, vendor/common chunk splitting, and the standard plugin list.
//! Merged onto the base with [`crate::merge::merge`].

use indexmap::IndexMap;
use serde_json::json;

use polypage_config::{FeatureFlags, ProjectConfig};

use crate::config::{
    BundlerConfig, CacheGroup, OptimizationPolicy, OutputPolicy, PluginSpec, SplitChunksPolicy,
};
use crate::rules::{assets_path, LoaderSpec, MatchExpression, TransformRule};

/// Build the production overlay fragment for one composition run.
pub fn production_overlay(project: &ProjectConfig, flags: &FeatureFlags) -> BundlerConfig {
    let sub = &project.build.assets_sub_directory;
    let chunk_name = assets_path(sub, "scripts/chunk/[name].[contenthash:8].js");

    BundlerConfig {
        mode: Some(project.build.node_env.clone()),
        entry: Default::default(),
        output: OutputPolicy {
            path: Some(project.build.assets_root.clone()),
            public_path: Some(project.build.assets_public_path.clone()),
            filename: Some(chunk_name.clone()),
            chunk_filename: Some(chunk_name),
        },
        resolve: serde_json::Value::Null,
        rules: style_rules(flags.production_source_map),
        devtool: flags
            .production_source_map
            .then(|| "#source-map".to_string()),
        optimization: Some(split_chunks_policy()),
        plugins: vec![
            // Environment variable injection; consumers branch on it at
            // runtime
            PluginSpec::with_options(
                "define",
                json!({ "process.env.NODE_ENV": project.build.node_env }),
            ),
            PluginSpec::with_options(
                "css-extract",
                json!({
                    "filename": assets_path(sub, "css/[name].[contenthash:8].css"),
                    "ignoreOrder": false,
                }),
            ),
            // Safe mode keeps the minifier away from semantically-breaking
            // transforms and dedupes CSS repeated across components
            PluginSpec::with_options(
                "css-minify",
                json!({ "cssProcessorOptions": { "safe": true } }),
            ),
            PluginSpec::with_options(
                "copy-static",
                json!({ "from": "public", "to": sub }),
            ),
            PluginSpec::new("friendly-errors"),
            PluginSpec::new("progress-bar"),
        ],
    }
}

/// Extract-and-process chains for each stylesheet dialect.
fn style_rules(source_map: bool) -> Vec<TransformRule> {
    [("css", None), ("less", Some("less-loader")), ("scss", Some("sass-loader"))]
        .into_iter()
        .map(|(ext, dialect_loader)| {
            let mut chain = vec![
                LoaderSpec::new("css-extract-loader"),
                LoaderSpec::with_options("css-loader", json!({ "sourceMap": source_map })),
                LoaderSpec::with_options("postcss-loader", json!({ "sourceMap": source_map })),
            ];
            if let Some(loader) = dialect_loader {
                chain.push(LoaderSpec::with_options(
                    loader,
                    json!({ "sourceMap": source_map }),
                ));
            }
            TransformRule {
                pattern: MatchExpression::extensions([ext]),
                chain,
                include: Vec::new(),
                exclude: Vec::new(),
                phase: Default::default(),
                options: serde_json::Value::Null,
            }
        })
        .collect()
}

/// Shared-dependency splitting: third-party modules into a `vendor` chunk,
/// modules referenced by two or more entries into a lower-priority `common`
/// chunk; both reuse an existing equivalent chunk instead of duplicating.
fn split_chunks_policy() -> OptimizationPolicy {
    let mut cache_groups = IndexMap::new();
    cache_groups.insert(
        "vendors".to_string(),
        CacheGroup {
            test: Some("node_modules/".to_string()),
            name: "vendor".to_string(),
            chunks: "initial".to_string(),
            min_chunks: None,
            priority: None,
            reuse_existing_chunk: true,
        },
    );
    cache_groups.insert(
        "common".to_string(),
        CacheGroup {
            test: None,
            name: "common".to_string(),
            chunks: "initial".to_string(),
            min_chunks: Some(2),
            priority: Some(-20),
            reuse_existing_chunk: true,
        },
    );

    OptimizationPolicy {
        split_chunks: SplitChunksPolicy { cache_groups },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_uses_hashed_output_names() {
        let project = ProjectConfig::default();
        let overlay = production_overlay(&project, &project.feature_flags());

        assert_eq!(
            overlay.output.filename.as_deref(),
            Some("static/scripts/chunk/[name].[contenthash:8].js")
        );
        assert_eq!(overlay.output.path, Some("dist".into()));
    }

    #[test]
    fn devtool_is_gated_by_source_map_flag() {
        let mut project = ProjectConfig::default();
        let overlay = production_overlay(&project, &project.feature_flags());
        assert_eq!(overlay.devtool, None);

        project.build.production_source_map = true;
        let overlay = production_overlay(&project, &project.feature_flags());
        assert_eq!(overlay.devtool.as_deref(), Some("#source-map"));
    }

    #[test]
    fn vendor_precedes_common_in_cache_groups() {
        let policy = split_chunks_policy();
        let names: Vec<_> = policy.split_chunks.cache_groups.keys().cloned().collect();
        assert_eq!(names, vec!["vendors", "common"]);

        let common = &policy.split_chunks.cache_groups["common"];
        assert_eq!(common.min_chunks, Some(2));
        assert_eq!(common.priority, Some(-20));
        assert!(common.reuse_existing_chunk);
    }

    #[test]
    fn style_chains_carry_the_source_map_flag() {
        let rules = style_rules(true);
        assert_eq!(rules.len(), 3);
        for rule in &rules {
            assert_eq!(rule.chain[0].name, "css-extract-loader");
            assert_eq!(rule.chain[1].options["sourceMap"], true);
        }
        assert_eq!(rules[1].chain.last().unwrap().name, "less-loader");
    }
}
