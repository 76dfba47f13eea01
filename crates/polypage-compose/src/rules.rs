//! Ordered transformation-rule construction.
//!
//! The rule list is assembled declaratively from [`FeatureFlags`] in one
//! place, so registration order is an explicit contract instead of an
//! artifact of imperative pushes. Lint rules are appended last but carry
//! [`RulePhase::Pre`], which the bundler runtime applies ahead of every
//! normal-phase rule - diagnostics run on un-transformed source.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use polypage_config::{FeatureFlags, ProjectConfig};

/// File-pattern matcher keyed on extension, tolerant of `?query` suffixes
/// (asset references like `logo.png?inline` match their extension rule).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchExpression {
    pub extensions: Vec<String>,
}

impl MatchExpression {
    pub fn extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        let path = path.split('?').next().unwrap_or(path);
        match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some(ext) => self
                .extensions
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

/// Application phase of a rule. `Pre` rules run before every `Normal` rule
/// regardless of registration position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulePhase {
    #[default]
    Normal,
    /// Pre-processing enforcement (lint) phase.
    Pre,
}

/// One loader invocation in a transform chain. Opaque beyond its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

impl LoaderSpec {
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

/// A declarative association between a file pattern and an ordered chain of
/// source-to-artifact transforms. All rules matching a file apply, in
/// registration order within their phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformRule {
    pub pattern: MatchExpression,
    pub chain: Vec<LoaderSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<PathBuf>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<PathBuf>,

    #[serde(default)]
    pub phase: RulePhase,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

impl TransformRule {
    fn new(pattern: MatchExpression, chain: Vec<LoaderSpec>) -> Self {
        Self {
            pattern,
            chain,
            include: Vec::new(),
            exclude: Vec::new(),
            phase: RulePhase::Normal,
            options: Value::Null,
        }
    }

    fn include(mut self, paths: &[&Path]) -> Self {
        self.include = paths.iter().map(|p| p.to_path_buf()).collect();
        self
    }

    fn exclude(mut self, paths: &[&Path]) -> Self {
        self.exclude = paths.iter().map(|p| p.to_path_buf()).collect();
        self
    }

    fn pre(mut self) -> Self {
        self.phase = RulePhase::Pre;
        self
    }
}

/// Paths and parameters the rule builder needs from the project.
#[derive(Debug, Clone)]
pub struct RuleContext {
    pub src_dir: PathBuf,
    pub test_dir: PathBuf,
    pub public_dir: PathBuf,
    /// Data directory excluded from parameter substitution.
    pub mock_data_dir: PathBuf,
    pub node_modules_dir: PathBuf,
    pub assets_sub_directory: PathBuf,
    pub lint_config_dir: PathBuf,
    pub env_params: HashMap<String, String>,
}

impl RuleContext {
    pub fn from_project(project: &ProjectConfig) -> Self {
        Self {
            src_dir: PathBuf::from("src"),
            test_dir: PathBuf::from("test"),
            public_dir: PathBuf::from("public"),
            mock_data_dir: PathBuf::from("src/mock/data"),
            node_modules_dir: PathBuf::from("node_modules"),
            assets_sub_directory: project.build.assets_sub_directory.clone(),
            lint_config_dir: project.settings.eslint_config_dir.clone(),
            env_params: project.env_params.clone(),
        }
    }
}

/// Emitted-asset name under the configured assets subdirectory, forward
/// slashes regardless of host platform (the value lands in bundler output
/// naming, not in local fs calls).
pub fn assets_path(assets_sub_directory: &Path, relative: &str) -> String {
    let sub = assets_sub_directory.to_string_lossy().replace('\\', "/");
    format!("{}/{}", sub.trim_end_matches('/'), relative)
}

/// Build the full ordered rule list for one composition run.
///
/// Pure function over flags and context; the same inputs always produce the
/// same list.
pub fn build_rules(flags: &FeatureFlags, ctx: &RuleContext) -> Vec<TransformRule> {
    let source_dirs: &[&Path] = &[&ctx.src_dir, &ctx.test_dir];
    let lintable_dirs: &[&Path] = &[&ctx.src_dir, &ctx.public_dir];

    let mut rules = vec![
        // Single-file markup components
        TransformRule::new(
            MatchExpression::extensions(["vue"]),
            vec![LoaderSpec::new("vue-loader")],
        ),
        // Typed scripts: prune unused lib imports before transpiling,
        // type-checking itself stays off (transpile-only)
        TransformRule::new(
            MatchExpression::extensions(["ts", "tsx"]),
            vec![LoaderSpec::with_options(
                "ts-loader",
                json!({
                    "transpileOnly": true,
                    "importPruning": true,
                    "compilerOptions": { "module": "es2015" }
                }),
            )],
        )
        .include(source_dirs)
        .exclude(&[&ctx.node_modules_dir]),
        // Generic scripts
        TransformRule::new(
            MatchExpression::extensions(["js", "jsx", "ts", "tsx"]),
            vec![LoaderSpec::new("babel-loader")],
        )
        .include(source_dirs)
        .exclude(&[&ctx.node_modules_dir]),
        // Binary assets: below the byte limit files inline as data URIs,
        // at or above it they emit as content-hashed files per category
        url_rule(
            ctx,
            &["png", "jpg", "jpeg", "gif", "svg"],
            "img/[name].[hash:7].[ext]",
        ),
        url_rule(
            ctx,
            &["mp4", "webm", "ogg", "mp3", "wav", "flac", "aac"],
            "media/[name].[hash:7].[ext]",
        ),
        url_rule(
            ctx,
            &["woff", "woff2", "eot", "ttf", "otf"],
            "fonts/[name].[hash:7].[ext]",
        ),
        // Markup templates
        TransformRule::new(
            MatchExpression::extensions(["html"]),
            vec![LoaderSpec::new("html-loader")],
        ),
        // Environment parameter substitution over all source-like files,
        // except the mock data directory
        TransformRule::new(
            MatchExpression::extensions(["js", "ts", "tsx", "jsx", "vue", "css", "html"]),
            vec![LoaderSpec::with_options(
                "params-replace-loader",
                json!(ctx.env_params),
            )],
        )
        .include(source_dirs)
        .exclude(&[&ctx.node_modules_dir, &ctx.mock_data_dir]),
    ];

    if flags.enable_lint {
        for (extensions, config_file) in [
            (vec!["js", "jsx"], ".eslintrc.js"),
            (vec!["vue"], ".eslintrc.vue.js"),
            (vec!["ts", "tsx"], ".eslintrc.ts.js"),
        ] {
            rules.push(
                TransformRule::new(
                    MatchExpression::extensions(extensions),
                    vec![LoaderSpec::with_options(
                        "eslint-loader",
                        json!({
                            "formatter": "eslint-friendly-formatter",
                            "configFile": ctx.lint_config_dir.join(config_file),
                        }),
                    )],
                )
                .include(lintable_dirs)
                .exclude(&[&ctx.node_modules_dir])
                .pre(),
            );
        }
    }

    rules
}

/// Rules in effective application order: `Pre` phase first, registration
/// order preserved within each phase.
pub fn effective_order(rules: &[TransformRule]) -> Vec<&TransformRule> {
    let mut ordered: Vec<&TransformRule> = rules
        .iter()
        .filter(|r| r.phase == RulePhase::Pre)
        .collect();
    ordered.extend(rules.iter().filter(|r| r.phase == RulePhase::Normal));
    ordered
}

fn url_rule(ctx: &RuleContext, extensions: &[&str], name: &str) -> TransformRule {
    TransformRule::new(
        MatchExpression::extensions(extensions.iter().copied()),
        vec![LoaderSpec::with_options(
            "url-loader",
            json!({
                "limit": 10000,
                "name": assets_path(&ctx.assets_sub_directory, name),
            }),
        )],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RuleContext {
        RuleContext::from_project(&ProjectConfig::default())
    }

    fn loader_names(rules: &[TransformRule]) -> Vec<&str> {
        rules
            .iter()
            .map(|r| r.chain[0].name.as_str())
            .collect()
    }

    #[test]
    fn base_rules_have_fixed_order() {
        let rules = build_rules(&FeatureFlags::default(), &ctx());
        assert_eq!(
            loader_names(&rules),
            vec![
                "vue-loader",
                "ts-loader",
                "babel-loader",
                "url-loader",
                "url-loader",
                "url-loader",
                "html-loader",
                "params-replace-loader",
            ]
        );
    }

    #[test]
    fn lint_disabled_produces_no_pre_rules() {
        let rules = build_rules(&FeatureFlags::default(), &ctx());
        assert!(rules.iter().all(|r| r.phase == RulePhase::Normal));
    }

    #[test]
    fn lint_enabled_appends_three_pre_rules() {
        let flags = FeatureFlags {
            enable_lint: true,
            ..FeatureFlags::default()
        };
        let rules = build_rules(&flags, &ctx());

        let pre: Vec<_> = rules.iter().filter(|r| r.phase == RulePhase::Pre).collect();
        assert_eq!(pre.len(), 3);
        assert!(pre.iter().all(|r| r.chain[0].name == "eslint-loader"));
    }

    #[test]
    fn lint_rules_precede_language_rules_in_effective_order() {
        let flags = FeatureFlags {
            enable_lint: true,
            ..FeatureFlags::default()
        };
        let rules = build_rules(&flags, &ctx());
        let ordered = effective_order(&rules);

        for sample in ["src/main.ts", "src/app.vue", "src/util.js"] {
            let lint_pos = ordered
                .iter()
                .position(|r| r.chain[0].name == "eslint-loader" && r.pattern.matches(sample))
                .expect("lint rule matches");
            let lang_pos = ordered
                .iter()
                .position(|r| r.phase == RulePhase::Normal && r.pattern.matches(sample))
                .expect("language rule matches");
            assert!(lint_pos < lang_pos, "lint must precede transform for {sample}");
        }
    }

    #[test]
    fn match_expression_tolerates_query_suffix() {
        let images = MatchExpression::extensions(["png", "jpg", "jpeg", "gif", "svg"]);
        assert!(images.matches("assets/logo.png"));
        assert!(images.matches("assets/logo.jpeg?v=2"));
        assert!(!images.matches("assets/logo.webp"));
        assert!(!images.matches("README"));
    }

    #[test]
    fn asset_names_live_under_the_assets_subdirectory() {
        let rules = build_rules(&FeatureFlags::default(), &ctx());
        let images = &rules[3];
        assert_eq!(
            images.chain[0].options["name"],
            json!("static/img/[name].[hash:7].[ext]")
        );
    }

    #[test]
    fn substitution_rule_excludes_mock_data() {
        let rules = build_rules(&FeatureFlags::default(), &ctx());
        let subst = rules.last().unwrap();
        assert_eq!(subst.chain[0].name, "params-replace-loader");
        assert!(subst
            .exclude
            .contains(&PathBuf::from("src/mock/data")));
    }
}
