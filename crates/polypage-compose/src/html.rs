//! Per-entry page artifact generation.
//!
//! Each resolved entry gets one HTML shell descriptor, except the implicit
//! single-page case: a single explicit entry whose file passed the existence
//! check is served by the bundler's default page and deliberately produces
//! no explicit artifact. That special case is a simplification for the
//! common single-page project, not a general rule.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::PluginSpec;
use crate::resolver::{EntryResolution, ResolutionMode};

/// Descriptor for one generated HTML shell, tied to one entry. Never
/// mutated after creation; owned by the composed plugin list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlArtifact {
    pub entry_name: String,
    pub template: PathBuf,
    pub filename: String,
}

impl HtmlArtifact {
    fn new(entry_name: &str, template: &Path) -> Self {
        Self {
            entry_name: entry_name.to_string(),
            template: template.to_path_buf(),
            filename: format!("{entry_name}.html"),
        }
    }
}

impl From<&HtmlArtifact> for PluginSpec {
    fn from(artifact: &HtmlArtifact) -> Self {
        PluginSpec::with_options(
            "html-page",
            json!({
                "entry": artifact.entry_name,
                "template": artifact.template,
                "filename": artifact.filename,
                "chunks": [artifact.entry_name],
            }),
        )
    }
}

/// Path of the page template packaged with this crate, used when the
/// project does not configure one.
pub fn default_template_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join("template")
        .join("index.html")
}

/// One artifact per resolved entry, `<name>.html`, in entry order.
/// The implicit single-page mode yields none.
pub fn generate_pages(resolution: &EntryResolution, template: &Path) -> Vec<HtmlArtifact> {
    if resolution.mode == ResolutionMode::ImplicitSinglePage {
        return Vec::new();
    }

    resolution
        .entries
        .names()
        .map(|name| HtmlArtifact::new(name, template))
        .collect()
}
