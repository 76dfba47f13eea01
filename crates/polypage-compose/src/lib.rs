//! Configuration composition engine for multi-page bundler builds.
//!
//! Builds an ordered loader-rule pipeline from feature flags, deep-merges a
//! production overlay onto it, resolves build entries with a three-tier
//! fallback (explicit config, existence check, filesystem auto-discovery),
//! and emits one HTML artifact descriptor per resolved page. The result is a
//! single immutable [`BundlerConfig`] value handed to an external bundler
//! runtime; nothing here transforms source code or performs output I/O.

pub mod compose;
pub mod config;
pub mod error;
pub mod html;
pub mod merge;
pub mod overlay;
pub mod resolver;
pub mod rules;

#[cfg(feature = "logging")]
pub mod logging;

// Re-export main types
pub use compose::{base_config, compose_production};
pub use config::*;
pub use error::*;
pub use html::{default_template_path, generate_pages, HtmlArtifact};
pub use merge::merge;
pub use resolver::{resolve, scan_pages, EntryResolution, ResolutionMode};
pub use rules::*;
