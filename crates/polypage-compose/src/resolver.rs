//! Entry resolution with three-tier fallback.
//!
//! The decision procedure between explicit configuration, existence checks
//! and filesystem auto-discovery. The existence check and the scan are
//! injected so the policy is unit-testable without touching a real
//! filesystem.
//!
//! Policy:
//!
//! 1. empty explicit map - auto-discover everything;
//! 2. exactly one explicit entry - check its candidate path (the last
//!    element of a sequence) on disk. Present: keep it, implicit
//!    single-page mode. Missing: discard for a non-empty scan, otherwise
//!    retain the broken entry unchanged (better a broken reference than
//!    silently no entries);
//! 3. two or more explicit entries - keep them as-is, no existence checks.
//!
//! The asymmetry between branches 2 and 3 (one validates existence, the
//! other does not) is inherited behavior and preserved deliberately;
//! downstream semantics for multi-entry maps with missing files are
//! unspecified upstream and must not be silently altered.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use polypage_config::{EntryMap, EntrySpec};

/// How the final entry map was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    /// No usable explicit config; entries come from the page scan.
    Discovered,

    /// One explicit entry whose file exists. Handled as a single implicit
    /// default page downstream - no explicit page artifacts.
    ImplicitSinglePage,

    /// The single explicit entry's file was missing; the scan replaced it.
    DiscoveredAfterMiss,

    /// The single explicit entry's file was missing and the scan found
    /// nothing; the broken entry is carried forward unchanged.
    RetainedMissing,

    /// Two or more explicit entries, accepted without existence checks.
    ExplicitMulti,
}

/// Resolved entries plus the branch that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryResolution {
    pub entries: EntryMap,
    pub mode: ResolutionMode,
}

/// Resolve the final entry map from explicit configuration, an existence
/// check, and an auto-discovery scan.
pub fn resolve<E, S>(explicit: &EntryMap, exists: E, scan: S) -> EntryResolution
where
    E: Fn(&Path) -> bool,
    S: FnOnce() -> EntryMap,
{
    if explicit.is_empty() {
        debug!("no explicit entries, scanning pages directory");
        return EntryResolution {
            entries: scan(),
            mode: ResolutionMode::Discovered,
        };
    }

    if let Some((name, spec)) = sole_entry(explicit) {
        let found = spec.candidate().is_some_and(&exists);

        if found {
            return EntryResolution {
                entries: explicit.clone(),
                mode: ResolutionMode::ImplicitSinglePage,
            };
        }

        let scanned = scan();
        if scanned.is_empty() {
            warn!(
                entry = %name,
                "entry file missing and no pages discovered, keeping broken entry"
            );
            return EntryResolution {
                entries: explicit.clone(),
                mode: ResolutionMode::RetainedMissing,
            };
        }

        debug!(
            entry = %name,
            pages = scanned.len(),
            "entry file missing, replaced by discovered pages"
        );
        return EntryResolution {
            entries: scanned,
            mode: ResolutionMode::DiscoveredAfterMiss,
        };
    }

    EntryResolution {
        entries: explicit.clone(),
        mode: ResolutionMode::ExplicitMulti,
    }
}

fn sole_entry(entries: &EntryMap) -> Option<(&String, &EntrySpec)> {
    if entries.len() == 1 {
        entries.iter().next()
    } else {
        None
    }
}

/// Script extensions recognized by the page scan, in preference order.
const PAGE_INDEX_CANDIDATES: [&str; 4] = ["index.ts", "index.tsx", "index.js", "index.jsx"];
const PAGE_FILE_EXTENSIONS: [&str; 4] = ["ts", "tsx", "js", "jsx"];

/// Auto-discover entries from the conventional pages directory.
///
/// One entry per immediate subdirectory of `<root>/src/pages` containing an
/// index file, plus one per script file directly under it; names derive
/// from the relative path. The result is sorted by name so repeated scans
/// over an unchanged tree are identical.
pub fn scan_pages(root: &Path) -> EntryMap {
    let pages_dir = root.join("src").join("pages");
    let Ok(dir_entries) = fs::read_dir(&pages_dir) else {
        debug!(dir = %pages_dir.display(), "pages directory not readable");
        return EntryMap::new();
    };

    let mut found: Vec<(String, PathBuf)> = Vec::new();
    for dir_entry in dir_entries.flatten() {
        let path = dir_entry.path();
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        if path.is_dir() {
            if let Some(index) = PAGE_INDEX_CANDIDATES
                .iter()
                .map(|candidate| path.join(candidate))
                .find(|p| p.is_file())
            {
                found.push((name.to_string(), index));
            }
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| PAGE_FILE_EXTENSIONS.contains(&ext))
        {
            found.push((name.to_string(), path));
        }
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));
    found
        .into_iter()
        .map(|(name, path)| (name, EntrySpec::Single(path)))
        .collect()
}
