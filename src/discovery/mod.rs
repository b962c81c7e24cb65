//! Project discovery: turn VCS roots under the base directory into
//! project candidates.

mod walker;

pub use walker::WalkDirWalker;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::workspace::{has_reserved, sanitize, RawCandidate, WorkspaceRecord};

/// Source of VCS root markers
pub trait VcsWalker {
    /// Paths of VCS markers (e.g. `<root>/.git`) at most `max_depth` levels
    /// below `base_dir`
    fn find_vcs_roots(&self, base_dir: &Path, max_depth: usize) -> Vec<PathBuf>;
}

/// Discover project candidates under `base_dir`
///
/// The parent of each marker is the project root; its basename, sanitized,
/// is the logical name. Roots without a usable basename (`.`, empty,
/// non UTF-8) and paths that cannot be carried through the picker line are
/// skipped.
pub fn discover_projects<W: VcsWalker + ?Sized>(
    walker: &W,
    base_dir: &Path,
    max_depth: usize,
) -> Vec<RawCandidate> {
    let markers = walker.find_vcs_roots(base_dir, max_depth);
    debug!("Found {} VCS markers under {}", markers.len(), base_dir.display());

    markers
        .iter()
        .filter_map(|marker| project_from_marker(marker))
        .collect()
}

fn project_from_marker(marker: &Path) -> Option<RawCandidate> {
    let root = marker.parent()?;

    let basename = match root.file_name().map(|n| n.to_str()) {
        Some(Some(name)) if !name.is_empty() && name != "." => name,
        Some(None) => {
            warn!("Skipping project with non UTF-8 name: {}", root.display());
            return None;
        }
        _ => {
            debug!("Skipping degenerate project root: {:?}", root);
            return None;
        }
    };

    let Some(path) = root.to_str() else {
        warn!("Skipping project with non UTF-8 path: {}", root.display());
        return None;
    };
    if has_reserved(path) {
        warn!("Skipping project with tab or newline in path: {:?}", path);
        return None;
    }

    Some(WorkspaceRecord::project(sanitize(basename), path))
}
