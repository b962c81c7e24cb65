use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::VcsWalker;

/// Name of the entry marking a repository root
const VCS_MARKER: &str = ".git";

/// Filesystem walker backed by `walkdir`
///
/// Reports `.git` entries (directories, or files for worktrees and
/// submodules) without descending into them. Symlinks are not followed.
#[derive(Debug, Default, Clone, Copy)]
pub struct WalkDirWalker;

impl WalkDirWalker {
    /// Creates a new WalkDirWalker
    pub fn new() -> Self {
        Self
    }
}

impl VcsWalker for WalkDirWalker {
    fn find_vcs_roots(&self, base_dir: &Path, max_depth: usize) -> Vec<PathBuf> {
        let mut markers = Vec::new();
        let mut entries = WalkDir::new(base_dir)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = entries.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.file_name() != VCS_MARKER {
                continue;
            }
            if entry.file_type().is_dir() {
                entries.skip_current_dir();
            }
            markers.push(entry.into_path());
        }

        markers
    }
}
