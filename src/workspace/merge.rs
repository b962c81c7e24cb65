use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::{RawCandidate, WorkspaceKind, WorkspaceRecord};

/// Collapse candidates from both adapters into one record per name
///
/// A live session always wins over a project with the same name: the name is
/// pinned and later projects for it are dropped. Two projects with the same
/// name keep the one with the lexicographically smallest path, so the result
/// does not depend on walk order.
///
/// Output is sorted sessions first, then projects, each group by name.
pub fn merge<I>(candidates: I) -> Vec<WorkspaceRecord>
where
    I: IntoIterator<Item = RawCandidate>,
{
    let mut slots: HashMap<String, WorkspaceRecord> = HashMap::new();
    let mut pinned: HashSet<String> = HashSet::new();

    for candidate in candidates {
        match candidate.kind {
            WorkspaceKind::ActiveSession => {
                pinned.insert(candidate.name.clone());
                if let Some(shadowed) = slots.insert(candidate.name.clone(), candidate) {
                    if let Some(path) = shadowed.path {
                        debug!("Project {} shadowed by live session {}", path, shadowed.name);
                    }
                }
            }
            WorkspaceKind::Project => {
                if pinned.contains(&candidate.name) {
                    debug!(
                        "Project {:?} shadowed by live session {}",
                        candidate.path, candidate.name
                    );
                    continue;
                }
                match slots.entry(candidate.name.clone()) {
                    Entry::Vacant(slot) => {
                        slot.insert(candidate);
                    }
                    Entry::Occupied(mut slot) => {
                        // Unpinned, so the occupant is a project too
                        let shadowed = if candidate.path < slot.get().path {
                            slot.insert(candidate)
                        } else {
                            candidate
                        };
                        warn!(
                            "Name collision for '{}': ignoring project at {}",
                            shadowed.name,
                            shadowed.path.as_deref().unwrap_or_default()
                        );
                    }
                }
            }
        }
    }

    let mut records: Vec<WorkspaceRecord> = slots.into_values().collect();
    records.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));
    records
}
