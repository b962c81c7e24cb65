use anyhow::Result;
use tracing::{debug, warn};

use super::Multiplexer;
use crate::workspace::{has_reserved, RawCandidate, WorkspaceRecord};

/// Live tmux sessions as workspace candidates
///
/// Session names are used as-is; tmux already enforces its own naming rules.
pub fn list_active_sessions<M: Multiplexer + ?Sized>(mux: &M) -> Result<Vec<RawCandidate>> {
    let names = mux.list_sessions()?;
    debug!("tmux reports {} live sessions", names.len());

    Ok(names
        .into_iter()
        .filter(|name| {
            let usable = !name.is_empty() && !has_reserved(name);
            if !usable {
                warn!("Skipping session with unusable name: {:?}", name);
            }
            usable
        })
        .map(WorkspaceRecord::session)
        .collect())
}
