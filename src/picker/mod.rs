//! Fuzzy picker capability.

mod fzf;

pub use fzf::FzfPicker;

use anyhow::Result;

use crate::workspace::DisplayRecord;

/// Interactive single-choice picker
pub trait Picker {
    /// Fail if the picker cannot be run at all
    fn ensure_available(&self) -> Result<()>;

    /// Let the user choose one record, pre-filtered by `query`
    ///
    /// Returns the full encoded line of the chosen record, or `None` when the
    /// user cancelled or nothing matched. When exactly one record matches a
    /// non-empty query it is chosen without prompting.
    fn pick_one(&self, records: &[DisplayRecord], query: &str) -> Result<Option<String>>;
}
