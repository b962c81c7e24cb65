//! Selection line codec.
//!
//! The picker only ever hands back one line of text. Each record is written
//! as `label \t name \t kind \t path` so the picker can show the label alone
//! (`--with-nth 1`) and the chosen line can be decoded back into a typed
//! decision. Tab is reserved: records carrying it in any field are never
//! encoded.

use thiserror::Error;

use super::{WorkspaceKind, WorkspaceRecord};

/// Reserved separator between fields of a selection line
pub const FIELD_SEPARATOR: char = '\t';

const FIELD_COUNT: usize = 4;

/// Error decoding a line returned by the picker
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Picker returned nothing usable
    #[error("empty selection")]
    Empty,

    /// Wrong number of separated fields
    #[error("malformed selection: expected 4 fields, found {found}")]
    FieldCount { found: usize },

    /// Name field present but blank
    #[error("malformed selection: empty workspace name")]
    EmptyName,

    /// Kind field is not one we write
    #[error("malformed selection: unknown kind '{0}'")]
    UnknownKind(String),
}

/// What the user picked, reconstructed from the selection line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionDecision {
    /// Logical name (tmux session name)
    pub name: String,
    /// Project root when the pick was a project without a session
    pub project_path: Option<String>,
}

impl SelectionDecision {
    /// Whether the pick still needs a session created
    pub fn is_project(&self) -> bool {
        self.project_path.is_some()
    }
}

/// A record as handed to the picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecord {
    /// Human-facing text shown in the picker
    pub label: String,
    /// Record this line encodes
    pub record: WorkspaceRecord,
}

impl DisplayRecord {
    /// Project a record for display
    ///
    /// Returns `None` when the name or path contains the reserved separator
    /// or a line break, since such a line could not be decoded faithfully.
    pub fn from_record(record: WorkspaceRecord) -> Option<Self> {
        if has_reserved(&record.name) || record.path.as_deref().is_some_and(has_reserved) {
            return None;
        }
        let label = match &record.path {
            Some(path) => format!("[{}] {}  {}", record.kind, record.name, abbreviate_home(path)),
            None => format!("[{}] {}", record.kind, record.name),
        };
        Some(Self {
            label: label.replace(has_reserved_char, " "),
            record,
        })
    }

    /// Encode as one picker line (no trailing newline)
    pub fn to_line(&self) -> String {
        let sep = FIELD_SEPARATOR.to_string();
        [
            self.label.as_str(),
            self.record.name.as_str(),
            self.record.kind.tag(),
            self.record.path.as_deref().unwrap_or_default(),
        ]
        .join(&sep)
    }
}

/// Decode a line produced by [`DisplayRecord::to_line`]
pub fn decode(line: &str) -> Result<SelectionDecision, DecodeError> {
    let line = line.trim_end_matches(['\n', '\r']);
    if line.trim().is_empty() {
        return Err(DecodeError::Empty);
    }

    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(DecodeError::FieldCount {
            found: fields.len(),
        });
    }

    let name = fields[1];
    if name.is_empty() {
        return Err(DecodeError::EmptyName);
    }
    if WorkspaceKind::from_tag(fields[2]).is_none() {
        return Err(DecodeError::UnknownKind(fields[2].to_string()));
    }

    let path = fields[3];
    Ok(SelectionDecision {
        name: name.to_string(),
        project_path: (!path.is_empty()).then(|| path.to_string()),
    })
}

/// Whether a field value would break the line format
pub fn has_reserved(value: &str) -> bool {
    value.chars().any(has_reserved_char)
}

fn has_reserved_char(c: char) -> bool {
    c == FIELD_SEPARATOR || c == '\n' || c == '\r'
}

/// `/home/user/Projects/x` → `~/Projects/x`
fn abbreviate_home(path: &str) -> String {
    if let Some(home) = dirs::home_dir() {
        let home = home.to_string_lossy();
        if let Some(rest) = path.strip_prefix(home.as_ref()) {
            if rest.is_empty() || rest.starts_with('/') {
                return format!("~{}", rest);
            }
        }
    }
    path.to_string()
}
