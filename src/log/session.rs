/// Edit history of one chart session
///
/// Rule changes and toggles are kept as structured [`Edit`]s so a saved
/// JSON history can be replayed onto another chart of the same compound.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::engine::classify::{ShapeKind, TableKind};

#[derive(Debug, Error)]
pub enum SessionLogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Session JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One change to the chart's rule tables or toggles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    ColorRule { key: String, color: String },
    ShapeRule { key: String, shape: ShapeKind },
    RemoveRule { table: TableKind, key: String },
    Jitter { enabled: bool },
    Violin { enabled: bool },
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_off = |enabled: bool| if enabled { "on" } else { "off" };
        match self {
            Edit::ColorRule { key, color } => write!(f, "color rule {} = {}", key, color),
            Edit::ShapeRule { key, shape } => write!(f, "shape rule {} = {}", key, shape),
            Edit::RemoveRule { table, key } => write!(f, "remove {} rule {}", table, key),
            Edit::Jitter { enabled } => write!(f, "jitter {}", on_off(*enabled)),
            Edit::Violin { enabled } => write!(f, "violin {}", on_off(*enabled)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRecord {
    pub sequence: usize,
    pub at: DateTime<Local>,
    #[serde(flatten)]
    pub edit: Edit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionLog {
    pub session_id: Uuid,
    pub compound: String,
    pub started: DateTime<Local>,
    pub edits: Vec<EditRecord>,
}

impl SessionLog {
    pub fn new(compound: &str) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            compound: compound.to_string(),
            started: Local::now(),
            edits: Vec::new(),
        }
    }

    pub fn record(&mut self, edit: Edit) {
        let sequence = self.edits.len() + 1;
        log::info!("{} edit #{}: {}", self.compound, sequence, edit);
        self.edits.push(EditRecord {
            sequence,
            at: Local::now(),
            edit,
        });
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn to_text(&self) -> String {
        let mut out = format!(
            "Session {} on {}\nStarted {}\n\n",
            self.session_id,
            self.compound,
            self.started.format("%Y-%m-%d %H:%M:%S")
        );
        if self.is_empty() {
            out.push_str("  (no edits)\n");
        }
        for record in &self.edits {
            out.push_str(&format!(
                "  #{:<3} {}  {}\n",
                record.sequence,
                record.at.format("%H:%M:%S"),
                record.edit
            ));
        }
        out
    }

    /// Write JSON for a `.json` path, plain text otherwise
    pub fn save(&self, path: &Path) -> Result<(), SessionLogError> {
        let is_json = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let contents = if is_json {
            serde_json::to_string_pretty(self)?
        } else {
            self.to_text()
        };
        std::fs::write(path, contents)?;
        log::info!("Saved {} edits to {}", self.len(), path.display());
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self, SessionLogError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
