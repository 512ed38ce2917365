//! Progress snapshots: how far the user advanced through the selection
//! stages, plus the raw state needed to resume.
//!
//! The four stages carry the historical status codes 1 through 4: tree
//! only, +events, +events+forms, +events+forms+variables. The on-disk
//! format is JSON; only the stage semantics round-trip, not the bytes
//! of any older format.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use odm_model::{SheetFields, Workbook};

use crate::tracker::{SelectionTracker, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressStage {
    /// Only the sheet/field tree has selections.
    FieldsChecked,
    /// Events have been assigned.
    EventsAssigned,
    /// Events and forms have been assigned.
    FormsAssigned,
    /// All three stages are assigned; ready to convert.
    VariablesAssigned,
}

impl ProgressStage {
    pub fn as_code(self) -> u8 {
        match self {
            Self::FieldsChecked => 1,
            Self::EventsAssigned => 2,
            Self::FormsAssigned => 3,
            Self::VariablesAssigned => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::FieldsChecked),
            2 => Some(Self::EventsAssigned),
            3 => Some(Self::FormsAssigned),
            4 => Some(Self::VariablesAssigned),
            _ => None,
        }
    }
}

/// Source file paths the snapshot was taken against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePaths {
    pub sheets: Vec<PathBuf>,
    pub instrument: PathBuf,
    pub dictionary: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub sources: SourcePaths,
    pub stage: ProgressStage,
    pub checked: Vec<SheetFields>,
    pub events: Vec<Option<String>>,
    pub forms: Vec<Option<String>>,
    pub variables: Vec<Option<String>>,
}

impl ProgressSnapshot {
    /// Capture the tracker state; the stage is derived from which
    /// assignment vectors have started filling in.
    pub fn capture(sources: SourcePaths, tracker: &SelectionTracker) -> Self {
        let stage = if tracker.stage_started(Stage::Variables) {
            ProgressStage::VariablesAssigned
        } else if tracker.stage_started(Stage::Forms) {
            ProgressStage::FormsAssigned
        } else if tracker.stage_started(Stage::Events) {
            ProgressStage::EventsAssigned
        } else {
            ProgressStage::FieldsChecked
        };
        Self {
            sources,
            stage,
            checked: tracker.selected_sheets(),
            events: tracker.assignments(Stage::Events).to_vec(),
            forms: tracker.assignments(Stage::Forms).to_vec(),
            variables: tracker.assignments(Stage::Variables).to_vec(),
        }
    }

    /// Rebuild a tracker against the given workbook and replay the
    /// saved assignments.
    pub fn restore(&self, workbook: &Workbook) -> SelectionTracker {
        let mut tracker = SelectionTracker::new(workbook, &self.checked);
        tracker.restore_assignments(Stage::Events, &self.events);
        tracker.restore_assignments(Stage::Forms, &self.forms);
        tracker.restore_assignments(Stage::Variables, &self.variables);
        tracker
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(self).context("serialize progress snapshot")?;
        fs::write(path, contents)
            .with_context(|| format!("write progress snapshot {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read progress snapshot {}", path.display()))?;
        let snapshot = serde_json::from_str(&contents)
            .with_context(|| format!("parse progress snapshot {}", path.display()))?;
        Ok(snapshot)
    }
}
