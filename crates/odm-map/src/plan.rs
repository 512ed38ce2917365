//! Selection plans: a JSON description of the choices a user would make
//! in the interactive selection screens.
//!
//! A plan lists, per sheet, the checked fields and their event/form/
//! variable choices. Sheet-level `event`/`form` entries exercise the
//! apply-to-all-below propagation; per-field entries override them.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use odm_model::{SheetFields, Workbook};

use crate::tracker::{SelectionTracker, Stage};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionPlan {
    pub sheets: Vec<SheetPlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetPlan {
    pub sheet: String,
    /// Event applied to every checked field of the sheet.
    #[serde(default)]
    pub event: Option<String>,
    /// Form applied to every checked field of the sheet.
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldPlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldPlan {
    pub field: String,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub form: Option<String>,
    pub variable: String,
}

pub fn load_plan(path: &Path) -> Result<SelectionPlan> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read selection plan {}", path.display()))?;
    let plan: SelectionPlan = serde_json::from_str(&contents)
        .with_context(|| format!("parse selection plan {}", path.display()))?;
    Ok(plan)
}

/// Build a tracker from the plan: check the listed fields, then replay
/// the sheet-level and per-field choices stage by stage.
///
/// Entries naming sheets or fields the workbook does not have are
/// skipped with a warning; the GUI this replaces could not produce them.
pub fn apply_plan(workbook: &Workbook, plan: &SelectionPlan) -> SelectionTracker {
    let checked: Vec<SheetFields> = plan
        .sheets
        .iter()
        .map(|sheet| SheetFields {
            sheet: sheet.sheet.clone(),
            fields: sheet.fields.iter().map(|field| field.field.clone()).collect(),
        })
        .collect();
    let mut tracker = SelectionTracker::new(workbook, &checked);

    for sheet in &plan.sheets {
        let marker = tracker.marker_index(&sheet.sheet);
        if marker.is_none() && !sheet.fields.is_empty() {
            warn!(sheet = %sheet.sheet, "plan names a sheet absent from the workbook");
            continue;
        }
        if let Some(index) = marker {
            if let Some(event) = &sheet.event {
                tracker.assign(Stage::Events, index, event);
            }
            if let Some(form) = &sheet.form {
                tracker.assign(Stage::Forms, index, form);
            }
        }
        for field in &sheet.fields {
            let Some(index) = tracker.field_index(&sheet.sheet, &field.field) else {
                warn!(
                    sheet = %sheet.sheet,
                    field = %field.field,
                    "plan names a field absent from the workbook"
                );
                continue;
            };
            if let Some(event) = &field.event {
                tracker.assign(Stage::Events, index, event);
            }
            if let Some(form) = &field.form {
                tracker.assign(Stage::Forms, index, form);
            }
            tracker.assign(Stage::Variables, index, &field.variable);
        }
    }
    tracker
}
