//! Metadata and workbook inspection tables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};

use odm_ingest::{load_data_dictionary, load_instrument_catalog, load_workbook};

/// Rendered inspection tables. `sheets` is present only when sheet
/// files were given.
pub struct InspectReport {
    pub events: Table,
    pub forms: Table,
    pub sheets: Option<Table>,
}

/// Build the inspection tables: events with their forms, forms with
/// variable and default counts, and optionally the sheets with their
/// fields.
pub fn build_inspect_report(
    instrument: &Path,
    dictionary: &Path,
    sheet_paths: &[PathBuf],
) -> Result<InspectReport> {
    let catalog = load_instrument_catalog(instrument).context("load instrument designation")?;
    let dictionary = load_data_dictionary(dictionary).context("load data dictionary")?;

    let mut events = Table::new();
    events.set_header(vec!["Event", "Forms"]);
    apply_table_style(&mut events);
    for entry in &catalog.events {
        events.add_row(vec![entry.event.clone(), entry.forms.join(", ")]);
    }

    let mut forms = Table::new();
    forms.set_header(vec!["Form", "Variables", "Defaults"]);
    apply_table_style(&mut forms);
    for entry in &dictionary.forms {
        let defaults = entry
            .variables
            .iter()
            .filter(|variable| dictionary.default_for(variable).is_some())
            .count();
        forms.add_row(vec![
            entry.form.clone(),
            entry.variables.len().to_string(),
            defaults.to_string(),
        ]);
    }

    let sheets = if sheet_paths.is_empty() {
        None
    } else {
        let workbook = load_workbook(sheet_paths).context("load workbook sheets")?;
        let mut table = Table::new();
        table.set_header(vec!["Sheet", "Rows", "Fields"]);
        apply_table_style(&mut table);
        for sheet in &workbook.sheets {
            table.add_row(vec![
                sheet.name.clone(),
                sheet.rows.len().to_string(),
                sheet.fields().join(", "),
            ]);
        }
        Some(table)
    };

    Ok(InspectReport {
        events,
        forms,
        sheets,
    })
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}
