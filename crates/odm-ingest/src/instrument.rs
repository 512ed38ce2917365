//! Instrument Designation parsing: the event-to-form relation.

use std::path::Path;

use odm_model::InstrumentCatalog;

use crate::csv_table::{CsvTable, read_csv_table};
use crate::error::Result;

const TABLE: &str = "instrument designation";
const COL_EVENT: &str = "unique_event_name";
const COL_FORM: &str = "form";

pub fn load_instrument_catalog(path: &Path) -> Result<InstrumentCatalog> {
    let table = read_csv_table(path)?;
    parse_instrument_catalog(&table)
}

pub fn parse_instrument_catalog(table: &CsvTable) -> Result<InstrumentCatalog> {
    let event_idx = table.require_column(TABLE, COL_EVENT)?;
    let form_idx = table.require_column(TABLE, COL_FORM)?;

    let mut catalog = InstrumentCatalog::default();
    for row in &table.rows {
        let event = row[event_idx].as_str();
        let form = row[form_idx].as_str();
        if event.is_empty() || form.is_empty() {
            continue;
        }
        catalog.insert(event, form);
    }
    Ok(catalog)
}
