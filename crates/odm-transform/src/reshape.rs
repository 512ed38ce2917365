//! Reshaping flat sheet rows into per-subject records.
//!
//! Two repetition semantics exist in the wild: a field repeating as
//! several columns of one row (column mode, one value per field, last
//! matching row wins) and a field repeating as several rows sharing the
//! subject key (row mode, an ordered value list per field).

use tracing::{debug, trace};

use odm_model::{
    PatientRecord, RepeatMode, Sheet, SheetFields, SheetRecord, Workbook, redact_value,
};

/// Subject ids from column 0 of the first sheet's data rows.
///
/// Null key cells contribute nothing; duplicate ids are kept. Reshaping
/// merges rows sharing an id into a single record.
pub fn collect_subject_ids(workbook: &Workbook) -> Vec<String> {
    let Some(sheet) = workbook.subject_sheet() else {
        return Vec::new();
    };
    (0..sheet.rows.len())
        .filter_map(|row| sheet.key_cell(row).map(ToString::to_string))
        .collect()
}

/// Reshape the selected sheets/fields into per-subject records.
///
/// The scan is strictly sequential; column-mode overwrites and row-mode
/// append order both depend on it. Running twice over unchanged input
/// yields an identical record set.
pub fn reshape(
    workbook: &Workbook,
    selected: &[SheetFields],
    mode: RepeatMode,
) -> Vec<PatientRecord> {
    let mut subject_ids = collect_subject_ids(workbook);
    dedup_preserving_order(&mut subject_ids);

    let mut records = Vec::new();
    for subject_id in &subject_ids {
        let mut record = PatientRecord::new(subject_id.clone());
        for sheet in &workbook.sheets {
            let Some(fields) = selected
                .iter()
                .find(|entry| entry.sheet == sheet.name)
                .map(|entry| entry.fields.as_slice())
            else {
                continue;
            };
            if let Some(sheet_record) = reshape_sheet(sheet, subject_id, fields, mode) {
                record.push_sheet(sheet_record);
            }
        }
        if !record.sheets.is_empty() {
            debug!(
                subject = redact_value(&record.subject_id),
                sheets = record.sheets.len(),
                "reshaped subject"
            );
            records.push(record);
        }
    }
    records
}

/// One subject's slice of one sheet. `None` when no data row carries the
/// subject's key.
fn reshape_sheet(
    sheet: &Sheet,
    subject_id: &str,
    fields: &[String],
    mode: RepeatMode,
) -> Option<SheetRecord> {
    let field_index = sheet.field_index();
    let mut record = SheetRecord::new(sheet.name.clone());
    let mut matched = false;

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        if sheet.key_cell(row_idx) != Some(subject_id) {
            continue;
        }
        matched = true;
        for (col, field) in &field_index {
            if !fields.iter().any(|selected| selected == field) {
                continue;
            }
            let Some(value) = row.get(*col).and_then(|cell| cell.as_deref()) else {
                continue;
            };
            trace!(sheet = %sheet.name, field, row = row_idx, "captured cell");
            match mode {
                RepeatMode::Columns => record.set_single(field, value),
                RepeatMode::Rows => record.push_value(field, value),
            }
        }
    }
    matched.then_some(record)
}

fn dedup_preserving_order(values: &mut Vec<String>) {
    let mut seen = Vec::with_capacity(values.len());
    values.retain(|value| {
        if seen.iter().any(|existing: &String| existing == value) {
            false
        } else {
            seen.push(value.clone());
            true
        }
    });
}
