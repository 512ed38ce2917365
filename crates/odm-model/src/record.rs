//! Per-subject reshaped spreadsheet data.

/// Values captured for one field of one subject.
///
/// Column repetition keeps a single value (last matching row wins); row
/// repetition keeps an ordered list, one entry per matching row with a
/// non-null cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValues {
    Single(String),
    Repeating(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRecord {
    pub field: String,
    pub values: FieldValues,
}

/// Data captured for one subject in one sheet, fields in capture order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRecord {
    pub sheet: String,
    pub fields: Vec<FieldRecord>,
}

impl SheetRecord {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            fields: Vec::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValues> {
        self.fields
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| &entry.values)
    }

    /// Set a single value, overwriting any earlier one for this field.
    pub fn set_single(&mut self, field: &str, value: &str) {
        match self.fields.iter_mut().find(|entry| entry.field == field) {
            Some(entry) => entry.values = FieldValues::Single(value.to_string()),
            None => self.fields.push(FieldRecord {
                field: field.to_string(),
                values: FieldValues::Single(value.to_string()),
            }),
        }
    }

    /// Append a value to the field's ordered list.
    pub fn push_value(&mut self, field: &str, value: &str) {
        match self.fields.iter_mut().find(|entry| entry.field == field) {
            Some(entry) => match &mut entry.values {
                FieldValues::Repeating(values) => values.push(value.to_string()),
                FieldValues::Single(existing) => {
                    entry.values =
                        FieldValues::Repeating(vec![existing.clone(), value.to_string()]);
                }
            },
            None => self.fields.push(FieldRecord {
                field: field.to_string(),
                values: FieldValues::Repeating(vec![value.to_string()]),
            }),
        }
    }
}

/// All reshaped data for one subject, sheets in workbook order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRecord {
    pub subject_id: String,
    pub sheets: Vec<SheetRecord>,
}

impl PatientRecord {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            sheets: Vec::new(),
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetRecord> {
        self.sheets.iter().find(|entry| entry.sheet == name)
    }

    pub fn push_sheet(&mut self, sheet: SheetRecord) {
        match self.sheets.iter_mut().find(|entry| entry.sheet == sheet.sheet) {
            Some(existing) => *existing = sheet,
            None => self.sheets.push(sheet),
        }
    }
}
