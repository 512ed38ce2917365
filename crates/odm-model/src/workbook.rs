//! In-memory representation of a multi-sheet tabular source.
//!
//! A [`Workbook`] is an ordered list of [`Sheet`]s. Sheet order is
//! significant: the first sheet carries the subject identifiers in its
//! key column, and value lookups walk sheets in workbook order.

/// A single sheet: a header row plus data rows.
///
/// Cells are `Option<String>`; an absent or empty cell is `None`. Header
/// positions with no name produce no field and are skipped by
/// [`Sheet::field_index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<Option<String>>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            headers: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Named fields of this sheet, in column order.
    pub fn fields(&self) -> Vec<&str> {
        self.headers
            .iter()
            .filter_map(|header| header.as_deref())
            .collect()
    }

    /// Column index to field name, skipping unnamed columns.
    pub fn field_index(&self) -> Vec<(usize, &str)> {
        self.headers
            .iter()
            .enumerate()
            .filter_map(|(idx, header)| header.as_deref().map(|name| (idx, name)))
            .collect()
    }

    /// The key cell (column 0) of a data row.
    pub fn key_cell(&self, row: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.first())
            .and_then(|cell| cell.as_deref())
    }
}

/// An ordered collection of sheets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// The subject sheet. Column 0 of its data rows holds subject ids.
    pub fn subject_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }
}
