//! Workbook loading from per-sheet CSV files.
//!
//! Sheet order follows the caller-supplied path order; the first path
//! must be the subject sheet. The sheet name is the file stem.

use std::path::{Path, PathBuf};

use tracing::debug;

use odm_model::{Sheet, Workbook};

use crate::csv_table::read_csv_table;
use crate::error::{IngestError, Result};

pub fn load_workbook(paths: &[PathBuf]) -> Result<Workbook> {
    let mut sheets = Vec::with_capacity(paths.len());
    for path in paths {
        sheets.push(load_sheet(path)?);
    }
    Ok(Workbook::new(sheets))
}

pub fn load_sheet(path: &Path) -> Result<Sheet> {
    let name = sheet_name(path)?;
    let table = read_csv_table(path)?;
    let headers: Vec<Option<String>> = table
        .headers
        .into_iter()
        .map(|header| (!header.is_empty()).then_some(header))
        .collect();
    let rows: Vec<Vec<Option<String>>> = table
        .rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| (!cell.is_empty()).then_some(cell))
                .collect()
        })
        .collect();
    debug!(sheet = %name, rows = rows.len(), "loaded sheet");
    Ok(Sheet {
        name,
        headers,
        rows,
    })
}

fn sheet_name(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| IngestError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "sheet path has no file name",
            ),
        })
}
