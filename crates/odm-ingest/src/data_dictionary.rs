//! Data Dictionary parsing.
//!
//! The Data Dictionary relates forms to variables and records default
//! values. Checkbox fields expand into one synthetic variable per
//! choice; dropdown fields may carry a `@DEFAULT='value'` annotation.

use std::path::Path;

use tracing::debug;

use odm_model::DataDictionary;

use crate::csv_table::{CsvTable, read_csv_table};
use crate::error::Result;

const TABLE: &str = "data dictionary";
const COL_FORM: &str = "Form Name";
const COL_VARIABLE: &str = "Variable / Field Name";
const COL_TYPE: &str = "Field Type";
const COL_CHOICES: &str = "Choices, Calculations, OR Slider Labels";
const COL_ANNOTATION: &str = "Field Annotation";

pub fn load_data_dictionary(path: &Path) -> Result<DataDictionary> {
    let table = read_csv_table(path)?;
    parse_data_dictionary(&table)
}

pub fn parse_data_dictionary(table: &CsvTable) -> Result<DataDictionary> {
    let form_idx = table.require_column(TABLE, COL_FORM)?;
    let variable_idx = table.require_column(TABLE, COL_VARIABLE)?;
    let type_idx = table.require_column(TABLE, COL_TYPE)?;
    let choices_idx = table.require_column(TABLE, COL_CHOICES)?;
    let annotation_idx = table.require_column(TABLE, COL_ANNOTATION)?;

    let mut dictionary = DataDictionary::default();
    for row in &table.rows {
        let form = row[form_idx].as_str();
        let variable = row[variable_idx].as_str();
        if form.is_empty() || variable.is_empty() {
            continue;
        }
        match row[type_idx].as_str() {
            "checkbox" => {
                for expanded in expand_checkbox(variable, &row[choices_idx]) {
                    dictionary.insert(form, &expanded);
                }
            }
            "dropdown" => {
                if let Some(default) = parse_default(&row[annotation_idx]) {
                    debug!(variable, default, "registered dropdown default");
                    dictionary
                        .defaults
                        .insert(variable.to_string(), default);
                }
                dictionary.insert(form, variable);
            }
            _ => dictionary.insert(form, variable),
        }
    }
    Ok(dictionary)
}

/// One synthetic variable per choice: `name___1` through `name___N`
/// where N is the pipe count plus one.
fn expand_checkbox(variable: &str, choices: &str) -> Vec<String> {
    let count = choices.matches('|').count() + 1;
    (1..=count)
        .map(|idx| format!("{variable}___{idx}"))
        .collect()
}

/// Extract the value of a `@DEFAULT='value'` annotation token.
fn parse_default(annotation: &str) -> Option<String> {
    annotation
        .split_whitespace()
        .find(|token| token.starts_with("@DEFAULT"))
        .and_then(|token| token.split('\'').nth(1))
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkbox_expands_to_pipe_count_plus_one() {
        assert_eq!(
            expand_checkbox("smoker", "0, No | 1, Yes | 2, Unknown"),
            ["smoker___1", "smoker___2", "smoker___3"]
        );
        assert_eq!(expand_checkbox("flag", "1, Yes"), ["flag___1"]);
    }

    #[test]
    fn default_annotation_parses_quoted_value() {
        assert_eq!(parse_default("@DEFAULT='2'"), Some("2".to_string()));
        assert_eq!(
            parse_default("@HIDDEN @DEFAULT='ab c'"),
            Some("ab".to_string())
        );
        assert_eq!(parse_default("@HIDDEN"), None);
        assert_eq!(parse_default(""), None);
    }
}
