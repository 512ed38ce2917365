//! Finalized user-selection state shared between the tracker, the
//! reshaper, and the document builder.

use std::collections::BTreeMap;

use crate::catalog::FormVariables;

/// Checked fields of one sheet, in tree order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SheetFields {
    pub sheet: String,
    pub fields: Vec<String>,
}

/// One field bound to a clinical variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    pub field: String,
    pub variable: String,
}

/// Bindings of one sheet, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetBindings {
    pub sheet: String,
    pub bindings: Vec<FieldBinding>,
}

/// The sheet → field → variable mapping, in sheet/field traversal order.
///
/// Traversal order is load-bearing: column-mode value lookup returns the
/// first unconsumed field matching a variable in exactly this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionMapping {
    pub sheets: Vec<SheetBindings>,
}

impl SelectionMapping {
    pub fn bind(&mut self, sheet: &str, field: &str, variable: &str) {
        let idx = match self.sheets.iter().position(|entry| entry.sheet == sheet) {
            Some(idx) => idx,
            None => {
                self.sheets.push(SheetBindings {
                    sheet: sheet.to_string(),
                    bindings: Vec::new(),
                });
                self.sheets.len() - 1
            }
        };
        self.sheets[idx].bindings.push(FieldBinding {
            field: field.to_string(),
            variable: variable.to_string(),
        });
    }

    /// All (sheet, field, variable) triples in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.sheets.iter().flat_map(|sheet| {
            sheet.bindings.iter().map(move |binding| {
                (
                    sheet.sheet.as_str(),
                    binding.field.as_str(),
                    binding.variable.as_str(),
                )
            })
        })
    }
}

/// Unique chosen events, forms, and variables plus the derived per-form
/// maps, all in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChosenSelection {
    pub events: Vec<String>,
    pub forms: Vec<String>,
    pub variables: Vec<String>,
    /// Per form, the chosen variables only.
    pub form_variables: Vec<FormVariables>,
    /// How many field slots resolved to each form. Informational: the
    /// column-mode builder uses it as the instance count.
    pub form_occurrence: BTreeMap<String, usize>,
}

impl ChosenSelection {
    pub fn variables_for(&self, form: &str) -> &[String] {
        self.form_variables
            .iter()
            .find(|entry| entry.form == form)
            .map_or(&[], |entry| entry.variables.as_slice())
    }

    /// Occurrence count for a form; a form with no recorded count gets 1.
    pub fn occurrence(&self, form: &str) -> usize {
        self.form_occurrence.get(form).copied().unwrap_or(1)
    }
}

/// Everything the downstream pipeline needs from the selection stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub mapping: SelectionMapping,
    pub chosen: ChosenSelection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_iterates_in_traversal_order() {
        let mut mapping = SelectionMapping::default();
        mapping.bind("demo", "age", "dm_age");
        mapping.bind("labs", "glucose", "lb_gluc");
        mapping.bind("demo", "sex", "dm_sex");
        let triples: Vec<_> = mapping.iter().collect();
        assert_eq!(
            triples,
            vec![
                ("demo", "age", "dm_age"),
                ("demo", "sex", "dm_sex"),
                ("labs", "glucose", "lb_gluc"),
            ]
        );
    }

    #[test]
    fn occurrence_defaults_to_one() {
        let chosen = ChosenSelection::default();
        assert_eq!(chosen.occurrence("anything"), 1);
    }
}
