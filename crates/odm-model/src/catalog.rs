//! Relational metadata: which forms belong to which event, which
//! variables belong to which form, and per-variable default values.

use std::collections::BTreeMap;

/// One event and its forms, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventForms {
    pub event: String,
    pub forms: Vec<String>,
}

/// Event-to-form relation parsed from the Instrument Designation table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstrumentCatalog {
    pub events: Vec<EventForms>,
}

impl InstrumentCatalog {
    /// Record an event/form pair, preserving first-seen order and
    /// skipping duplicates per event.
    pub fn insert(&mut self, event: &str, form: &str) {
        let idx = match self.events.iter().position(|entry| entry.event == event) {
            Some(idx) => idx,
            None => {
                self.events.push(EventForms {
                    event: event.to_string(),
                    forms: Vec::new(),
                });
                self.events.len() - 1
            }
        };
        let entry = &mut self.events[idx];
        if !entry.forms.iter().any(|existing| existing == form) {
            entry.forms.push(form.to_string());
        }
    }

    pub fn forms_for(&self, event: &str) -> &[String] {
        self.events
            .iter()
            .find(|entry| entry.event == event)
            .map_or(&[], |entry| entry.forms.as_slice())
    }

    pub fn event_names(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(|entry| entry.event.as_str())
    }
}

/// One form and its variables, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormVariables {
    pub form: String,
    pub variables: Vec<String>,
}

/// Form-to-variable relation and variable defaults parsed from the Data
/// Dictionary table. Checkbox fields are already expanded into their
/// `name___1..N` synthetic variables here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataDictionary {
    pub forms: Vec<FormVariables>,
    pub defaults: BTreeMap<String, String>,
}

impl DataDictionary {
    /// Record a form/variable pair, preserving first-seen order and
    /// skipping duplicates per form.
    pub fn insert(&mut self, form: &str, variable: &str) {
        let idx = match self.forms.iter().position(|entry| entry.form == form) {
            Some(idx) => idx,
            None => {
                self.forms.push(FormVariables {
                    form: form.to_string(),
                    variables: Vec::new(),
                });
                self.forms.len() - 1
            }
        };
        let entry = &mut self.forms[idx];
        if !entry.variables.iter().any(|existing| existing == variable) {
            entry.variables.push(variable.to_string());
        }
    }

    pub fn variables_for(&self, form: &str) -> &[String] {
        self.forms
            .iter()
            .find(|entry| entry.form == form)
            .map_or(&[], |entry| entry.variables.as_slice())
    }

    pub fn default_for(&self, variable: &str) -> Option<&str> {
        self.defaults.get(variable).map(String::as_str)
    }

    pub fn form_names(&self) -> impl Iterator<Item = &str> {
        self.forms.iter().map(|entry| entry.form.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instrument_catalog_dedupes_per_event() {
        let mut catalog = InstrumentCatalog::default();
        catalog.insert("visit_1", "demographics");
        catalog.insert("visit_1", "labs");
        catalog.insert("visit_1", "demographics");
        catalog.insert("visit_2", "demographics");
        assert_eq!(catalog.forms_for("visit_1"), ["demographics", "labs"]);
        assert_eq!(catalog.forms_for("visit_2"), ["demographics"]);
        assert_eq!(catalog.event_names().collect::<Vec<_>>(), ["visit_1", "visit_2"]);
    }

    #[test]
    fn dictionary_preserves_first_seen_order() {
        let mut dictionary = DataDictionary::default();
        dictionary.insert("labs", "glucose");
        dictionary.insert("labs", "sodium");
        dictionary.insert("labs", "glucose");
        assert_eq!(dictionary.variables_for("labs"), ["glucose", "sodium"]);
        assert!(dictionary.variables_for("missing").is_empty());
    }
}
