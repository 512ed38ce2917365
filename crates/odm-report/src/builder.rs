//! Document assembly: walks the selection mapping over per-subject
//! records and emits the nested subject → event → form → item tree.
//!
//! Three emission branches exist and must stay distinct: column mode
//! (instance count from the tracker's occurrence map), row mode with the
//! form as the repeat unit, and row mode with the event as the repeat
//! unit. Their null handling differs: column mode emits an item with an
//! empty value, the row modes omit the item.

use std::collections::BTreeSet;

use tracing::debug;

use odm_model::{
    ClinicalDocument, ConvertOptions, DataDictionary, FieldValues, FormData, InstrumentCatalog,
    PatientRecord, RepeatMode, RepeatUnit, Selection, StudyEventData, SubjectData, redact_value,
};

/// Literal newline marker some spreadsheet exports leave behind; treated
/// as an absent value in event-repetition row mode.
pub const NEWLINE_MARKER: &str = "&#10;";

pub struct DocumentBuilder<'a> {
    catalog: &'a InstrumentCatalog,
    dictionary: &'a DataDictionary,
    selection: &'a Selection,
    options: &'a ConvertOptions,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(
        catalog: &'a InstrumentCatalog,
        dictionary: &'a DataDictionary,
        selection: &'a Selection,
        options: &'a ConvertOptions,
    ) -> Self {
        Self {
            catalog,
            dictionary,
            selection,
            options,
        }
    }

    /// Emit the document. Subjects keep discovery order; events, forms,
    /// and variables keep chosen (first-seen) order.
    pub fn build(&self, records: &[PatientRecord]) -> ClinicalDocument {
        let mut document = ClinicalDocument::new(self.options.study_oid.clone());
        for record in records {
            debug!(subject = redact_value(&record.subject_id), "building subject");
            let subject = match (self.options.mode, self.options.repeat_unit) {
                (RepeatMode::Columns, _) => self.build_columns(record),
                (RepeatMode::Rows, RepeatUnit::Form) => self.build_rows_by_form(record),
                (RepeatMode::Rows, RepeatUnit::Event) => self.build_rows_by_event(record),
            };
            document.subjects.push(subject);
        }
        document
    }

    fn build_columns(&self, record: &PatientRecord) -> SubjectData {
        let mut subject = SubjectData::new(record.subject_id.clone());
        for event in &self.selection.chosen.events {
            let mut event_data = StudyEventData::new(event.clone(), 1);
            for form in &self.selection.chosen.forms {
                if !self.form_in_event(event, form) {
                    continue;
                }
                let chosen_variables = self.selection.chosen.variables_for(form);
                // Consumed fields persist across instances of the form so
                // instance N+1 resolves the next field bound to the same
                // variable rather than re-reading the first.
                let mut visited: BTreeSet<String> = BTreeSet::new();
                for instance in 0..self.selection.chosen.occurrence(form) {
                    let mut form_data = FormData::new(form.clone(), (instance + 1) as u32);
                    for variable in chosen_variables {
                        match self.find_column_value(variable, &visited, record) {
                            Some((field, value)) => {
                                visited.insert(field);
                                form_data.push_item(variable, value.as_deref().unwrap_or(""));
                            }
                            None => form_data.push_item(variable, ""),
                        }
                    }
                    if self.options.include_defaults {
                        self.append_defaults(form, chosen_variables, &mut form_data);
                    }
                    event_data.forms.push(form_data);
                }
            }
            subject.events.push(event_data);
        }
        subject
    }

    fn build_rows_by_form(&self, record: &PatientRecord) -> SubjectData {
        let mut subject = SubjectData::new(record.subject_id.clone());
        for event in &self.selection.chosen.events {
            let mut event_data = StudyEventData::new(event.clone(), 1);
            for form in &self.selection.chosen.forms {
                if !self.form_in_event(event, form) {
                    continue;
                }
                let chosen_variables = self.selection.chosen.variables_for(form);
                let instances = self.count_repeats(chosen_variables, record);
                for instance in 0..instances {
                    let mut form_data = FormData::new(form.clone(), (instance + 1) as u32);
                    for variable in chosen_variables {
                        if let Some(value) =
                            self.find_row_values(variable, record).get(instance)
                        {
                            form_data.push_item(variable, value);
                        }
                    }
                    if self.options.include_defaults {
                        self.append_defaults(form, chosen_variables, &mut form_data);
                    }
                    event_data.forms.push(form_data);
                }
            }
            subject.events.push(event_data);
        }
        subject
    }

    fn build_rows_by_event(&self, record: &PatientRecord) -> SubjectData {
        let mut subject = SubjectData::new(record.subject_id.clone());
        for event in &self.selection.chosen.events {
            // Event instances are created on demand and shared across
            // forms with the same repeat index.
            let mut event_instances: Vec<StudyEventData> = Vec::new();
            for form in &self.selection.chosen.forms {
                if !self.form_in_event(event, form) {
                    continue;
                }
                let chosen_variables = self.selection.chosen.variables_for(form);
                let instances = self.count_repeats(chosen_variables, record);
                for instance in 0..instances {
                    if event_instances.len() <= instance {
                        event_instances
                            .push(StudyEventData::new(event.clone(), (instance + 1) as u32));
                    }
                    let mut form_data = FormData::new(form.clone(), 1);
                    for variable in chosen_variables {
                        if let Some(value) =
                            self.find_row_values(variable, record).get(instance)
                        {
                            if value != NEWLINE_MARKER {
                                form_data.push_item(variable, value);
                            }
                        }
                    }
                    if self.options.include_defaults {
                        self.append_defaults(form, chosen_variables, &mut form_data);
                    }
                    event_instances[instance].forms.push(form_data);
                }
            }
            subject.events.extend(event_instances);
        }
        subject
    }

    fn form_in_event(&self, event: &str, form: &str) -> bool {
        self.catalog
            .forms_for(event)
            .iter()
            .any(|candidate| candidate == form)
    }

    /// Form-data instances needed for one form: the longest value list
    /// over its chosen variables.
    fn count_repeats(&self, variables: &[String], record: &PatientRecord) -> usize {
        variables
            .iter()
            .map(|variable| self.find_row_values(variable, record).len())
            .max()
            .unwrap_or(0)
    }

    /// Column-mode lookup: the first unconsumed field bound to the
    /// variable, in mapping traversal order, whose sheet appears in the
    /// subject's record. The value may still be absent; column mode
    /// emits it as an empty string either way.
    fn find_column_value(
        &self,
        variable: &str,
        visited: &BTreeSet<String>,
        record: &PatientRecord,
    ) -> Option<(String, Option<String>)> {
        for (sheet, field, bound) in self.selection.mapping.iter() {
            if bound != variable || visited.contains(field) {
                continue;
            }
            let Some(sheet_record) = record.sheet(sheet) else {
                continue;
            };
            let value = match sheet_record.get(field) {
                Some(FieldValues::Single(value)) => Some(value.clone()),
                Some(FieldValues::Repeating(values)) => values.first().cloned(),
                None => None,
            };
            return Some((field.to_string(), value));
        }
        None
    }

    /// Row-mode lookup: the value list of the first field bound to the
    /// variable whose sheet appears in the subject's record.
    fn find_row_values(&self, variable: &str, record: &PatientRecord) -> Vec<String> {
        for (sheet, field, bound) in self.selection.mapping.iter() {
            if bound != variable {
                continue;
            }
            let Some(sheet_record) = record.sheet(sheet) else {
                continue;
            };
            return match sheet_record.get(field) {
                Some(FieldValues::Repeating(values)) => values.clone(),
                Some(FieldValues::Single(value)) => vec![value.clone()],
                None => Vec::new(),
            };
        }
        Vec::new()
    }

    /// Merge defaults for the form's unselected variables. Works on a
    /// copy of the dictionary's variable list; that list is shared
    /// across subjects and instances.
    fn append_defaults(&self, form: &str, chosen: &[String], form_data: &mut FormData) {
        let mut unchosen = self.dictionary.variables_for(form).to_vec();
        unchosen.retain(|variable| !chosen.iter().any(|existing| existing == variable));
        for variable in unchosen {
            if let Some(default) = self.dictionary.default_for(&variable) {
                form_data.push_item(&variable, default);
            }
        }
    }
}
