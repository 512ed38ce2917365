//! The nested clinical-data document emitted by the builder.
//!
//! Mirrors the ODM `ClinicalData` hierarchy: subject → study event →
//! form → item group → item. Repeat keys are 1-based instance numbers.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemData {
    /// Variable name; becomes the `ItemOID` attribute.
    pub oid: String,
    /// Resolved value; empty string when the source cell was null and the
    /// mode still emits the item.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemGroupData {
    /// `<form>.<first-emitted-variable>`.
    pub oid: String,
    pub repeat_key: u32,
    pub items: Vec<ItemData>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormData {
    pub form: String,
    pub repeat_key: u32,
    pub groups: Vec<ItemGroupData>,
}

impl FormData {
    pub fn new(form: impl Into<String>, repeat_key: u32) -> Self {
        Self {
            form: form.into(),
            repeat_key,
            groups: Vec::new(),
        }
    }

    /// Append an item, opening the form's item group on the first call.
    /// The group OID is keyed by the first emitted variable.
    pub fn push_item(&mut self, variable: &str, value: &str) {
        if self.groups.is_empty() {
            self.groups.push(ItemGroupData {
                oid: format!("{}.{}", self.form, variable),
                repeat_key: 1,
                items: Vec::new(),
            });
        }
        if let Some(group) = self.groups.last_mut() {
            group.items.push(ItemData {
                oid: variable.to_string(),
                value: value.to_string(),
            });
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemData> {
        self.groups.iter().flat_map(|group| group.items.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyEventData {
    pub event: String,
    pub repeat_key: u32,
    pub forms: Vec<FormData>,
}

impl StudyEventData {
    pub fn new(event: impl Into<String>, repeat_key: u32) -> Self {
        Self {
            event: event.into(),
            repeat_key,
            forms: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectData {
    pub subject_key: String,
    pub events: Vec<StudyEventData>,
}

impl SubjectData {
    pub fn new(subject_key: impl Into<String>) -> Self {
        Self {
            subject_key: subject_key.into(),
            events: Vec::new(),
        }
    }
}

/// Root of the emitted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClinicalDocument {
    pub study_oid: String,
    pub subjects: Vec<SubjectData>,
}

impl ClinicalDocument {
    pub fn new(study_oid: impl Into<String>) -> Self {
        Self {
            study_oid: study_oid.into(),
            subjects: Vec::new(),
        }
    }
}
