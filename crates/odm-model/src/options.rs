//! Conversion options.

/// How a field repeats in the source spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatMode {
    /// A field repeats as multiple columns within one data row per subject.
    Columns,
    /// A field repeats as multiple data rows sharing the subject key.
    Rows,
}

/// Which document level repeats in row mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatUnit {
    Form,
    Event,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub mode: RepeatMode,
    /// Only consulted when `mode` is [`RepeatMode::Rows`].
    pub repeat_unit: RepeatUnit,
    /// Merge registered default values for unselected variables.
    pub include_defaults: bool,
    pub study_oid: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            mode: RepeatMode::Columns,
            repeat_unit: RepeatUnit::Form,
            include_defaults: false,
            study_oid: "Project.Study".to_string(),
        }
    }
}
