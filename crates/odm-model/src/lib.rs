pub mod catalog;
pub mod document;
pub mod options;
pub mod record;
pub mod redact;
pub mod selection;
pub mod workbook;

pub use catalog::{DataDictionary, EventForms, FormVariables, InstrumentCatalog};
pub use document::{
    ClinicalDocument, FormData, ItemData, ItemGroupData, StudyEventData, SubjectData,
};
pub use options::{ConvertOptions, RepeatMode, RepeatUnit};
pub use record::{FieldRecord, FieldValues, PatientRecord, SheetRecord};
pub use redact::{REDACTED_VALUE, log_data_enabled, redact_value, set_log_data_enabled};
pub use selection::{
    ChosenSelection, FieldBinding, Selection, SelectionMapping, SheetBindings, SheetFields,
};
pub use workbook::{Sheet, Workbook};
