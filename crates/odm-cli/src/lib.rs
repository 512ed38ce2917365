//! CLI library components for the spreadsheet-to-ODM converter.

pub mod inspect;
pub mod logging;
pub mod pipeline;
