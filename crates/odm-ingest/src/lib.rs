pub mod csv_table;
pub mod data_dictionary;
pub mod error;
pub mod instrument;
pub mod workbook;

pub use csv_table::{CsvTable, read_csv_table};
pub use data_dictionary::{load_data_dictionary, parse_data_dictionary};
pub use error::{IngestError, Result};
pub use instrument::{load_instrument_catalog, parse_instrument_catalog};
pub use workbook::{load_sheet, load_workbook};
