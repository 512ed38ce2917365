//! CLI argument definitions for the spreadsheet-to-ODM converter.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "odm-export",
    version,
    about = "Convert tabular clinical spreadsheets to CDISC ODM XML",
    long_about = "Convert tabular clinical spreadsheet exports to CDISC ODM XML.\n\n\
                  Sheets, the instrument designation table, and the data dictionary\n\
                  are read as CSV; field-to-variable choices come from a selection\n\
                  plan JSON file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow subject-level values in trace logs.
    ///
    /// Off by default: cell values are PHI and trace logs redact them.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert spreadsheet data to an ODM XML document.
    Convert(ConvertArgs),

    /// Show the events, forms, and variables a metadata pair defines,
    /// and optionally the fields of sheet files.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Sheet CSV file; repeat in workbook order. Column 0 of the first
    /// sheet holds the subject identifiers.
    #[arg(long = "sheet", value_name = "CSV", required = true)]
    pub sheets: Vec<PathBuf>,

    /// Instrument designation CSV (unique_event_name, form).
    #[arg(long = "instrument", value_name = "CSV")]
    pub instrument: PathBuf,

    /// Data dictionary CSV defining forms, variables, and defaults.
    #[arg(long = "dictionary", value_name = "CSV")]
    pub dictionary: PathBuf,

    /// Selection plan JSON binding sheets and fields to events, forms,
    /// and variables.
    #[arg(long = "plan", value_name = "JSON")]
    pub plan: PathBuf,

    /// Output path for the ODM XML document.
    #[arg(long = "output", value_name = "XML")]
    pub output: PathBuf,

    /// How repeated measurements appear in the sheets.
    #[arg(long = "repeat", value_enum, default_value = "columns")]
    pub repeat: RepeatModeArg,

    /// Which element repeats when measurements span rows.
    #[arg(long = "repeat-unit", value_enum, default_value = "form")]
    pub repeat_unit: RepeatUnitArg,

    /// Fill unselected variables from their dictionary default values.
    #[arg(long = "defaults")]
    pub defaults: bool,

    /// Study OID carried on the ClinicalData element.
    #[arg(long = "study-oid", value_name = "OID", default_value = "Project.Study")]
    pub study_oid: String,

    /// Write a selection progress snapshot JSON next to the conversion.
    #[arg(long = "save-progress", value_name = "JSON")]
    pub save_progress: Option<PathBuf>,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Instrument designation CSV (unique_event_name, form).
    #[arg(long = "instrument", value_name = "CSV")]
    pub instrument: PathBuf,

    /// Data dictionary CSV defining forms, variables, and defaults.
    #[arg(long = "dictionary", value_name = "CSV")]
    pub dictionary: PathBuf,

    /// Sheet CSV file to list fields for; repeatable.
    #[arg(long = "sheet", value_name = "CSV")]
    pub sheets: Vec<PathBuf>,
}

/// Repetition layout of the source sheets.
#[derive(Clone, Copy, ValueEnum)]
pub enum RepeatModeArg {
    /// Repeats live in extra columns of one row per subject.
    Columns,
    /// Repeats live in extra rows sharing the subject key.
    Rows,
}

/// Repeating element for row-layout sheets.
#[derive(Clone, Copy, ValueEnum)]
pub enum RepeatUnitArg {
    Form,
    Event,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
