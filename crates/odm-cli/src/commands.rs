//! Command entry points, dispatched from `main`.

use anyhow::Result;

use odm_cli::inspect::build_inspect_report;
use odm_cli::pipeline::{self, ConvertRequest, ConvertSummary};
use odm_model::{ConvertOptions, RepeatMode, RepeatUnit};

use crate::cli::{ConvertArgs, InspectArgs, RepeatModeArg, RepeatUnitArg};

pub fn run_convert(args: &ConvertArgs) -> Result<ConvertSummary> {
    let options = ConvertOptions {
        mode: match args.repeat {
            RepeatModeArg::Columns => RepeatMode::Columns,
            RepeatModeArg::Rows => RepeatMode::Rows,
        },
        repeat_unit: match args.repeat_unit {
            RepeatUnitArg::Form => RepeatUnit::Form,
            RepeatUnitArg::Event => RepeatUnit::Event,
        },
        include_defaults: args.defaults,
        study_oid: args.study_oid.clone(),
    };
    let request = ConvertRequest {
        sheets: args.sheets.clone(),
        instrument: args.instrument.clone(),
        dictionary: args.dictionary.clone(),
        plan: args.plan.clone(),
        output: args.output.clone(),
        options,
        save_progress: args.save_progress.clone(),
    };
    pipeline::run_convert(&request)
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let report = build_inspect_report(&args.instrument, &args.dictionary, &args.sheets)?;
    println!("{}", report.events);
    println!("{}", report.forms);
    if let Some(sheets) = report.sheets {
        println!("{sheets}");
    }
    Ok(())
}
