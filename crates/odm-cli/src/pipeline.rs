//! Conversion pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Metadata**: Parse the instrument designation and data dictionary
//! 2. **Workbook**: Load the sheet CSVs in workbook order
//! 3. **Selection**: Replay the selection plan into a tracker
//! 4. **Reshape**: Pivot sheet rows into per-subject records
//! 5. **Build**: Assemble the nested clinical-data document
//! 6. **Write**: Serialize the document as ODM XML

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span, trace};

use odm_ingest::{load_data_dictionary, load_instrument_catalog, load_workbook};
use odm_map::{ProgressSnapshot, SourcePaths, apply_plan, load_plan};
use odm_model::ConvertOptions;
use odm_report::{DocumentBuilder, write_odm_xml};
use odm_transform::reshape;

use crate::logging::redact_value;

/// Everything the convert command needs, resolved from CLI flags.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    /// Sheet CSV paths in workbook order; the first holds subject ids.
    pub sheets: Vec<PathBuf>,
    pub instrument: PathBuf,
    pub dictionary: PathBuf,
    pub plan: PathBuf,
    pub output: PathBuf,
    pub options: ConvertOptions,
    /// When set, a progress snapshot is written after the selection stage.
    pub save_progress: Option<PathBuf>,
}

/// Counts reported after a successful conversion.
#[derive(Debug, Clone)]
pub struct ConvertSummary {
    pub subjects: usize,
    pub events: usize,
    pub forms: usize,
    pub variables: usize,
    pub output: PathBuf,
}

/// Run the full conversion pipeline.
pub fn run_convert(request: &ConvertRequest) -> Result<ConvertSummary> {
    let start = Instant::now();

    let metadata_span = info_span!("metadata");
    let (catalog, dictionary) = metadata_span.in_scope(|| -> Result<_> {
        let catalog = load_instrument_catalog(&request.instrument)
            .context("load instrument designation")?;
        let dictionary =
            load_data_dictionary(&request.dictionary).context("load data dictionary")?;
        info!(
            events = catalog.events.len(),
            forms = dictionary.forms.len(),
            defaults = dictionary.defaults.len(),
            "metadata loaded"
        );
        Ok((catalog, dictionary))
    })?;

    let workbook_span = info_span!("workbook");
    let workbook = workbook_span.in_scope(|| {
        let workbook = load_workbook(&request.sheets).context("load workbook sheets")?;
        info!(sheets = workbook.sheets.len(), "workbook loaded");
        Ok::<_, anyhow::Error>(workbook)
    })?;

    let selection_span = info_span!("selection");
    let (selected, selection) = selection_span.in_scope(|| -> Result<_> {
        let plan = load_plan(&request.plan)?;
        let tracker = apply_plan(&workbook, &plan);
        if let Some(path) = &request.save_progress {
            let sources = SourcePaths {
                sheets: request.sheets.clone(),
                instrument: request.instrument.clone(),
                dictionary: request.dictionary.clone(),
            };
            ProgressSnapshot::capture(sources, &tracker).save(path)?;
            info!(path = %path.display(), "saved progress snapshot");
        }
        Ok((tracker.selected_sheets(), tracker.finalize()))
    })?;
    info!(
        events = selection.chosen.events.len(),
        forms = selection.chosen.forms.len(),
        variables = selection.chosen.variables.len(),
        "selection finalized"
    );

    let reshape_span = info_span!("reshape");
    let records = reshape_span.in_scope(|| {
        let records = reshape(&workbook, &selected, request.options.mode);
        for record in &records {
            trace!(subject = redact_value(&record.subject_id), "subject record");
        }
        records
    });
    info!(subjects = records.len(), "reshaped records");

    let build_span = info_span!("build");
    let document = build_span.in_scope(|| {
        DocumentBuilder::new(&catalog, &dictionary, &selection, &request.options).build(&records)
    });

    let write_span = info_span!("write");
    write_span.in_scope(|| write_odm_xml(&request.output, &document))?;

    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "conversion finished"
    );
    Ok(ConvertSummary {
        subjects: document.subjects.len(),
        events: selection.chosen.events.len(),
        forms: selection.chosen.forms.len(),
        variables: selection.chosen.variables.len(),
        output: request.output.clone(),
    })
}
