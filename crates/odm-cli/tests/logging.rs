use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

use odm_cli::logging::{LogConfig, LogFormat, init_logging_with_writer};
use odm_cli::pipeline::{ConvertRequest, run_convert};
use odm_model::ConvertOptions;

#[derive(Clone, Default)]
struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CaptureWriter {
    fn contents(&self) -> String {
        let buffer = self.buffer.lock().expect("buffer lock");
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

struct CaptureGuard {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for CaptureGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| io::Error::other("buffer lock poisoned"))?;
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureGuard;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureGuard {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

fn write_fixtures(dir: &Path) {
    fs::write(
        dir.join("instrument.csv"),
        "unique_event_name,form\nvisit_1,demographics\n",
    )
    .expect("write instrument");
    fs::write(
        dir.join("dictionary.csv"),
        "Variable / Field Name,Form Name,Field Type,\
         \"Choices, Calculations, OR Slider Labels\",Field Annotation\n\
         dm_age,demographics,text,,\n",
    )
    .expect("write dictionary");
    fs::write(dir.join("demo.csv"), "subject_id,age\nP-001,34\n").expect("write demo sheet");
    fs::write(
        dir.join("plan.json"),
        r#"{
  "sheets": [
    {
      "sheet": "demo",
      "event": "visit_1",
      "form": "demographics",
      "fields": [{ "field": "age", "variable": "dm_age" }]
    }
  ]
}"#,
    )
    .expect("write plan");
}

#[test]
fn debug_logs_redact_subject_ids_by_default() {
    let dir = TempDir::new().expect("temp dir");
    write_fixtures(dir.path());

    let writer = CaptureWriter::default();
    let config = LogConfig {
        level_filter: LevelFilter::TRACE,
        use_env_filter: false,
        with_ansi: false,
        format: LogFormat::Compact,
        ..LogConfig::default()
    };
    init_logging_with_writer(&config, writer.clone());

    let request = ConvertRequest {
        sheets: vec![dir.path().join("demo.csv")],
        instrument: dir.path().join("instrument.csv"),
        dictionary: dir.path().join("dictionary.csv"),
        plan: dir.path().join("plan.json"),
        output: dir.path().join("export.xml"),
        options: ConvertOptions::default(),
        save_progress: None,
    };
    run_convert(&request).expect("conversion succeeds");

    let logs = writer.contents();
    assert!(logs.contains("[REDACTED]"), "expected redacted subject events in:\n{logs}");
    // The subject id must never reach the logs without --log-data.
    assert!(!logs.contains("P-001"), "subject id leaked into logs:\n{logs}");
}
