use std::fs;
use std::path::Path;

use tempfile::TempDir;

use odm_cli::pipeline::{ConvertRequest, run_convert};
use odm_map::ProgressSnapshot;
use odm_model::{ConvertOptions, RepeatMode, RepeatUnit};

const INSTRUMENT_CSV: &str = "\
unique_event_name,form
visit_1,demographics
visit_1,labs
";

const DICTIONARY_CSV: &str = "\
Variable / Field Name,Form Name,Field Type,\"Choices, Calculations, OR Slider Labels\",Field Annotation
dm_age,demographics,text,,
dm_sex,demographics,dropdown,\"1, Male | 2, Female\",@DEFAULT='1'
lb_gluc,labs,text,,
";

const DEMO_CSV: &str = "\
subject_id,age
P-001,34
P-002,40
";

const LABS_CSV: &str = "\
subject_id,glucose
P-001,104
";

const PLAN_JSON: &str = r#"{
  "sheets": [
    {
      "sheet": "demo",
      "event": "visit_1",
      "form": "demographics",
      "fields": [{ "field": "age", "variable": "dm_age" }]
    },
    {
      "sheet": "labs",
      "event": "visit_1",
      "form": "labs",
      "fields": [{ "field": "glucose", "variable": "lb_gluc" }]
    }
  ]
}"#;

fn write_fixtures(dir: &Path) {
    fs::write(dir.join("instrument.csv"), INSTRUMENT_CSV).expect("write instrument");
    fs::write(dir.join("dictionary.csv"), DICTIONARY_CSV).expect("write dictionary");
    fs::write(dir.join("demo.csv"), DEMO_CSV).expect("write demo sheet");
    fs::write(dir.join("labs.csv"), LABS_CSV).expect("write labs sheet");
    fs::write(dir.join("plan.json"), PLAN_JSON).expect("write plan");
}

fn request(dir: &Path, options: ConvertOptions) -> ConvertRequest {
    ConvertRequest {
        sheets: vec![dir.join("demo.csv"), dir.join("labs.csv")],
        instrument: dir.join("instrument.csv"),
        dictionary: dir.join("dictionary.csv"),
        plan: dir.join("plan.json"),
        output: dir.join("out").join("export.xml"),
        options,
        save_progress: None,
    }
}

#[test]
fn converts_csv_fixtures_to_odm_xml() {
    let dir = TempDir::new().expect("temp dir");
    write_fixtures(dir.path());
    let request = request(dir.path(), ConvertOptions::default());

    let summary = run_convert(&request).expect("conversion succeeds");

    assert_eq!(summary.subjects, 2);
    assert_eq!(summary.events, 1);
    assert_eq!(summary.forms, 2);
    assert_eq!(summary.variables, 2);

    let xml = fs::read_to_string(&summary.output).expect("read output");
    assert!(xml.contains("<SubjectData SubjectKey=\"P-001\">"));
    assert!(xml.contains("<SubjectData SubjectKey=\"P-002\">"));
    assert!(xml.contains("StudyEventOID=\"Event.visit_1\""));
    assert!(xml.contains("FormOID=\"Form.demographics\""));
    assert!(xml.contains("<ItemData ItemOID=\"Item.dm_age\" Value=\"34\"/>"));
    assert!(xml.contains("<ItemData ItemOID=\"Item.lb_gluc\" Value=\"104\"/>"));
    // P-002 has no labs row; column mode still emits the empty item.
    assert!(xml.contains("<ItemData ItemOID=\"Item.lb_gluc\" Value=\"\"/>"));
}

#[test]
fn defaults_flag_fills_unselected_variables() {
    let dir = TempDir::new().expect("temp dir");
    write_fixtures(dir.path());
    let options = ConvertOptions {
        include_defaults: true,
        ..Default::default()
    };
    let request = request(dir.path(), options);

    let summary = run_convert(&request).expect("conversion succeeds");
    let xml = fs::read_to_string(&summary.output).expect("read output");

    // dm_sex was never selected; its @DEFAULT annotation supplies "1".
    assert!(xml.contains("<ItemData ItemOID=\"Item.dm_sex\" Value=\"1\"/>"));
}

#[test]
fn row_mode_repeats_forms_per_matching_row() {
    let dir = TempDir::new().expect("temp dir");
    write_fixtures(dir.path());
    fs::write(
        dir.path().join("labs.csv"),
        "subject_id,glucose\nP-001,104\nP-001,99\n",
    )
    .expect("rewrite labs sheet");
    let options = ConvertOptions {
        mode: RepeatMode::Rows,
        repeat_unit: RepeatUnit::Form,
        ..Default::default()
    };
    let request = request(dir.path(), options);

    let summary = run_convert(&request).expect("conversion succeeds");
    let xml = fs::read_to_string(&summary.output).expect("read output");

    assert!(xml.contains("FormOID=\"Form.labs\" FormRepeatKey=\"1\""));
    assert!(xml.contains("FormOID=\"Form.labs\" FormRepeatKey=\"2\""));
    assert!(xml.contains("Value=\"104\""));
    assert!(xml.contains("Value=\"99\""));
}

#[test]
fn save_progress_writes_a_completed_snapshot() {
    let dir = TempDir::new().expect("temp dir");
    write_fixtures(dir.path());
    let mut request = request(dir.path(), ConvertOptions::default());
    let progress = dir.path().join("progress.json");
    request.save_progress = Some(progress.clone());

    run_convert(&request).expect("conversion succeeds");

    let snapshot = ProgressSnapshot::load(&progress).expect("load snapshot");
    // All three selection stages were replayed from the plan.
    assert_eq!(snapshot.stage.as_code(), 4);
    assert_eq!(snapshot.checked.len(), 2);
}

#[test]
fn missing_dictionary_column_fails_with_context() {
    let dir = TempDir::new().expect("temp dir");
    write_fixtures(dir.path());
    fs::write(
        dir.path().join("dictionary.csv"),
        "Variable / Field Name,Form Name\ndm_age,demographics\n",
    )
    .expect("rewrite dictionary");
    let request = request(dir.path(), ConvertOptions::default());

    let error = run_convert(&request).expect_err("conversion fails");
    assert!(format!("{error:#}").contains("data dictionary"));
}
