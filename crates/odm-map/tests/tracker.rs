use odm_map::{SelectionTracker, Slot, Stage};
use odm_model::{Sheet, SheetFields, Workbook};

fn sheet(name: &str, fields: &[&str]) -> Sheet {
    Sheet {
        name: name.to_string(),
        headers: fields.iter().map(|field| Some(field.to_string())).collect(),
        rows: Vec::new(),
    }
}

fn checked(pairs: &[(&str, &[&str])]) -> Vec<SheetFields> {
    pairs
        .iter()
        .map(|(sheet, fields)| SheetFields {
            sheet: sheet.to_string(),
            fields: fields.iter().map(|field| field.to_string()).collect(),
        })
        .collect()
}

fn two_sheet_tracker() -> SelectionTracker {
    let workbook = Workbook::new(vec![
        sheet("demo", &["subject_id", "age", "sex"]),
        sheet("labs", &["subject_id", "glucose"]),
    ]);
    SelectionTracker::new(&workbook, &checked(&[("demo", &["age", "sex"]), ("labs", &["glucose"])]))
}

#[test]
fn slots_carry_the_four_way_classification() {
    let workbook = Workbook::new(vec![
        sheet("demo", &["subject_id", "age"]),
        sheet("notes", &["subject_id", "comment"]),
    ]);
    let tracker = SelectionTracker::new(&workbook, &checked(&[("demo", &["age"])]));
    assert_eq!(
        tracker.slots(),
        &[
            Slot::SheetMarker {
                sheet: "demo".to_string()
            },
            Slot::EmptyField,
            Slot::FieldSlot {
                sheet: "demo".to_string(),
                field: "age".to_string()
            },
            Slot::EmptySheet,
            Slot::EmptySheet,
            Slot::EmptySheet,
        ]
    );
}

#[test]
fn sheet_assignment_propagates_to_fields_below() {
    let mut tracker = two_sheet_tracker();
    let demo_marker = tracker.marker_index("demo").expect("demo marker");
    tracker.assign(Stage::Events, demo_marker, "baseline");

    let age = tracker.field_index("demo", "age").expect("age slot");
    let sex = tracker.field_index("demo", "sex").expect("sex slot");
    let glucose = tracker.field_index("labs", "glucose").expect("glucose slot");
    let events = tracker.assignments(Stage::Events);
    assert_eq!(events[age].as_deref(), Some("baseline"));
    assert_eq!(events[sex].as_deref(), Some("baseline"));
    // Propagation stops at the next sheet marker.
    assert_eq!(events[glucose], None);
}

#[test]
fn propagation_overwrites_prior_field_choices() {
    let mut tracker = two_sheet_tracker();
    let age = tracker.field_index("demo", "age").expect("age slot");
    tracker.assign(Stage::Events, age, "screening");

    let demo_marker = tracker.marker_index("demo").expect("demo marker");
    tracker.assign(Stage::Events, demo_marker, "baseline");
    assert_eq!(
        tracker.assignments(Stage::Events)[age].as_deref(),
        Some("baseline")
    );
}

#[test]
fn finalize_derives_chosen_lists_and_occurrences() {
    let mut tracker = two_sheet_tracker();
    let age = tracker.field_index("demo", "age").expect("age slot");
    let sex = tracker.field_index("demo", "sex").expect("sex slot");
    let glucose = tracker.field_index("labs", "glucose").expect("glucose slot");

    for idx in [age, sex] {
        tracker.assign(Stage::Events, idx, "baseline");
        tracker.assign(Stage::Forms, idx, "demographics");
    }
    tracker.assign(Stage::Events, glucose, "baseline");
    tracker.assign(Stage::Forms, glucose, "labs_form");
    tracker.assign(Stage::Variables, age, "dm_age");
    tracker.assign(Stage::Variables, sex, "dm_sex");
    tracker.assign(Stage::Variables, glucose, "lb_gluc");

    let selection = tracker.finalize();
    assert_eq!(selection.chosen.events, ["baseline"]);
    assert_eq!(selection.chosen.forms, ["demographics", "labs_form"]);
    assert_eq!(selection.chosen.variables, ["dm_age", "dm_sex", "lb_gluc"]);
    assert_eq!(selection.chosen.variables_for("demographics"), ["dm_age", "dm_sex"]);
    assert_eq!(selection.chosen.variables_for("labs_form"), ["lb_gluc"]);
    assert_eq!(selection.chosen.occurrence("demographics"), 2);
    assert_eq!(selection.chosen.occurrence("labs_form"), 1);

    let triples: Vec<_> = selection.mapping.iter().collect();
    assert_eq!(
        triples,
        vec![
            ("demo", "age", "dm_age"),
            ("demo", "sex", "dm_sex"),
            ("labs", "glucose", "lb_gluc"),
        ]
    );
}

#[test]
fn unresolved_field_slots_are_tolerated() {
    let mut tracker = two_sheet_tracker();
    let age = tracker.field_index("demo", "age").expect("age slot");
    tracker.assign(Stage::Events, age, "baseline");
    tracker.assign(Stage::Forms, age, "demographics");
    tracker.assign(Stage::Variables, age, "dm_age");
    // "sex" and "glucose" stay unresolved.

    let selection = tracker.finalize();
    assert_eq!(selection.chosen.variables, ["dm_age"]);
    assert_eq!(selection.mapping.iter().count(), 1);
    // Occurrence counts only resolved form slots.
    assert_eq!(selection.chosen.occurrence("demographics"), 1);
}

#[test]
fn selected_sheets_reflect_checked_fields() {
    let tracker = two_sheet_tracker();
    let selected = tracker.selected_sheets();
    assert_eq!(selected.len(), 2);
    assert_eq!(selected[0].sheet, "demo");
    assert_eq!(selected[0].fields, ["age", "sex"]);
    assert_eq!(selected[1].sheet, "labs");
    assert_eq!(selected[1].fields, ["glucose"]);
}
