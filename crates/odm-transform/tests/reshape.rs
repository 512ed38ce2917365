use odm_model::{FieldValues, RepeatMode, Sheet, SheetFields, Workbook};
use odm_transform::{collect_subject_ids, reshape};

fn sheet(name: &str, headers: &[&str], rows: &[&[Option<&str>]]) -> Sheet {
    Sheet {
        name: name.to_string(),
        headers: headers.iter().map(|h| Some(h.to_string())).collect(),
        rows: rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.map(String::from)).collect())
            .collect(),
    }
}

fn selected(pairs: &[(&str, &[&str])]) -> Vec<SheetFields> {
    pairs
        .iter()
        .map(|(sheet, fields)| SheetFields {
            sheet: sheet.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        })
        .collect()
}

#[test]
fn subject_ids_keep_duplicates_and_skip_null_keys() {
    let workbook = Workbook::new(vec![sheet(
        "demo",
        &["subject_id", "age"],
        &[
            &[Some("P-001"), Some("34")],
            &[None, Some("99")],
            &[Some("P-002"), Some("40")],
            &[Some("P-001"), Some("35")],
        ],
    )]);
    assert_eq!(collect_subject_ids(&workbook), ["P-001", "P-002", "P-001"]);
}

#[test]
fn column_mode_last_matching_row_wins() {
    let workbook = Workbook::new(vec![sheet(
        "demo",
        &["subject_id", "age"],
        &[
            &[Some("P-001"), Some("34")],
            &[Some("P-001"), Some("35")],
        ],
    )]);
    let records = reshape(
        &workbook,
        &selected(&[("demo", &["age"])]),
        RepeatMode::Columns,
    );
    assert_eq!(records.len(), 1);
    let demo = records[0].sheet("demo").expect("demo sheet");
    assert_eq!(demo.get("age"), Some(&FieldValues::Single("35".to_string())));
}

#[test]
fn column_mode_null_cell_does_not_overwrite() {
    let workbook = Workbook::new(vec![sheet(
        "demo",
        &["subject_id", "age"],
        &[
            &[Some("P-001"), Some("34")],
            &[Some("P-001"), None],
        ],
    )]);
    let records = reshape(
        &workbook,
        &selected(&[("demo", &["age"])]),
        RepeatMode::Columns,
    );
    let demo = records[0].sheet("demo").expect("demo sheet");
    assert_eq!(demo.get("age"), Some(&FieldValues::Single("34".to_string())));
}

#[test]
fn row_mode_accumulates_ordered_lists_skipping_nulls() {
    let workbook = Workbook::new(vec![sheet(
        "labs",
        &["subject_id", "glucose", "sodium"],
        &[
            &[Some("P-001"), Some("90"), Some("140")],
            &[Some("P-001"), None, Some("141")],
            &[Some("P-001"), Some("104"), None],
        ],
    )]);
    let records = reshape(
        &workbook,
        &selected(&[("labs", &["glucose", "sodium"])]),
        RepeatMode::Rows,
    );
    let labs = records[0].sheet("labs").expect("labs sheet");
    // Null cells are skipped, so list lengths differ from row counts.
    assert_eq!(
        labs.get("glucose"),
        Some(&FieldValues::Repeating(vec!["90".into(), "104".into()]))
    );
    assert_eq!(
        labs.get("sodium"),
        Some(&FieldValues::Repeating(vec!["140".into(), "141".into()]))
    );
}

#[test]
fn sheets_without_matching_rows_are_absent() {
    let workbook = Workbook::new(vec![
        sheet(
            "demo",
            &["subject_id", "age"],
            &[&[Some("P-001"), Some("34")], &[Some("P-002"), Some("40")]],
        ),
        sheet(
            "labs",
            &["subject_id", "glucose"],
            &[&[Some("P-001"), Some("104")]],
        ),
    ]);
    let records = reshape(
        &workbook,
        &selected(&[("demo", &["age"]), ("labs", &["glucose"])]),
        RepeatMode::Columns,
    );
    assert_eq!(records.len(), 2);
    assert!(records[0].sheet("labs").is_some());
    assert!(records[1].sheet("labs").is_none());
}

#[test]
fn unselected_sheets_and_fields_are_ignored() {
    let workbook = Workbook::new(vec![
        sheet(
            "demo",
            &["subject_id", "age", "sex"],
            &[&[Some("P-001"), Some("34"), Some("F")]],
        ),
        sheet(
            "notes",
            &["subject_id", "comment"],
            &[&[Some("P-001"), Some("fine")]],
        ),
    ]);
    let records = reshape(
        &workbook,
        &selected(&[("demo", &["age"])]),
        RepeatMode::Columns,
    );
    let record = &records[0];
    assert!(record.sheet("notes").is_none());
    let demo = record.sheet("demo").expect("demo sheet");
    assert_eq!(demo.get("sex"), None);
}

#[test]
fn duplicate_subject_rows_merge_into_one_record() {
    let workbook = Workbook::new(vec![sheet(
        "demo",
        &["subject_id", "age"],
        &[
            &[Some("P-001"), Some("34")],
            &[Some("P-002"), Some("40")],
            &[Some("P-001"), Some("35")],
        ],
    )]);
    let records = reshape(
        &workbook,
        &selected(&[("demo", &["age"])]),
        RepeatMode::Columns,
    );
    let ids: Vec<_> = records.iter().map(|r| r.subject_id.as_str()).collect();
    assert_eq!(ids, ["P-001", "P-002"]);
}

#[test]
fn reshape_is_idempotent() {
    let workbook = Workbook::new(vec![sheet(
        "labs",
        &["subject_id", "glucose"],
        &[
            &[Some("P-001"), Some("90")],
            &[Some("P-001"), Some("104")],
        ],
    )]);
    let selection = selected(&[("labs", &["glucose"])]);
    let first = reshape(&workbook, &selection, RepeatMode::Rows);
    let second = reshape(&workbook, &selection, RepeatMode::Rows);
    assert_eq!(first, second);
}
