use comfy_table::{CellAlignment, Table};

use odm_cli::inspect::apply_table_style;
use odm_cli::pipeline::ConvertSummary;

pub fn print_summary(summary: &ConvertSummary) {
    println!("Output: {}", summary.output.display());
    let mut table = Table::new();
    table.set_header(vec!["Subjects", "Events", "Forms", "Variables"]);
    apply_table_style(&mut table);
    table.add_row(vec![
        summary.subjects.to_string(),
        summary.events.to_string(),
        summary.forms.to_string(),
        summary.variables.to_string(),
    ]);
    for column in table.column_iter_mut() {
        column.set_cell_alignment(CellAlignment::Right);
    }
    println!("{table}");
}
