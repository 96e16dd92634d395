//! Markdown preview of planned sheets

use crate::error::Result;
use crate::plan::SheetPlan;
use gridfill_engine::engine::{CellCoord, Direction, RowInfo};
use std::fmt::Write as _;
use std::path::Path;

/// Write the planned sheets to a markdown file
pub fn write_markdown(path: &Path, plans: &[SheetPlan]) -> Result<()> {
    std::fs::write(path, markdown_content(plans))?;
    Ok(())
}

/// Render the planned sheets as markdown tables, one section per sheet.
///
/// Rows are emitted strictly in output order. The `Source` column names the
/// collection item each row was generated from.
pub fn markdown_content(plans: &[SheetPlan]) -> String {
    let mut out = String::new();
    for (i, plan) in plans.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_sheet(&mut out, plan);
    }
    out
}

fn write_sheet(out: &mut String, plan: &SheetPlan) {
    let _ = writeln!(out, "# {}", plan.name);
    let _ = writeln!(out);

    let Some(last_col) = plan.last_col() else {
        let _ = writeln!(out, "*Empty sheet*");
        return;
    };

    // Header row with column letters
    out.push_str("|   | Source |");
    for col in 0..=last_col {
        let _ = write!(out, " {} |", CellCoord::col_to_letters(col));
    }
    out.push('\n');

    out.push_str("|---|---|");
    for _ in 0..=last_col {
        out.push_str("---|");
    }
    out.push('\n');

    for row in 0..plan.total_rows() {
        let _ = write!(out, "| {} | {} |", row + 1, escape_markdown(&row_source(plan, row)));
        for col in 0..=last_col {
            let display = plan
                .get(CellCoord::new(row, col))
                .map(|c| c.as_str())
                .unwrap_or("");
            let _ = write!(out, " {} |", escape_markdown(display));
        }
        out.push('\n');
    }
}

/// Items generating output row `row`, across all template columns.
fn row_source(plan: &SheetPlan, row: usize) -> String {
    let calc = &plan.calculator;
    let mut labels: Vec<String> = Vec::new();
    for col in 0..=plan.template_last_col {
        let label = match calc.get_row_info_for_column(row, col) {
            RowInfo::Repeat {
                expansion,
                item_index,
                ..
            } => {
                let exp = &calc.get_expansions()[expansion];
                let variable = &calc.regions()[exp.region_index].variable;
                match exp.direction {
                    Direction::Down => format!("{}[{}]", variable, item_index),
                    Direction::Right => format!("{}[0..{}]", variable, exp.item_count),
                }
            }
            RowInfo::EmptyRange { expansion, .. } => {
                let exp = &calc.get_expansions()[expansion];
                format!("{} (empty)", exp.collection)
            }
            RowInfo::Static { .. } | RowInfo::Blank => continue,
        };
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels.join(", ")
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}
