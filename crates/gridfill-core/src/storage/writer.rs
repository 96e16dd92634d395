//! Plain-text listing of planned sheets

use crate::error::Result;
use crate::plan::SheetPlan;
use std::fs;
use std::path::Path;

/// Write the planned sheets to a listing file
pub fn write_listing(path: &Path, plans: &[SheetPlan]) -> Result<()> {
    fs::write(path, listing_content(plans))?;
    Ok(())
}

/// One `CELLREF: VALUE` line per planned cell, row-major, under a
/// `# SHEET` header per sheet. Merges follow as `merge: AREA` lines.
pub fn listing_content(plans: &[SheetPlan]) -> String {
    let mut lines = Vec::new();
    for plan in plans {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("# {}", plan.name));

        // BTreeMap keys are row-major already
        for (coord, content) in &plan.cells {
            if content.as_str().is_empty() {
                continue;
            }
            lines.push(format!("{}: {}", coord, content));
        }

        let mut merged = plan.merged.clone();
        merged.sort_by_key(|area| (area.start(), area.end()));
        for area in merged {
            lines.push(format!("merge: {}", area));
        }
    }
    lines.join("\n") + "\n"
}
