use std::collections::HashMap;
use tracing::trace;

use super::SheetPlan;
use crate::error::Result;
use crate::settings::Settings;
use crate::template::{CellContent, TemplateSheet};
use gridfill_engine::engine::{CellArea, CellCoord, RepeatExpansion};
use gridfill_engine::formula::{
    adjust_formula, adjust_formula_for_item, normalize_single_cell_ranges,
};

/// Output cell of `template` for item `item` of `exp`.
fn item_cell(
    plan: &SheetPlan,
    exp: &RepeatExpansion,
    item: usize,
    template: CellCoord,
) -> CellCoord {
    let start = exp.area.start();
    let calc = &plan.calculator;
    CellCoord::new(
        calc.get_row_for_repeat_item(exp, item, template.row - start.row),
        calc.get_col_for_repeat_item(exp, item, template.col - start.col),
    )
}

/// Place every template cell. Cells outside repeat blocks move to their final
/// position; block cells are copied once per item. An empty collection writes
/// nothing into its reserved block, not even the block's literal text, so the
/// block is blank unless [`place_placeholders`] fills it. The source cells of
/// a same-sheet placeholder in use are skipped; the placeholder is rendered in
/// the block instead.
pub(super) fn place_cells(
    plan: &mut SheetPlan,
    sheet: &TemplateSheet,
    other_sheets: &HashMap<String, Vec<RepeatExpansion>>,
    settings: &Settings,
) -> Result<()> {
    for (&coord, content) in &sheet.cells {
        let block = plan
            .calculator
            .expansion_at(coord)
            .map(|(index, exp)| (index, exp.clone()));

        let Some((index, exp)) = block else {
            if plan.calculator.is_in_empty_range(coord.row, coord.col) {
                continue;
            }
            let target = plan.calculator.get_final_position(coord);
            let placed = match content {
                CellContent::Literal(_) => content.clone(),
                CellContent::Formula(formula) => {
                    let normalized = normalize_single_cell_ranges(formula);
                    let expanded =
                        adjust_formula(&normalized, &plan.calculator, other_sheets, Some(target));
                    let rewritten = expanded.check_limit(
                        &sheet.name,
                        coord,
                        formula,
                        settings.max_discrete_refs,
                    )?;
                    trace!(cell = %coord, from = %formula, to = %rewritten, "rewrote formula");
                    CellContent::Formula(rewritten)
                }
            };
            plan.cells.insert(target, placed);
            continue;
        };

        for item in 0..exp.item_count {
            let target = item_cell(plan, &exp, item, coord);
            let placed = match content {
                CellContent::Literal(_) => content.clone(),
                CellContent::Formula(formula) => CellContent::Formula(adjust_formula_for_item(
                    formula,
                    &plan.calculator,
                    index,
                    item,
                )),
            };
            plan.cells.insert(target, placed);
        }
    }
    Ok(())
}

/// Fill each empty collection's reserved block from its placeholder snapshot,
/// clipped to the block.
pub(super) fn place_placeholders(plan: &mut SheetPlan) {
    let mut placed = Vec::new();
    let mut merged = Vec::new();
    for exp in plan.calculator.get_expansions() {
        if !exp.uses_empty_range() {
            continue;
        }
        let Some(content) = plan
            .calculator
            .regions()
            .get(exp.region_index)
            .and_then(|r| r.empty_range_content.as_ref())
        else {
            continue;
        };
        let block = CellArea::spanning(
            CellCoord::new(0, 0),
            CellCoord::new(exp.area.row_count() - 1, exp.area.col_count() - 1),
        );
        let origin = exp.final_start();
        let shift = |c: CellCoord| CellCoord::new(origin.row + c.row, origin.col + c.col);

        for (&rel, text) in &content.cells {
            if block.contains(rel) {
                placed.push((shift(rel), CellContent::from_raw(text)));
            }
        }
        for area in &content.merged {
            if block.contains(area.start()) && block.contains(area.end()) {
                merged.push(CellArea::spanning(shift(area.start()), shift(area.end())));
            }
        }
    }
    plan.cells.extend(placed);
    plan.merged.extend(merged);
}

/// Translate template merges. A merge inside a repeat block is copied once
/// per rendered item; one inside a placeholder-filled block is dropped in
/// favour of the placeholder's own merges, as is one over a same-sheet
/// placeholder in use.
pub(super) fn place_merges(plan: &mut SheetPlan, sheet: &TemplateSheet) {
    let calc = &plan.calculator;
    let in_placeholder = |c: CellCoord| calc.is_in_empty_range(c.row, c.col);
    let merged: Vec<&CellArea> = sheet
        .merged
        .iter()
        .filter(|area| !(in_placeholder(area.start()) && in_placeholder(area.end())))
        .collect();
    for area in merged {
        let block = plan
            .calculator
            .expansion_at(area.start())
            .filter(|(_, exp)| exp.area.contains(area.end()))
            .map(|(_, exp)| exp.clone());
        match block {
            Some(exp) if exp.uses_empty_range() => {}
            Some(exp) => {
                for item in 0..exp.rendered_items() {
                    let start = item_cell(plan, &exp, item, area.start());
                    let end = item_cell(plan, &exp, item, area.end());
                    plan.merged.push(CellArea::spanning(start, end));
                }
            }
            None => {
                let out = plan.calculator.get_final_range(area.start(), area.end());
                plan.merged.push(out);
            }
        }
    }
}
