//! Reference expansion over repeated blocks, and calculator-driven remapping.
//!
//! A formula outside a repeat block that points at one cell inside it means
//! "that cell of every item". Once the block is repeated, the reference
//! becomes either a contiguous range (one-row/one-column blocks) or a list
//! of discrete cells (taller/wider blocks, whose items are not adjacent).
//!
//! Generated references never include the formula's own cell: a range is cut
//! short and a list entry dropped instead, so the output never contains a
//! circular reference.

use std::collections::HashMap;
use tracing::{trace, warn};

use super::reference::{CellToken, Reference, SheetScope, rewrite_references};
use crate::engine::{CellCoord, Direction, PositionCalculator, RepeatExpansion};
use crate::error::FormulaExpansionError;

/// Result of an expansion pass.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExpandedFormula {
    pub formula: String,
    /// False when at least one reference became a discrete cell list.
    pub is_sequential: bool,
    /// Length of the longest discrete list produced (0 when sequential).
    pub discrete_len: usize,
}

impl ExpandedFormula {
    fn unchanged(formula: &str) -> Self {
        Self {
            formula: formula.to_string(),
            is_sequential: true,
            discrete_len: 0,
        }
    }

    /// Fail when a discrete list exceeds `limit` references.
    pub fn check_limit(
        self,
        sheet: &str,
        cell: CellCoord,
        original: &str,
        limit: usize,
    ) -> Result<String, FormulaExpansionError> {
        if !self.is_sequential && self.discrete_len > limit {
            return Err(FormulaExpansionError {
                sheet: sheet.to_string(),
                cell,
                formula: original.to_string(),
                item_count: self.discrete_len,
                limit,
            });
        }
        Ok(self.formula)
    }
}

/// Growth axis of an expansion.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Axis {
    Rows,
    Cols,
}

impl From<Direction> for Axis {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Down => Axis::Rows,
            Direction::Right => Axis::Cols,
        }
    }
}

impl Axis {
    fn is_absolute(self, cell: &CellToken) -> bool {
        match self {
            Axis::Rows => cell.row_abs,
            Axis::Cols => cell.col_abs,
        }
    }

    /// Step `cell` `distance` places along the axis.
    fn step(self, cell: CellToken, distance: usize) -> CellToken {
        match self {
            Axis::Rows => cell.at(cell.row + distance, cell.col),
            Axis::Cols => cell.at(cell.row, cell.col + distance),
        }
    }

    fn position(self, cell: &CellToken) -> usize {
        match self {
            Axis::Rows => cell.row,
            Axis::Cols => cell.col,
        }
    }
}

/// Tracks expansion results across the references of one formula.
struct ExpansionStats {
    is_sequential: bool,
    discrete_len: usize,
}

impl ExpansionStats {
    fn new() -> Self {
        Self {
            is_sequential: true,
            discrete_len: 0,
        }
    }

    fn finish(self, formula: String) -> ExpandedFormula {
        ExpandedFormula {
            formula,
            is_sequential: self.is_sequential,
            discrete_len: self.discrete_len,
        }
    }
}

/// Expand `first` (the first item's copy of a cell) over `items` items spaced
/// `stride` apart along `axis`, skipping `formula_cell`.
///
/// Returns `None` when nothing is left after removing the formula's own cell.
fn expand_cell(
    sheet: &SheetScope,
    first: CellToken,
    axis: Axis,
    items: usize,
    stride: usize,
    formula_cell: Option<CellCoord>,
    stats: &mut ExpansionStats,
) -> Option<String> {
    let is_self = |cell: &CellToken| {
        matches!(sheet, SheetScope::Local) && formula_cell == Some(cell.coord())
    };

    if stride == 1 {
        let mut start = first;
        let mut end = axis.step(first, items - 1);
        if let Some(own) = formula_cell.filter(|_| matches!(sheet, SheetScope::Local)) {
            let own = CellToken::relative(own);
            let same_line = match axis {
                Axis::Rows => own.col == first.col,
                Axis::Cols => own.row == first.row,
            };
            let at = axis.position(&own);
            if same_line && axis.position(&start) <= at && at <= axis.position(&end) {
                warn!(reference = %first, cell = %own, "dropping self reference from range");
                if at > axis.position(&start) {
                    end = axis.step(start, at - axis.position(&start) - 1);
                } else if at < axis.position(&end) {
                    start = axis.step(start, 1);
                } else {
                    return None;
                }
            }
        }
        let text = if start == end {
            format!("{}{}", sheet, start)
        } else {
            format!("{}{}:{}", sheet, start, end)
        };
        return Some(text);
    }

    let cells: Vec<CellToken> = (0..items)
        .map(|i| axis.step(first, i * stride))
        .filter(|cell| {
            let own = is_self(cell);
            if own {
                warn!(reference = %first, cell = %cell, "dropping self reference from list");
            }
            !own
        })
        .collect();
    if cells.is_empty() {
        return None;
    }
    if cells.len() > 1 {
        stats.is_sequential = false;
        stats.discrete_len = stats.discrete_len.max(cells.len());
    }
    Some(
        cells
            .iter()
            .map(|cell| format!("{}{}", sheet, cell))
            .collect::<Vec<_>>()
            .join(","),
    )
}

fn expand_single_ref(
    formula: &str,
    axis: Axis,
    repeat_start: usize,
    repeat_end: usize,
    item_count: usize,
    template_len: usize,
    formula_cell: Option<CellCoord>,
) -> ExpandedFormula {
    let items = item_count.max(1);
    if items == 1 || template_len == 0 {
        return ExpandedFormula::unchanged(formula);
    }
    let mut stats = ExpansionStats::new();
    let rewritten = rewrite_references(formula, |reference| match reference {
        Reference::Cell {
            sheet: SheetScope::Local,
            cell,
        } if !axis.is_absolute(cell)
            && (repeat_start..=repeat_end).contains(&axis.position(cell)) =>
        {
            expand_cell(
                &SheetScope::Local,
                *cell,
                axis,
                items,
                template_len,
                formula_cell,
                &mut stats,
            )
        }
        _ => None,
    });
    stats.finish(rewritten)
}

/// Expand single references into a DOWN block spanning template rows
/// `repeat_start_row..=repeat_end_row`.
///
/// `formula_cell` is the formula's own position in the same coordinates as
/// the generated references; it is never referenced.
///
/// ```ignore
/// let out = expand_single_ref_to_row_range("=SUM(B8)", 6, 7, 3, 2, None);
/// assert_eq!(out.formula, "=SUM(B8,B10,B12)");
/// assert!(!out.is_sequential);
/// ```
pub fn expand_single_ref_to_row_range(
    formula: &str,
    repeat_start_row: usize,
    repeat_end_row: usize,
    item_count: usize,
    template_row_count: usize,
    formula_cell: Option<CellCoord>,
) -> ExpandedFormula {
    expand_single_ref(
        formula,
        Axis::Rows,
        repeat_start_row,
        repeat_end_row,
        item_count,
        template_row_count,
        formula_cell,
    )
}

/// Column counterpart of [`expand_single_ref_to_row_range`] for RIGHT blocks.
pub fn expand_single_ref_to_column_range(
    formula: &str,
    repeat_start_col: usize,
    repeat_end_col: usize,
    item_count: usize,
    template_col_count: usize,
    formula_cell: Option<CellCoord>,
) -> ExpandedFormula {
    expand_single_ref(
        formula,
        Axis::Cols,
        repeat_start_col,
        repeat_end_col,
        item_count,
        template_col_count,
        formula_cell,
    )
}

/// Output position of `cell`, keeping absolute axes where they were.
fn remap(calculator: &PositionCalculator, cell: CellToken) -> CellToken {
    let target = calculator.get_final_position(cell.coord());
    cell.at(
        if cell.row_abs { cell.row } else { target.row },
        if cell.col_abs { cell.col } else { target.col },
    )
}

/// Map every same-sheet reference through `calculator`. Both ends of a range
/// are mapped independently.
pub fn adjust_with_position_calculator(formula: &str, calculator: &PositionCalculator) -> String {
    rewrite_references(formula, |reference| {
        reference.rewrite_local(|_, cell| remap(calculator, cell))
    })
}

/// Expand `cell` (a template cell inside `expansion`'s block) to the output
/// cells of all `items` copies.
fn expand_into(
    sheet: &SheetScope,
    cell: &CellToken,
    expansion: &RepeatExpansion,
    items: usize,
    formula_cell: Option<CellCoord>,
    stats: &mut ExpansionStats,
) -> Option<String> {
    let axis = Axis::from(expansion.direction);
    if axis.is_absolute(cell) {
        return None;
    }
    let start = expansion.area.start();
    let first = cell.at(
        if cell.row_abs {
            cell.row
        } else {
            expansion.final_start_row + (cell.row - start.row)
        },
        if cell.col_abs {
            cell.col
        } else {
            expansion.final_start_col + (cell.col - start.col)
        },
    );
    let stride = match axis {
        Axis::Rows => expansion.area.row_count(),
        Axis::Cols => expansion.area.col_count(),
    };
    let out = expand_cell(sheet, first, axis, items.max(1), stride, formula_cell, stats);
    trace!(reference = %cell, collection = %expansion.collection, expanded = ?out, "expanded reference");
    out
}

fn foreign_expansion<'a>(
    sheet: &SheetScope,
    cell: &CellToken,
    other_sheet_expansions: &'a HashMap<String, Vec<RepeatExpansion>>,
) -> Option<&'a RepeatExpansion> {
    let SheetScope::Sheet(name) = sheet else {
        return None;
    };
    other_sheet_expansions
        .get(name)?
        .iter()
        .find(|e| e.area.contains(cell.coord()))
}

/// Expand single references into `expansion`'s block using its computed
/// final position, plus references into expanding blocks on other sheets.
///
/// Local references use `item_count`; references of the form `Sheet!A1`
/// into a block listed under that sheet in `other_sheet_expansions` use that
/// block's own item count. The generated references are output coordinates
/// and must not be fed through [`adjust_with_position_calculator`] again.
pub fn expand_to_range_with_calculator(
    formula: &str,
    expansion: &RepeatExpansion,
    item_count: usize,
    other_sheet_expansions: &HashMap<String, Vec<RepeatExpansion>>,
    formula_cell: Option<CellCoord>,
) -> ExpandedFormula {
    let mut stats = ExpansionStats::new();
    let rewritten = rewrite_references(formula, |reference| match reference {
        Reference::Cell {
            sheet: SheetScope::Local,
            cell,
        } if expansion.area.contains(cell.coord()) => expand_into(
            &SheetScope::Local,
            cell,
            expansion,
            item_count,
            formula_cell,
            &mut stats,
        ),
        Reference::Cell { sheet, cell } => {
            let other = foreign_expansion(sheet, cell, other_sheet_expansions)?;
            expand_into(sheet, cell, other, other.rendered_items(), None, &mut stats)
        }
        Reference::Range { .. } => None,
    });
    stats.finish(rewritten)
}

fn encloses(a: CellToken, b: CellToken, cell: CellCoord) -> bool {
    (a.row.min(b.row)..=a.row.max(b.row)).contains(&cell.row)
        && (a.col.min(b.col)..=a.col.max(b.col)).contains(&cell.col)
}

/// Output end of a range whose start maps to `start`. An end inside a repeat
/// block reaches that cell of the last item, but stops short of `formula_cell`.
fn stretch_range_end(
    calculator: &PositionCalculator,
    start: CellToken,
    end: CellToken,
    formula_cell: Option<CellCoord>,
) -> CellToken {
    let mapped = remap(calculator, end);
    let Some((_, exp)) = calculator.expansion_at(end.coord()) else {
        return mapped;
    };
    let axis = Axis::from(exp.direction);
    if axis.is_absolute(&end) {
        return mapped;
    }
    let stride = match axis {
        Axis::Rows => exp.area.row_count(),
        Axis::Cols => exp.area.col_count(),
    };
    let stretched = axis.step(mapped, (exp.rendered_items() - 1) * stride);
    match formula_cell {
        Some(own) if encloses(start, stretched, own) && !encloses(start, mapped, own) => {
            let at = axis.position(&CellToken::relative(own));
            let last = axis.step(mapped, at - 1 - axis.position(&mapped));
            warn!(reference = %end, cell = %own, "dropping self reference from range");
            last
        }
        _ => stretched,
    }
}

/// Rewrite a formula that sits outside every repeat block.
///
/// Single references into a block (on this sheet or, through
/// `other_sheet_expansions`, on another) expand over all items; every other
/// same-sheet reference is mapped through `calculator`. A range whose end
/// falls inside a block stretches to that cell of the block's last item,
/// stopping short of the formula's own cell.
/// `formula_cell` is the formula's output position.
pub fn adjust_formula(
    formula: &str,
    calculator: &PositionCalculator,
    other_sheet_expansions: &HashMap<String, Vec<RepeatExpansion>>,
    formula_cell: Option<CellCoord>,
) -> ExpandedFormula {
    let mut stats = ExpansionStats::new();
    let rewritten = rewrite_references(formula, |reference| match reference {
        Reference::Cell {
            sheet: SheetScope::Local,
            cell,
        } => {
            if let Some((_, exp)) = calculator.expansion_at(cell.coord())
                && !Axis::from(exp.direction).is_absolute(cell)
            {
                return expand_into(
                    &SheetScope::Local,
                    cell,
                    exp,
                    exp.rendered_items(),
                    formula_cell,
                    &mut stats,
                );
            }
            reference.rewrite_local(|_, c| remap(calculator, c))
        }
        Reference::Range {
            sheet: SheetScope::Local,
            start,
            end,
        } => {
            let start = remap(calculator, *start);
            let rewritten = Reference::Range {
                sheet: SheetScope::Local,
                start,
                end: stretch_range_end(calculator, start, *end, formula_cell),
            };
            (rewritten != *reference).then(|| rewritten.to_string())
        }
        Reference::Cell { sheet, cell } => {
            let other = foreign_expansion(sheet, cell, other_sheet_expansions)?;
            expand_into(sheet, cell, other, other.rendered_items(), None, &mut stats)
        }
        Reference::Range { .. } => None,
    });
    stats.finish(rewritten)
}

/// Rewrite a formula copied into item `item_index` of the block of
/// `calculator.get_expansions()[expansion]`.
///
/// References into the same block follow the item; every other same-sheet
/// reference is mapped through `calculator`.
pub fn adjust_formula_for_item(
    formula: &str,
    calculator: &PositionCalculator,
    expansion: usize,
    item_index: usize,
) -> String {
    let Some(exp) = calculator.get_expansions().get(expansion) else {
        return formula.to_string();
    };
    let start = exp.area.start();
    rewrite_references(formula, |reference| {
        reference.rewrite_local(|_, cell| {
            if !exp.area.contains(cell.coord()) {
                return remap(calculator, cell);
            }
            let row = calculator.get_row_for_repeat_item(exp, item_index, cell.row - start.row);
            let col = calculator.get_col_for_repeat_item(exp, item_index, cell.col - start.col);
            cell.at(
                if cell.row_abs { cell.row } else { row },
                if cell.col_abs { cell.col } else { col },
            )
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CellArea, CollectionSizes, RepeatRegionSpec};

    fn calculator(regions: &[(&str, &str, Direction, usize)], last_row: usize) -> PositionCalculator {
        let specs = regions
            .iter()
            .map(|&(name, area, direction, _)| {
                RepeatRegionSpec::new(name, "item", CellArea::from_a1(area).unwrap(), direction)
            })
            .collect();
        let sizes: CollectionSizes = regions
            .iter()
            .map(|&(name, _, _, size)| (name.to_string(), size))
            .collect();
        PositionCalculator::new(specs, sizes, last_row)
    }

    #[test]
    fn test_multi_row_block_expands_to_discrete_list() {
        let out = expand_single_ref_to_row_range("=SUM(B8)", 6, 7, 3, 2, None);
        assert_eq!(out.formula, "=SUM(B8,B10,B12)");
        assert!(!out.is_sequential);
        assert_eq!(out.discrete_len, 3);
    }

    #[test]
    fn test_single_row_block_expands_to_range() {
        let out = expand_single_ref_to_row_range("=SUM(B7)+$B7+B$7", 6, 6, 4, 1, None);
        assert_eq!(out.formula, "=SUM(B7:B10)+$B7:$B10+B$7");
        assert!(out.is_sequential);
    }

    #[test]
    fn test_refs_outside_block_are_untouched() {
        let out = expand_single_ref_to_row_range("=B6+B9+Other!B7+SUM(B7:B8)", 6, 7, 3, 2, None);
        assert_eq!(out.formula, "=B6+B9+Other!B7+SUM(B7:B8)");
        assert!(out.is_sequential);
    }

    #[test]
    fn test_single_item_is_a_no_op() {
        let out = expand_single_ref_to_row_range("=SUM(B7)", 6, 6, 1, 1, None);
        assert_eq!(out.formula, "=SUM(B7)");
        let out = expand_single_ref_to_row_range("=SUM(B7)", 6, 6, 0, 1, None);
        assert_eq!(out.formula, "=SUM(B7)");
    }

    #[test]
    fn test_range_never_includes_formula_cell() {
        // Formula at B9 summing a one-row block at B7 with 5 items.
        let own = CellCoord::new(8, 1);
        let out = expand_single_ref_to_row_range("=SUM(B7)", 6, 6, 5, 1, Some(own));
        assert_eq!(out.formula, "=SUM(B7:B8)");

        // Formula on the first item's row: the range starts after it.
        let own = CellCoord::new(6, 1);
        let out = expand_single_ref_to_row_range("=SUM(B7)", 6, 6, 3, 1, Some(own));
        assert_eq!(out.formula, "=SUM(B8:B9)");

        // Same row, different column: nothing to drop.
        let own = CellCoord::new(8, 2);
        let out = expand_single_ref_to_row_range("=SUM(B7)", 6, 6, 5, 1, Some(own));
        assert_eq!(out.formula, "=SUM(B7:B11)");
    }

    #[test]
    fn test_list_never_includes_formula_cell() {
        let own = CellCoord::new(9, 1);
        let out = expand_single_ref_to_row_range("=SUM(B8)", 6, 7, 3, 2, Some(own));
        assert_eq!(out.formula, "=SUM(B8,B12)");
        assert_eq!(out.discrete_len, 2);
    }

    #[test]
    fn test_column_block_expansion() {
        // RIGHT block B1:B1 with 4 items.
        let out = expand_single_ref_to_column_range("=SUM(B1)", 1, 1, 4, 1, None);
        assert_eq!(out.formula, "=SUM(B1:E1)");
        assert!(out.is_sequential);

        // Two-column block B:C with 3 items.
        let out = expand_single_ref_to_column_range("=SUM(C1)", 1, 2, 3, 2, None);
        assert_eq!(out.formula, "=SUM(C1,E1,G1)");
        assert!(!out.is_sequential);
    }

    #[test]
    fn test_calculator_pass_maps_both_range_ends() {
        let calc = calculator(&[("items", "A2:A2", Direction::Down, 5)], 8);
        assert_eq!(
            adjust_with_position_calculator("=A1+A6+SUM(A3:B8)+A$6+Other!A6", &calc),
            "=A1+A10+SUM(A7:B8)+A$6+Other!A6"
        );
    }

    #[test]
    fn test_calculator_expansion_uses_final_positions() {
        let calc = calculator(
            &[
                ("first", "B2:B3", Direction::Down, 3),
                ("second", "B6:B6", Direction::Down, 4),
            ],
            10,
        );
        let second = calc.get_expansion_for("second").unwrap();
        assert_eq!(second.final_start_row, 9);
        let out = expand_to_range_with_calculator("=SUM(B6)", second, 4, &HashMap::new(), None);
        assert_eq!(out.formula, "=SUM(B10:B13)");
        assert!(out.is_sequential);

        let first = calc.get_expansion_for("first").unwrap();
        let out = expand_to_range_with_calculator("=SUM(B3)", first, 3, &HashMap::new(), None);
        assert_eq!(out.formula, "=SUM(B3,B5,B7)");
        assert!(!out.is_sequential);
    }

    #[test]
    fn test_calculator_expansion_follows_other_sheets() {
        let data = calculator(&[("rows", "A2:A2", Direction::Down, 3)], 0);
        let mut others = HashMap::new();
        others.insert("Data Sheet".to_string(), data.get_expansions().to_vec());

        let local = calculator(&[("cols", "C1:C1", Direction::Right, 2)], 0);
        let cols = local.get_expansion_for("cols").unwrap();
        let out = expand_to_range_with_calculator(
            "=SUM('Data Sheet'!A2)+C1+Data!A2",
            cols,
            2,
            &others,
            None,
        );
        assert_eq!(out.formula, "=SUM('Data Sheet'!A2:A4)+C1:D1+Data!A2");
    }

    #[test]
    fn test_adjust_formula_combines_expansion_and_remap() {
        let calc = calculator(&[("items", "B2:B2", Direction::Down, 4)], 6);
        // Total row below the block: B4 moves to B7.
        let own = calc.get_final_position(CellCoord::new(3, 1));
        assert_eq!(own, CellCoord::new(6, 1));
        let out = adjust_formula("=SUM(B2)/B4+SUM(B1:B2)", &calc, &HashMap::new(), Some(own));
        assert_eq!(out.formula, "=SUM(B2:B5)/B7+SUM(B1:B5)");
        assert!(out.is_sequential);
    }

    #[test]
    fn test_stretched_range_stops_before_formula_cell() {
        let calc = calculator(&[("items", "B2:B2", Direction::Down, 4)], 2);
        // A3 sits beside the grown block and would land inside A1:B5.
        let own = calc.get_final_position(CellCoord::new(2, 0));
        assert_eq!(own, CellCoord::new(2, 0));
        let out = adjust_formula("=SUM(A1:B2)", &calc, &HashMap::new(), Some(own));
        assert_eq!(out.formula, "=SUM(A1:B2)");

        let out = adjust_formula("=SUM(A1:B2)", &calc, &HashMap::new(), Some(CellCoord::new(3, 0)));
        assert_eq!(out.formula, "=SUM(A1:B3)");

        let out = adjust_formula("=SUM(A1:B2)", &calc, &HashMap::new(), None);
        assert_eq!(out.formula, "=SUM(A1:B5)");
    }

    #[test]
    fn test_calculator_range_skips_formula_cell() {
        let calc = calculator(&[("items", "B2:B2", Direction::Down, 4)], 6);
        let items = calc.get_expansion_for("items").unwrap();
        let own = Some(CellCoord::new(3, 1));
        let out = expand_to_range_with_calculator("=SUM(B2)", items, 4, &HashMap::new(), own);
        assert_eq!(out.formula, "=SUM(B2:B3)");
        assert!(out.is_sequential);

        let out = adjust_formula("=SUM(B2)", &calc, &HashMap::new(), own);
        assert_eq!(out.formula, "=SUM(B2:B3)");
    }

    #[test]
    fn test_calculator_list_skips_formula_cell() {
        let calc = calculator(&[("items", "A2:B3", Direction::Down, 3)], 4);
        let items = calc.get_expansion_for("items").unwrap();
        let own = Some(CellCoord::new(4, 1));
        let out = expand_to_range_with_calculator("=SUM(B3)", items, 3, &HashMap::new(), own);
        assert_eq!(out.formula, "=SUM(B3,B7)");
        assert!(!out.is_sequential);
        assert_eq!(out.discrete_len, 2);

        let out = adjust_formula("=SUM(B3)", &calc, &HashMap::new(), own);
        assert_eq!(out.formula, "=SUM(B3,B7)");
    }

    #[test]
    fn test_adjust_formula_reports_discrete_lists() {
        let calc = calculator(&[("items", "A2:B3", Direction::Down, 300)], 4);
        let out = adjust_formula("=SUM(B3)", &calc, &HashMap::new(), None);
        assert!(!out.is_sequential);
        assert_eq!(out.discrete_len, 300);
        let err = out
            .check_limit("Report", CellCoord::new(4, 1), "=SUM(B3)", 255)
            .unwrap_err();
        assert_eq!(err.sheet, "Report");
        assert_eq!(err.cell.to_string(), "B5");
        assert!(err.to_string().contains("=SUM(B3)"));
    }

    #[test]
    fn test_item_formula_follows_its_item() {
        let calc = calculator(&[("items", "A3:C3", Direction::Down, 3)], 5);
        assert_eq!(
            adjust_formula_for_item("=A3*B3+$E$1+C5", &calc, 0, 2),
            "=A5*B5+$E$1+C7"
        );
        // Same result as the offset pass for a one-row block that has not moved.
        assert_eq!(
            adjust_formula_for_item("=A3*B3", &calc, 0, 1),
            super::super::adjust::adjust_for_repeat_index("=A3*B3", 1)
        );
    }
}
