//! Offset-based reference passes.
//!
//! These passes need no calculator: they shift same-sheet, relative
//! references by amounts the caller already knows. Absolute axes and
//! references into other sheets pass through unchanged.

use super::reference::{RefPart, Reference, SheetScope, rewrite_references};

/// Adjust a formula after `row_offset` rows were inserted below the repeat
/// block spanning template rows `repeat_start..=repeat_end`.
///
/// Rules:
/// - relative rows after `repeat_end` move down by `row_offset`
/// - a range whose end row lies inside the block grows by `row_offset`, so a
///   range over the block covers every inserted copy (`C6:C6` -> `C6:C8`)
pub fn adjust_for_row_expansion(
    formula: &str,
    repeat_start: usize,
    repeat_end: usize,
    row_offset: usize,
) -> String {
    if row_offset == 0 {
        return formula.to_string();
    }
    rewrite_references(formula, |reference| {
        reference.rewrite_local(|part, cell| {
            if cell.row_abs {
                return cell;
            }
            let grows = part == RefPart::End && (repeat_start..=repeat_end).contains(&cell.row);
            if cell.row > repeat_end || grows {
                cell.at(cell.row + row_offset, cell.col)
            } else {
                cell
            }
        })
    })
}

/// Adjust a formula copied into the `repeat_index`-th instance of a one-row
/// template: every relative row moves down by `repeat_index`.
pub fn adjust_for_repeat_index(formula: &str, repeat_index: usize) -> String {
    if repeat_index == 0 {
        return formula.to_string();
    }
    rewrite_references(formula, |reference| {
        reference.rewrite_local(|_, cell| {
            if cell.row_abs {
                cell
            } else {
                cell.at(cell.row + repeat_index, cell.col)
            }
        })
    })
}

/// Adjust a formula after `shift_amount` columns were inserted: relative
/// columns at or after `start_col` move right.
pub fn adjust_for_column_expansion(formula: &str, start_col: usize, shift_amount: usize) -> String {
    if shift_amount == 0 {
        return formula.to_string();
    }
    rewrite_references(formula, |reference| {
        reference.rewrite_local(|_, cell| {
            if !cell.col_abs && cell.col >= start_col {
                cell.at(cell.row, cell.col + shift_amount)
            } else {
                cell
            }
        })
    })
}

/// Collapse fully relative single-cell ranges (`B8:B8`) into plain
/// references (`B8`), so they expand like any other single reference.
pub fn normalize_single_cell_ranges(formula: &str) -> String {
    rewrite_references(formula, |reference| match reference {
        Reference::Range {
            sheet: SheetScope::Local,
            start,
            end,
        } if start == end && start.is_relative() => Some(start.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_expansion_grows_self_range() {
        assert_eq!(adjust_for_row_expansion("=SUM(C6:C6)", 5, 5, 2), "=SUM(C6:C8)");
    }

    #[test]
    fn test_row_expansion_shifts_rows_below() {
        assert_eq!(
            adjust_for_row_expansion("=A2+A6+A10", 5, 5, 3),
            "=A2+A6+A13"
        );
        assert_eq!(
            adjust_for_row_expansion("=SUM(B8:B12)", 5, 6, 4),
            "=SUM(B12:B16)"
        );
    }

    #[test]
    fn test_row_expansion_leaves_absolute_and_foreign_refs() {
        assert_eq!(
            adjust_for_row_expansion("=A$10+Other!A10+'My Sheet'!B12", 5, 5, 3),
            "=A$10+Other!A10+'My Sheet'!B12"
        );
    }

    #[test]
    fn test_repeat_index_shifts_relative_rows() {
        assert_eq!(
            adjust_for_repeat_index("=B3*C3+$D$1+E$1", 2),
            "=B5*C5+$D$1+E$1"
        );
        assert_eq!(adjust_for_repeat_index("=B3*Rates!C3", 2), "=B5*Rates!C3");
        assert_eq!(adjust_for_repeat_index("=B3", 0), "=B3");
    }

    #[test]
    fn test_column_expansion_shifts_columns_at_or_after_start() {
        // RIGHT region B:C with 4 items adds (4 - 1) * 2 columns.
        assert_eq!(
            adjust_for_column_expansion("=A1+D1+SUM(D2:E2)+$D3", 3, 6),
            "=A1+J1+SUM(J2:K2)+$D3"
        );
    }

    #[test]
    fn test_normalize_single_cell_ranges() {
        assert_eq!(
            normalize_single_cell_ranges("=SUM(B8:B8)+SUM(C1:C2)+SUM($D$4:$D$4)+X!E5:E5"),
            "=SUM(B8)+SUM(C1:C2)+SUM($D$4:$D$4)+X!E5:E5"
        );
    }

    #[test]
    fn test_passes_compose() {
        let formula = normalize_single_cell_ranges("=SUM(A2:A2)+A5");
        let formula = adjust_for_row_expansion(&formula, 1, 1, 3);
        assert_eq!(formula, "=SUM(A2)+A8");
        // Second run over refs it does not own is a no-op.
        assert_eq!(normalize_single_cell_ranges(&formula), formula);
    }
}
