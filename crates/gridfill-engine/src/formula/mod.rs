//! Formula reference rewriting.
//!
//! - [`parse_references`], [`Reference`], [`CellToken`] - Reference tokens in formula text
//! - [`adjust_for_row_expansion`], [`adjust_for_repeat_index`],
//!   [`adjust_for_column_expansion`] - Offset-based shifting
//! - [`expand_single_ref_to_row_range`], [`expand_single_ref_to_column_range`] -
//!   Aggregate references over repeated blocks
//! - [`adjust_with_position_calculator`], [`adjust_formula`],
//!   [`adjust_formula_for_item`] - Calculator-driven remapping

mod adjust;
mod expand;
mod reference;

pub use adjust::{
    adjust_for_column_expansion, adjust_for_repeat_index, adjust_for_row_expansion,
    normalize_single_cell_ranges,
};
pub use expand::{
    ExpandedFormula, adjust_formula, adjust_formula_for_item, adjust_with_position_calculator,
    expand_single_ref_to_column_range, expand_single_ref_to_row_range,
    expand_to_range_with_calculator,
};
pub use reference::{CellToken, Reference, SheetScope, parse_references, quote_sheet_name};
