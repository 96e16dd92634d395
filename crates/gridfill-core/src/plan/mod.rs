//! Render planning: where every template cell lands and what it says there.

mod place;

use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::error::Result;
use crate::settings::Settings;
use crate::template::{CellContent, Template};
use gridfill_engine::engine::{
    CellArea, CellCoord, CollectionSizes, DataSource, PositionCalculator, RepeatExpansion,
    extract_collection_sizes, validate_no_overlap,
};

/// One sheet, laid out for a given set of collection sizes.
pub struct SheetPlan {
    pub name: String,
    pub calculator: PositionCalculator,
    /// Rightmost template column in use.
    pub template_last_col: usize,
    /// Output cells keyed by output coordinate.
    pub cells: BTreeMap<CellCoord, CellContent>,
    /// Output merged areas.
    pub merged: Vec<CellArea>,
}

impl SheetPlan {
    pub fn get(&self, coord: CellCoord) -> Option<&CellContent> {
        self.cells.get(&coord)
    }

    pub fn total_rows(&self) -> usize {
        self.calculator.get_total_rows()
    }

    /// Rightmost output column holding a cell or merge, if any.
    pub fn last_col(&self) -> Option<usize> {
        let cells = self.cells.keys().map(|c| c.col);
        let merged = self.merged.iter().map(|a| a.end().col);
        cells.chain(merged).max()
    }
}

/// Collection sizes for every region in `template`, read from `data`.
pub fn sizes_from_data<D: DataSource + ?Sized>(template: &Template, data: &D) -> CollectionSizes {
    let regions: Vec<_> = template.regions().cloned().collect();
    extract_collection_sizes(data, &regions)
}

/// Plan every sheet of `template`.
///
/// Every sheet is validated before any cell is placed, so a bad region on a
/// later sheet fails the whole workbook.
pub fn plan_workbook(
    template: &Template,
    sizes: &CollectionSizes,
    settings: &Settings,
) -> Result<Vec<SheetPlan>> {
    let mut calculators = Vec::with_capacity(template.sheets.len());
    for sheet in &template.sheets {
        validate_no_overlap(&sheet.regions)?;
        calculators.push(PositionCalculator::new(
            sheet.regions.clone(),
            sizes.clone(),
            sheet.template_last_row(),
        ));
    }

    let expansions: HashMap<String, Vec<RepeatExpansion>> = template
        .sheets
        .iter()
        .zip(&calculators)
        .filter(|(_, calc)| !calc.regions().is_empty())
        .map(|(sheet, calc)| (sheet.name.clone(), calc.get_expansions().to_vec()))
        .collect();

    let mut plans = Vec::with_capacity(calculators.len());
    for (sheet, calculator) in template.sheets.iter().zip(calculators) {
        let others: HashMap<String, Vec<RepeatExpansion>> = expansions
            .iter()
            .filter(|(name, _)| **name != sheet.name)
            .map(|(name, exps)| (name.clone(), exps.clone()))
            .collect();

        let mut plan = SheetPlan {
            name: sheet.name.clone(),
            calculator,
            template_last_col: sheet.template_last_col(),
            cells: BTreeMap::new(),
            merged: Vec::new(),
        };
        place::place_cells(&mut plan, sheet, &others, settings)?;
        place::place_placeholders(&mut plan);
        place::place_merges(&mut plan, sheet);

        debug!(
            sheet = %plan.name,
            cells = plan.cells.len(),
            merged = plan.merged.len(),
            rows = plan.total_rows(),
            "planned sheet"
        );
        plans.push(plan);
    }
    Ok(plans)
}
