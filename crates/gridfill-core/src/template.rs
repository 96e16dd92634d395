//! In-memory template model.

use std::collections::BTreeMap;
use std::fmt;

use gridfill_engine::engine::{CellArea, CellCoord, RepeatRegionSpec};

/// Content of one template cell.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CellContent {
    /// Text copied as written.
    Literal(String),
    /// Formula text including its leading `=`.
    Formula(String),
}

impl CellContent {
    /// Classify raw cell text: a leading `=` marks a formula.
    pub fn from_raw(raw: &str) -> Self {
        if raw.starts_with('=') {
            CellContent::Formula(raw.to_string())
        } else {
            CellContent::Literal(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CellContent::Literal(s) | CellContent::Formula(s) => s,
        }
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, CellContent::Formula(_))
    }
}

impl fmt::Display for CellContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One template sheet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TemplateSheet {
    pub name: String,
    /// Last used row (0-based), when declared explicitly.
    pub last_row: Option<usize>,
    pub cells: BTreeMap<CellCoord, CellContent>,
    pub merged: Vec<CellArea>,
    pub regions: Vec<RepeatRegionSpec>,
}

impl TemplateSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Last used row: the declared one, else the lowest row touched by a
    /// cell, merge or region.
    pub fn template_last_row(&self) -> usize {
        if let Some(row) = self.last_row {
            return row;
        }
        let cells = self.cells.keys().map(|c| c.row);
        let merged = self.merged.iter().map(|a| a.end().row);
        let regions = self.regions.iter().map(|r| r.area.end().row);
        cells.chain(merged).chain(regions).max().unwrap_or(0)
    }

    /// Rightmost template column touched by a cell, merge or region.
    pub fn template_last_col(&self) -> usize {
        let cells = self.cells.keys().map(|c| c.col);
        let merged = self.merged.iter().map(|a| a.end().col);
        let regions = self.regions.iter().map(|r| r.area.end().col);
        cells.chain(merged).chain(regions).max().unwrap_or(0)
    }
}

/// A parsed template workbook.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Template {
    pub sheets: Vec<TemplateSheet>,
}

impl Template {
    pub fn sheet(&self, name: &str) -> Option<&TemplateSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Every repeat region of every sheet.
    pub fn regions(&self) -> impl Iterator<Item = &RepeatRegionSpec> {
        self.sheets.iter().flat_map(|s| s.regions.iter())
    }
}
