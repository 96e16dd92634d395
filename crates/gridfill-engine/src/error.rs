//! Error types for the Gridfill engine.

use thiserror::Error;

use crate::engine::{CellArea, CellCoord};

/// A rectangle whose start corner lies below or to the right of its end corner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid area: start {start} is after end {end}")]
pub struct GeometryError {
    pub start: CellCoord,
    pub end: CellCoord,
}

/// Two repeat regions claim the same template cells.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Repeat regions overlap: '{collection_a}' at {area_a} and '{collection_b}' at {area_b}")]
pub struct OverlapError {
    pub collection_a: String,
    pub area_a: CellArea,
    pub collection_b: String,
    pub area_b: CellArea,
}

/// A reference expanded into a discrete cell list that spreadsheet
/// applications refuse to open.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Formula in {sheet}!{cell} expands to {item_count} separate references (max {limit}): {formula}"
)]
pub struct FormulaExpansionError {
    pub sheet: String,
    pub cell: CellCoord,
    pub formula: String,
    pub item_count: usize,
    pub limit: usize,
}

/// Errors that can originate in the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Overlap(#[from] OverlapError),

    #[error(transparent)]
    FormulaExpansion(#[from] FormulaExpansionError),

    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
