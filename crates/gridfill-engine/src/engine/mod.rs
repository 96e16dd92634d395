//! Layout engine API.
//!
//! This module maps template coordinates to output coordinates:
//!
//! - [`CellCoord`], [`CellArea`], [`RowRange`], [`ColRange`] - Grid geometry
//! - [`RepeatRegionSpec`], [`ColumnGroup`] - Repeat regions and how they cluster
//! - [`validate_no_overlap`] - Static template validity gate
//! - [`PositionCalculator`] - Region expansion and coordinate mapping
//! - [`extract_collection_sizes`] - Collection sizes from live data

mod area;
mod cell_ref;
mod position;
mod region;

pub use area::{CellArea, ColRange, RowRange};
pub use cell_ref::CellCoord;
pub use position::{
    CollectionSizes, DataSource, PositionCalculator, RepeatExpansion, RowInfo,
    extract_collection_sizes,
};
pub use region::{
    ColumnGroup, Direction, EmptyRange, EmptyRangeContent, RepeatRegionSpec, validate_no_overlap,
};
