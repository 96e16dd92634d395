//! gridfill_engine - Repeat-region layout expansion and formula reference rewriting.

pub mod engine;
pub mod error;
pub mod formula;

pub use error::{EngineError, FormulaExpansionError, GeometryError, OverlapError, Result};
