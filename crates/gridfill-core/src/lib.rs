//! gridfill-core - Template model, render planning and preview storage.

pub mod error;
pub mod plan;
pub mod settings;
pub mod storage;
pub mod template;

pub use error::{GridfillError, Result};
pub use plan::{SheetPlan, plan_workbook, sizes_from_data};
pub use settings::Settings;
pub use template::{CellContent, Template, TemplateSheet};

pub use gridfill_engine::engine::CellCoord;
