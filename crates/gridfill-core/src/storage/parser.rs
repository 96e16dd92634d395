//! Parsers for template (.toml) and data (.json) files

use crate::error::{GridfillError, Result};
use crate::template::{CellContent, Template, TemplateSheet};
use gridfill_engine::engine::{
    CellArea, CellCoord, Direction, EmptyRange, EmptyRangeContent, RepeatRegionSpec,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateFile {
    #[serde(default)]
    sheets: Vec<SheetFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SheetFile {
    name: String,
    /// 1-based, as written in A1 notation.
    last_row: Option<usize>,
    #[serde(default)]
    cells: BTreeMap<String, String>,
    #[serde(default)]
    merged: Vec<CellArea>,
    #[serde(default)]
    regions: Vec<RegionFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegionFile {
    collection: String,
    variable: String,
    area: CellArea,
    #[serde(default)]
    direction: Direction,
    empty_range: Option<String>,
}

/// Parse a template file
pub fn parse_template(path: &Path) -> Result<Template> {
    let content = fs::read_to_string(path)?;
    parse_template_content(&content)
}

/// Parse template content from a string
pub fn parse_template_content(content: &str) -> Result<Template> {
    let file: TemplateFile = toml::from_str(content)?;

    let mut sheets = Vec::with_capacity(file.sheets.len());
    for raw in file.sheets {
        if sheets.iter().any(|s: &TemplateSheet| s.name == raw.name) {
            return Err(GridfillError::Parse {
                what: "template".to_string(),
                message: format!("Duplicate sheet name: {}", raw.name),
            });
        }
        sheets.push(parse_sheet(raw)?);
    }

    let mut template = Template { sheets };
    snapshot_placeholders(&mut template)?;
    debug!(sheets = template.sheets.len(), "parsed template");
    Ok(template)
}

fn parse_sheet(raw: SheetFile) -> Result<TemplateSheet> {
    let mut sheet = TemplateSheet::new(raw.name);
    sheet.last_row = match raw.last_row {
        Some(0) => {
            return Err(GridfillError::Parse {
                what: "last_row".to_string(),
                message: format!("Rows start at 1 (sheet {})", sheet.name),
            });
        }
        other => other.map(|row| row - 1),
    };

    for (address, value) in raw.cells {
        let coord = CellCoord::from_a1(&address).ok_or_else(|| GridfillError::Parse {
            what: "cell reference".to_string(),
            message: format!("{} (sheet {})", address, sheet.name),
        })?;
        sheet.cells.insert(coord, CellContent::from_raw(&value));
    }
    sheet.merged = raw.merged;

    for region in raw.regions {
        if region.collection.trim().is_empty() {
            return Err(GridfillError::Parse {
                what: "region".to_string(),
                message: format!("Region at {} has no collection", region.area),
            });
        }
        let mut spec = RepeatRegionSpec::new(
            region.collection,
            region.variable,
            region.area,
            region.direction,
        );
        if let Some(text) = region.empty_range {
            let mut placeholder = parse_empty_range(&text)?;
            if placeholder.sheet.as_deref() == Some(sheet.name.as_str()) {
                placeholder.sheet = None;
            }
            spec = spec.with_empty_range(placeholder);
        }
        sheet.regions.push(spec);
    }
    Ok(sheet)
}

/// Parse a placeholder reference: `A1:B2`, `Sheet!A1:B2` or `'My Sheet'!A1:B2`.
pub fn parse_empty_range(text: &str) -> Result<EmptyRange> {
    let invalid = || GridfillError::Parse {
        what: "empty range".to_string(),
        message: text.to_string(),
    };
    let (sheet, area) = match text.trim().rsplit_once('!') {
        Some((sheet, area)) => {
            let sheet = match sheet.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
                Some(quoted) => quoted.replace("''", "'"),
                None => sheet.to_string(),
            };
            if sheet.is_empty() {
                return Err(invalid());
            }
            (Some(sheet), area)
        }
        None => (None, text.trim()),
    };
    let area = CellArea::from_a1(area).ok_or_else(invalid)?;
    Ok(EmptyRange { sheet, area })
}

/// Copy each placeholder's cells and merges into its region, relative to the
/// placeholder's top-left cell.
fn snapshot_placeholders(template: &mut Template) -> Result<()> {
    let mut snapshots: Vec<(usize, usize, EmptyRangeContent)> = Vec::new();
    for (s, sheet) in template.sheets.iter().enumerate() {
        for (r, region) in sheet.regions.iter().enumerate() {
            let Some(placeholder) = &region.empty_range else {
                continue;
            };
            let source_name = placeholder.sheet.as_deref().unwrap_or(&sheet.name);
            let source = template
                .sheet(source_name)
                .ok_or_else(|| GridfillError::Parse {
                    what: "empty range".to_string(),
                    message: format!(
                        "Unknown sheet '{}' for collection {}",
                        source_name, region.collection
                    ),
                })?;
            snapshots.push((s, r, snapshot(source, placeholder.area)));
        }
    }
    for (s, r, content) in snapshots {
        template.sheets[s].regions[r].empty_range_content = Some(content);
    }
    Ok(())
}

fn snapshot(source: &TemplateSheet, area: CellArea) -> EmptyRangeContent {
    let origin = area.start();
    let relative = |c: CellCoord| CellCoord::new(c.row - origin.row, c.col - origin.col);
    EmptyRangeContent {
        cells: source
            .cells
            .iter()
            .filter(|(coord, _)| area.contains(**coord))
            .map(|(coord, content)| (relative(*coord), content.as_str().to_string()))
            .collect(),
        merged: source
            .merged
            .iter()
            .filter(|m| area.contains(m.start()) && area.contains(m.end()))
            .map(|m| CellArea::spanning(relative(m.start()), relative(m.end())))
            .collect(),
    }
}

/// Parse a data file
pub fn parse_data(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    parse_data_content(&content)
}

/// Parse data from a string. The top level must be an object whose array
/// members are the collections.
pub fn parse_data_content(content: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(content)?;
    if !value.is_object() {
        return Err(GridfillError::Parse {
            what: "data".to_string(),
            message: "Expected a JSON object at the top level".to_string(),
        });
    }
    Ok(value)
}
