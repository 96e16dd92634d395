//! Template-to-output coordinate mapping.
//!
//! A [`PositionCalculator`] is built per sheet from the sheet's repeat regions
//! and the size of every bound collection. The first query runs a single
//! expansion pass (see [`PositionCalculator::calculate`]); every later query is
//! a read of that result.
//!
//! Rows grow per [`ColumnGroup`]: a DOWN region pushes down everything below it
//! that shares its group's columns, and nothing else. Columns grow per row
//! band: a RIGHT region pushes right everything to its right on its own rows.

use serde_json::Value;
use std::cell::OnceCell;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

use super::area::{CellArea, ColRange};
use super::cell_ref::CellCoord;
use super::region::{ColumnGroup, Direction, EmptyRange, RepeatRegionSpec, template_order};

/// Number of items per collection name.
pub type CollectionSizes = HashMap<String, usize>;

/// Anything that can report how many items a named collection holds.
pub trait DataSource {
    fn collection_len(&self, name: &str) -> Option<usize>;
}

impl DataSource for Value {
    /// Arrays directly under the object, or reached through a dotted path
    /// (`customer.orders`).
    fn collection_len(&self, name: &str) -> Option<usize> {
        if let Some(items) = self.get(name).and_then(Value::as_array) {
            return Some(items.len());
        }
        let mut current = self;
        for part in name.split('.') {
            current = current.as_object()?.get(part)?;
        }
        current.as_array().map(Vec::len)
    }
}

impl<T> DataSource for HashMap<String, Vec<T>> {
    fn collection_len(&self, name: &str) -> Option<usize> {
        self.get(name).map(Vec::len)
    }
}

impl<T> DataSource for BTreeMap<String, Vec<T>> {
    fn collection_len(&self, name: &str) -> Option<usize> {
        self.get(name).map(Vec::len)
    }
}

/// Size of every collection bound by `regions`. Collections missing from
/// `data` (or not sized) count as empty.
pub fn extract_collection_sizes<D: DataSource + ?Sized>(
    data: &D,
    regions: &[RepeatRegionSpec],
) -> CollectionSizes {
    regions
        .iter()
        .map(|region| {
            let len = data.collection_len(&region.collection).unwrap_or(0);
            (region.collection.clone(), len)
        })
        .collect()
}

/// Computed growth of one repeat region.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepeatExpansion {
    /// Index of the region in [`PositionCalculator::regions`].
    pub region_index: usize,
    pub collection: String,
    /// Template block.
    pub area: CellArea,
    pub direction: Direction,
    /// Items in the bound collection; may be 0.
    pub item_count: usize,
    /// Rows added beyond the template block.
    pub row_expansion: usize,
    /// Columns added beyond the template block.
    pub col_expansion: usize,
    /// Template row plus the largest shift of the group members that end
    /// above it (stacked members accumulate, side-by-side ones do not add).
    pub final_start_row: usize,
    pub final_start_col: usize,
    /// Placeholder, when one is declared.
    pub empty_range: Option<EmptyRange>,
}

impl RepeatExpansion {
    /// Block instances written to the output. An empty collection still
    /// occupies one block.
    pub fn rendered_items(&self) -> usize {
        self.item_count.max(1)
    }

    /// The reserved block is filled from the placeholder rather than a blank item.
    pub fn uses_empty_range(&self) -> bool {
        self.item_count == 0 && self.empty_range.is_some()
    }

    pub fn final_start(&self) -> CellCoord {
        CellCoord::new(self.final_start_row, self.final_start_col)
    }

    /// Output area covered by every rendered item.
    pub fn final_area(&self) -> CellArea {
        let end = CellCoord::new(
            self.final_start_row + self.area.row_count() + self.row_expansion - 1,
            self.final_start_col + self.area.col_count() + self.col_expansion - 1,
        );
        CellArea::spanning(self.final_start(), end)
    }
}

/// What a writer should emit at a given output row of a given column.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RowInfo {
    /// Template row outside every repeat block.
    Static { template_row: usize },
    /// Row `template_offset` of the block for item `item_index`. `expansion`
    /// indexes [`PositionCalculator::get_expansions`]. RIGHT regions carry all
    /// their items on every row, so `item_index` is always 0 for them.
    Repeat {
        expansion: usize,
        item_index: usize,
        template_offset: usize,
    },
    /// Row `template_offset` of an empty collection's placeholder.
    EmptyRange {
        expansion: usize,
        template_offset: usize,
    },
    /// Row opened up by a neighbouring region's growth; nothing to write.
    Blank,
}

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
struct RegionKey {
    collection: String,
    row: usize,
    col: usize,
}

#[derive(Debug)]
struct GroupLayout {
    col_range: ColRange,
    /// Expansion indices, template order.
    members: Vec<usize>,
    /// `(template end row, shift below it)`, sorted by end row, shifts
    /// non-decreasing.
    steps: Vec<(usize, usize)>,
}

impl GroupLayout {
    /// Rows added above template row `row` within this group's columns.
    fn shift_above(&self, row: usize) -> usize {
        let n = self.steps.partition_point(|&(end, _)| end < row);
        n.checked_sub(1).map_or(0, |last| self.steps[last].1)
    }

    fn total_shift(&self) -> usize {
        self.steps.last().map_or(0, |&(_, shift)| shift)
    }
}

#[derive(Debug)]
struct Layout {
    expansions: Vec<RepeatExpansion>,
    by_position: HashMap<RegionKey, usize>,
    by_name: HashMap<String, usize>,
    groups: Vec<GroupLayout>,
    /// Group column spans are disjoint, so the first column identifies a group.
    group_by_start_col: BTreeMap<usize, usize>,
    total_rows: usize,
}

impl Layout {
    fn group_for_col(&self, col: usize) -> Option<&GroupLayout> {
        let (_, &g) = self.group_by_start_col.range(..=col).next_back()?;
        let group = &self.groups[g];
        group.col_range.contains(col).then_some(group)
    }

    fn row_shift(&self, row: usize, col: usize) -> usize {
        self.group_for_col(col).map_or(0, |g| g.shift_above(row))
    }

    fn col_shift(&self, row: usize, col: usize) -> usize {
        self.expansions
            .iter()
            .filter(|e| {
                e.direction == Direction::Right
                    && e.area.row_range().contains(row)
                    && e.area.end().col < col
            })
            .map(|e| e.col_expansion)
            .sum()
    }

    fn expansion_at(&self, coord: CellCoord) -> Option<(usize, &RepeatExpansion)> {
        self.expansions
            .iter()
            .enumerate()
            .find(|(_, e)| e.area.contains(coord))
    }

    /// Row info for a template row already known not to fall in a DOWN block.
    fn static_or_right(&self, template_row: usize, col: usize) -> RowInfo {
        let right = self.expansions.iter().enumerate().find(|(_, e)| {
            e.direction == Direction::Right
                && e.area.row_range().contains(template_row)
                && e.area.col_range().contains(col)
        });
        match right {
            Some((expansion, e)) => {
                let template_offset = template_row - e.area.start().row;
                if e.uses_empty_range() {
                    RowInfo::EmptyRange {
                        expansion,
                        template_offset,
                    }
                } else {
                    RowInfo::Repeat {
                        expansion,
                        item_index: 0,
                        template_offset,
                    }
                }
            }
            None => RowInfo::Static { template_row },
        }
    }
}

/// Maps template coordinates of one sheet to output coordinates.
pub struct PositionCalculator {
    regions: Vec<RepeatRegionSpec>,
    sizes: CollectionSizes,
    template_last_row: usize,
    layout: OnceCell<Layout>,
}

impl PositionCalculator {
    /// `template_last_row` is the last used (0-based) row of the template; it
    /// only affects [`get_total_rows`](Self::get_total_rows).
    pub fn new(
        regions: Vec<RepeatRegionSpec>,
        sizes: CollectionSizes,
        template_last_row: usize,
    ) -> Self {
        Self {
            regions,
            sizes,
            template_last_row,
            layout: OnceCell::new(),
        }
    }

    pub fn regions(&self) -> &[RepeatRegionSpec] {
        &self.regions
    }

    /// Run the expansion pass. Queries call this implicitly; repeated calls
    /// return the same result.
    pub fn calculate(&self) -> &[RepeatExpansion] {
        &self.layout().expansions
    }

    fn layout(&self) -> &Layout {
        self.layout.get_or_init(|| self.compute())
    }

    fn compute(&self) -> Layout {
        let mut expansions = Vec::with_capacity(self.regions.len());
        let mut expansion_of_region = vec![0usize; self.regions.len()];

        for i in template_order(&self.regions) {
            let region = &self.regions[i];
            let item_count = self.sizes.get(&region.collection).copied().unwrap_or(0);
            let extra_items = item_count.max(1) - 1;
            let (row_expansion, col_expansion) = match region.direction {
                Direction::Down => (extra_items * region.area.row_count(), 0),
                Direction::Right => (0, extra_items * region.area.col_count()),
            };
            expansion_of_region[i] = expansions.len();
            expansions.push(RepeatExpansion {
                region_index: i,
                collection: region.collection.clone(),
                area: region.area,
                direction: region.direction,
                item_count,
                row_expansion,
                col_expansion,
                final_start_row: region.area.start().row,
                final_start_col: region.area.start().col,
                empty_range: region.empty_range.clone(),
            });
        }

        let mut groups = Vec::new();
        for group in ColumnGroup::from_regions(&self.regions) {
            trace!(
                cols = ?group.col_range,
                collections = ?group
                    .regions(&self.regions)
                    .map(|r| r.collection.as_str())
                    .collect::<Vec<_>>(),
                "column group"
            );
            let members: Vec<usize> = group
                .members
                .iter()
                .map(|&i| expansion_of_region[i])
                .collect();

            // Everything strictly above a member pushes it down. Side-by-side
            // members above it push it by the larger of their growths.
            let mut steps: Vec<(usize, usize)> = Vec::with_capacity(members.len());
            for &m in &members {
                let exp = &mut expansions[m];
                let start = exp.area.start().row;
                let offset = steps
                    .iter()
                    .filter(|&&(end, _)| end < start)
                    .map(|&(_, shift)| shift)
                    .max()
                    .unwrap_or(0);
                exp.final_start_row = start + offset;
                steps.push((exp.area.end().row, offset + exp.row_expansion));
            }
            steps.sort_by_key(|&(end, _)| end);
            let mut running = 0;
            for step in &mut steps {
                running = running.max(step.1);
                step.1 = running;
            }

            groups.push(GroupLayout {
                col_range: group.col_range,
                members,
                steps,
            });
        }

        for exp in expansions
            .iter_mut()
            .filter(|e| e.direction == Direction::Right)
        {
            let start = exp.area.start().row;
            let cols = exp.area.col_range();
            exp.final_start_row = start
                + groups
                    .iter()
                    .filter(|g| g.col_range.overlaps(&cols))
                    .map(|g| g.shift_above(start))
                    .max()
                    .unwrap_or(0);
        }

        let col_offsets: Vec<usize> = expansions
            .iter()
            .map(|exp| {
                expansions
                    .iter()
                    .filter(|other| {
                        other.direction == Direction::Right
                            && other.area.row_range().overlaps(&exp.area.row_range())
                            && other.area.end().col < exp.area.start().col
                    })
                    .map(|other| other.col_expansion)
                    .sum()
            })
            .collect();
        for (exp, offset) in expansions.iter_mut().zip(col_offsets) {
            exp.final_start_col += offset;
        }

        let mut by_position = HashMap::with_capacity(expansions.len());
        let mut by_name = HashMap::new();
        for (idx, exp) in expansions.iter().enumerate() {
            let start = exp.area.start();
            by_position.insert(
                RegionKey {
                    collection: exp.collection.clone(),
                    row: start.row,
                    col: start.col,
                },
                idx,
            );
            by_name.entry(exp.collection.clone()).or_insert(idx);
            trace!(
                collection = %exp.collection,
                area = %exp.area,
                items = exp.item_count,
                rows_added = exp.row_expansion,
                cols_added = exp.col_expansion,
                final_start = %exp.final_start(),
                "region expanded"
            );
        }

        let group_by_start_col = groups
            .iter()
            .enumerate()
            .map(|(g, group)| (group.col_range.start, g))
            .collect();

        let last_row = expansions
            .iter()
            .map(|e| e.area.end().row)
            .fold(self.template_last_row, usize::max);
        let max_shift = groups
            .iter()
            .map(GroupLayout::total_shift)
            .max()
            .unwrap_or(0);
        let total_rows = last_row + 1 + max_shift;

        debug!(
            regions = expansions.len(),
            groups = groups.len(),
            total_rows,
            "calculated sheet layout"
        );

        Layout {
            expansions,
            by_position,
            by_name,
            groups,
            group_by_start_col,
            total_rows,
        }
    }

    /// Expansion of the region bound to `collection` whose block starts at
    /// the given template position.
    pub fn get_expansion_for_region(
        &self,
        collection: &str,
        start_row: usize,
        start_col: usize,
    ) -> Option<&RepeatExpansion> {
        let layout = self.layout();
        let key = RegionKey {
            collection: collection.to_string(),
            row: start_row,
            col: start_col,
        };
        layout.by_position.get(&key).map(|&i| &layout.expansions[i])
    }

    /// First expansion (template order) bound to `collection`.
    pub fn get_expansion_for(&self, collection: &str) -> Option<&RepeatExpansion> {
        let layout = self.layout();
        layout.by_name.get(collection).map(|&i| &layout.expansions[i])
    }

    /// All expansions in template order.
    pub fn get_expansions(&self) -> &[RepeatExpansion] {
        self.calculate()
    }

    /// The expansion whose template block contains `coord`, with its index.
    pub fn expansion_at(&self, coord: CellCoord) -> Option<(usize, &RepeatExpansion)> {
        self.layout().expansion_at(coord)
    }

    /// Output position of a template coordinate. Cells inside a block map to
    /// the first item's copy.
    pub fn get_final_position(&self, coord: CellCoord) -> CellCoord {
        let layout = self.layout();
        if let Some((_, exp)) = layout.expansion_at(coord) {
            let start = exp.area.start();
            return CellCoord::new(
                exp.final_start_row + (coord.row - start.row),
                exp.final_start_col + (coord.col - start.col),
            );
        }
        CellCoord::new(
            coord.row + layout.row_shift(coord.row, coord.col),
            coord.col + layout.col_shift(coord.row, coord.col),
        )
    }

    /// Output area of a template rectangle; each corner is mapped on its own.
    pub fn get_final_range(&self, start: CellCoord, end: CellCoord) -> CellArea {
        CellArea::spanning(self.get_final_position(start), self.get_final_position(end))
    }

    /// Output row of row `template_row_offset` of item `item_index`.
    pub fn get_row_for_repeat_item(
        &self,
        expansion: &RepeatExpansion,
        item_index: usize,
        template_row_offset: usize,
    ) -> usize {
        match expansion.direction {
            Direction::Down => {
                expansion.final_start_row
                    + item_index * expansion.area.row_count()
                    + template_row_offset
            }
            Direction::Right => expansion.final_start_row + template_row_offset,
        }
    }

    /// Output column of column `template_col_offset` of item `item_index`.
    pub fn get_col_for_repeat_item(
        &self,
        expansion: &RepeatExpansion,
        item_index: usize,
        template_col_offset: usize,
    ) -> usize {
        match expansion.direction {
            Direction::Right => {
                expansion.final_start_col
                    + item_index * expansion.area.col_count()
                    + template_col_offset
            }
            Direction::Down => expansion.final_start_col + template_col_offset,
        }
    }

    /// Rows in the output sheet.
    pub fn get_total_rows(&self) -> usize {
        self.layout().total_rows
    }

    /// True when the template cell lies inside a same-sheet placeholder whose
    /// collection has no items.
    pub fn is_in_empty_range(&self, template_row: usize, col: usize) -> bool {
        let cell = CellCoord::new(template_row, col);
        self.layout().expansions.iter().any(|exp| {
            exp.item_count == 0
                && exp
                    .empty_range
                    .as_ref()
                    .is_some_and(|e| e.sheet.is_none() && e.area.contains(cell))
        })
    }

    /// Reverse lookup: which template content belongs at output row
    /// `actual_row` of template column `col`.
    pub fn get_row_info_for_column(&self, actual_row: usize, col: usize) -> RowInfo {
        let layout = self.layout();
        let Some(group) = layout.group_for_col(col) else {
            return layout.static_or_right(actual_row, col);
        };

        for &m in &group.members {
            let exp = &layout.expansions[m];
            if !exp.area.col_range().contains(col) {
                continue;
            }
            let block_rows = exp.area.row_count();
            let start = exp.final_start_row;
            if actual_row < start || actual_row >= start + block_rows * exp.rendered_items() {
                continue;
            }
            let offset = actual_row - start;
            if exp.uses_empty_range() {
                return RowInfo::EmptyRange {
                    expansion: m,
                    template_offset: offset,
                };
            }
            return RowInfo::Repeat {
                expansion: m,
                item_index: offset / block_rows,
                template_offset: offset % block_rows,
            };
        }

        // row -> row + shift is strictly increasing; find the last template
        // row that lands at or before `actual_row`.
        let (mut lo, mut hi) = (0usize, actual_row + 1);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if mid + group.shift_above(mid) <= actual_row {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        let template_row = lo.saturating_sub(1);
        if template_row + group.shift_above(template_row) == actual_row {
            layout.static_or_right(template_row, col)
        } else {
            RowInfo::Blank
        }
    }
}
