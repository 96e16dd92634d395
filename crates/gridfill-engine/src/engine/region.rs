//! Repeat regions and the column groups formed by vertically growing ones.
//!
//! A [`RepeatRegionSpec`] binds one named collection to one template block.
//! DOWN regions whose column spans overlap must grow in lock-step (an item
//! added to the upper one pushes the lower one down), so they are clustered
//! into [`ColumnGroup`]s with a union-find pass. RIGHT regions grow within
//! their own row band and are never grouped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::area::{CellArea, ColRange};
use super::cell_ref::CellCoord;
use crate::error::OverlapError;

/// Growth direction of a repeat region.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// One block per item, stacked below each other.
    #[default]
    Down,
    /// One block per item, side by side.
    Right,
}

/// Placeholder area rendered instead of the block when the collection is empty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmptyRange {
    /// Sheet holding the placeholder; `None` means the region's own sheet.
    pub sheet: Option<String>,
    pub area: CellArea,
}

/// Snapshot of a placeholder's contents, taken upstream.
///
/// Coordinates are relative to the placeholder's top-left cell.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EmptyRangeContent {
    pub cells: BTreeMap<CellCoord, String>,
    pub merged: Vec<CellArea>,
}

/// One collection bound over one template block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepeatRegionSpec {
    pub collection: String,
    pub variable: String,
    pub area: CellArea,
    pub direction: Direction,
    pub empty_range: Option<EmptyRange>,
    pub empty_range_content: Option<EmptyRangeContent>,
}

impl RepeatRegionSpec {
    pub fn new(
        collection: impl Into<String>,
        variable: impl Into<String>,
        area: CellArea,
        direction: Direction,
    ) -> Self {
        Self {
            collection: collection.into(),
            variable: variable.into(),
            area,
            direction,
            empty_range: None,
            empty_range_content: None,
        }
    }

    pub fn with_empty_range(mut self, empty_range: EmptyRange) -> Self {
        self.empty_range = Some(empty_range);
        self
    }

    pub fn with_empty_range_content(mut self, content: EmptyRangeContent) -> Self {
        self.empty_range_content = Some(content);
        self
    }
}

/// Indices of `regions` sorted by template position (row-major on the block's
/// top-left corner).
pub(crate) fn template_order(regions: &[RepeatRegionSpec]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..regions.len()).collect();
    order.sort_by_key(|&i| (regions[i].area.start(), i));
    order
}

/// A cluster of DOWN regions whose column spans overlap, directly or through
/// other members.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnGroup {
    pub group_id: usize,
    /// Union of the members' column spans.
    pub col_range: ColRange,
    /// Indices into the region slice the group was built from, in template order.
    pub members: Vec<usize>,
}

impl ColumnGroup {
    /// Cluster the DOWN regions of `regions`. Groups are numbered in the
    /// template order of their first member.
    pub fn from_regions(regions: &[RepeatRegionSpec]) -> Vec<ColumnGroup> {
        let down: Vec<usize> = template_order(regions)
            .into_iter()
            .filter(|&i| regions[i].direction == Direction::Down)
            .collect();

        let mut sets = DisjointSet::new(regions.len());
        for (pos, &a) in down.iter().enumerate() {
            for &b in &down[pos + 1..] {
                if regions[a].area.col_range().overlaps(&regions[b].area.col_range()) {
                    sets.union(a, b);
                }
            }
        }

        let mut groups: Vec<ColumnGroup> = Vec::new();
        let mut group_of_root: BTreeMap<usize, usize> = BTreeMap::new();
        for &i in &down {
            let root = sets.find(i);
            let cols = regions[i].area.col_range();
            match group_of_root.get(&root) {
                Some(&g) => {
                    let group = &mut groups[g];
                    group.col_range = group.col_range.union(&cols);
                    group.members.push(i);
                }
                None => {
                    group_of_root.insert(root, groups.len());
                    groups.push(ColumnGroup {
                        group_id: groups.len(),
                        col_range: cols,
                        members: vec![i],
                    });
                }
            }
        }
        groups
    }

    /// Borrow the member regions out of the slice the group was built from.
    pub fn regions<'a>(
        &'a self,
        regions: &'a [RepeatRegionSpec],
    ) -> impl Iterator<Item = &'a RepeatRegionSpec> + 'a {
        self.members.iter().filter_map(move |&i| regions.get(i))
    }
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Keep the smaller index as root so roots are stable.
            let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[child] = root;
        }
    }
}

/// Reject templates where two regions claim the same cell.
///
/// Regions that only share columns (stacked DOWN regions) or only share rows
/// are fine.
pub fn validate_no_overlap(regions: &[RepeatRegionSpec]) -> Result<(), OverlapError> {
    for (i, a) in regions.iter().enumerate() {
        for b in &regions[i + 1..] {
            if a.area.intersects(&b.area) {
                return Err(OverlapError {
                    collection_a: a.collection.clone(),
                    area_a: a.area,
                    collection_b: b.collection.clone(),
                    area_b: b.area,
                });
            }
        }
    }
    Ok(())
}
