//! Rectangular areas and the row/column spans they cover.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::cell_ref::CellCoord;
use crate::error::{EngineError, GeometryError};

macro_rules! line_range {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            pub start: usize,
            pub end: usize,
        }

        impl $name {
            /// Build an inclusive span, swapping the bounds if given out of order.
            pub fn new(a: usize, b: usize) -> Self {
                Self {
                    start: a.min(b),
                    end: a.max(b),
                }
            }

            pub fn contains(&self, index: usize) -> bool {
                self.start <= index && index <= self.end
            }

            pub fn overlaps(&self, other: &Self) -> bool {
                self.start <= other.end && other.start <= self.end
            }

            /// Smallest span covering both.
            pub fn union(&self, other: &Self) -> Self {
                Self {
                    start: self.start.min(other.start),
                    end: self.end.max(other.end),
                }
            }

            /// Number of indices covered; never zero.
            pub fn count(&self) -> usize {
                self.end - self.start + 1
            }

            pub fn iter(&self) -> std::ops::RangeInclusive<usize> {
                self.start..=self.end
            }
        }

        impl IntoIterator for $name {
            type Item = usize;
            type IntoIter = std::ops::RangeInclusive<usize>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }
    };
}

line_range!(
    /// Inclusive span of row indices.
    RowRange
);
line_range!(
    /// Inclusive span of column indices.
    ColRange
);

/// A rectangle of cells; one template block when attached to a repeat region.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellArea {
    start: CellCoord,
    end: CellCoord,
}

impl CellArea {
    /// Build an area from its top-left and bottom-right corners.
    pub fn new(start: CellCoord, end: CellCoord) -> Result<Self, GeometryError> {
        if start.row > end.row || start.col > end.col {
            return Err(GeometryError { start, end });
        }
        Ok(Self { start, end })
    }

    /// An area covering exactly one cell.
    pub fn single(cell: CellCoord) -> Self {
        Self {
            start: cell,
            end: cell,
        }
    }

    /// Smallest area covering both corners, in whatever order they are given.
    pub fn spanning(a: CellCoord, b: CellCoord) -> Self {
        Self {
            start: CellCoord::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellCoord::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Parse `A2:C3` (or a bare `A2`). `$` markers are ignored.
    pub fn from_a1(text: &str) -> Option<Self> {
        match text.split_once(':') {
            Some((a, b)) => Self::new(CellCoord::from_a1(a)?, CellCoord::from_a1(b)?).ok(),
            None => CellCoord::from_a1(text).map(Self::single),
        }
    }

    pub fn start(&self) -> CellCoord {
        self.start
    }

    pub fn end(&self) -> CellCoord {
        self.end
    }

    pub fn row_range(&self) -> RowRange {
        RowRange::new(self.start.row, self.end.row)
    }

    pub fn col_range(&self) -> ColRange {
        ColRange::new(self.start.col, self.end.col)
    }

    pub fn row_count(&self) -> usize {
        self.end.row - self.start.row + 1
    }

    pub fn col_count(&self) -> usize {
        self.end.col - self.start.col + 1
    }

    pub fn contains(&self, cell: CellCoord) -> bool {
        self.row_range().contains(cell.row) && self.col_range().contains(cell.col)
    }

    /// True when the two areas share at least one cell.
    pub fn intersects(&self, other: &CellArea) -> bool {
        self.row_range().overlaps(&other.row_range())
            && self.col_range().overlaps(&other.col_range())
    }

    /// Every cell of the area, row-major.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.row_range()
            .iter()
            .flat_map(move |row| self.col_range().iter().map(move |col| CellCoord::new(row, col)))
    }
}

impl fmt::Display for CellArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl TryFrom<String> for CellArea {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_a1(&value).ok_or(EngineError::InvalidReference(value))
    }
}

impl From<CellArea> for String {
    fn from(area: CellArea) -> String {
        area.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_inverted_corners() {
        let err = CellArea::new(CellCoord::new(3, 0), CellCoord::new(1, 0)).unwrap_err();
        assert_eq!(err.start, CellCoord::new(3, 0));

        assert!(CellArea::new(CellCoord::new(0, 2), CellCoord::new(0, 1)).is_err());
        assert!(CellArea::new(CellCoord::new(1, 1), CellCoord::new(1, 1)).is_ok());
    }

    #[test]
    fn test_counts_and_ranges() {
        let area = CellArea::from_a1("B2:D6").unwrap();
        assert_eq!(area.row_count(), 5);
        assert_eq!(area.col_count(), 3);
        assert_eq!(area.row_range(), RowRange::new(1, 5));
        assert_eq!(area.col_range(), ColRange::new(1, 3));
        assert_eq!(area.to_string(), "B2:D6");
    }

    #[test]
    fn test_ranges_are_inclusive() {
        let rows = RowRange::new(2, 4);
        assert!(rows.contains(2));
        assert!(rows.contains(4));
        assert!(!rows.contains(5));
        assert_eq!(rows.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(rows.count(), 3);
    }

    #[test]
    fn test_overlap_and_union() {
        let a = ColRange::new(1, 3);
        let b = ColRange::new(3, 6);
        let c = ColRange::new(7, 8);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert_eq!(a.union(&c), ColRange::new(1, 8));
    }

    #[test]
    fn test_intersects_needs_both_axes() {
        let a = CellArea::from_a1("A1:B2").unwrap();
        let same_cols = CellArea::from_a1("A5:B6").unwrap();
        let touching = CellArea::from_a1("B2:C3").unwrap();
        assert!(!a.intersects(&same_cols));
        assert!(a.intersects(&touching));
    }

    #[test]
    fn test_cells_row_major() {
        let area = CellArea::from_a1("A1:B2").unwrap();
        let cells: Vec<String> = area.cells().map(|c| c.to_string()).collect();
        assert_eq!(cells, vec!["A1", "B1", "A2", "B2"]);
    }
}
