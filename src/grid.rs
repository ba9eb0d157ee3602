//! Selectable tile grids.
//!
//! An [`OptionGrid`] maps tile coordinates `(col, row)` to the
//! [`SelectionRegion`] that picking the tile would narrow to.  It is always
//! 3 rows by 6 columns; each hand owns a 3-column block, and a
//! [`ColumnSpan`] decides which columns a given region is laid out into.

use crate::command::Hand;
use crate::config::HandsConfig;
use crate::geometry::{DisplayDescriptor, DisplayId, Rect};
use std::ops::Range;

/// Rows in every option grid.
pub const GRID_ROWS: usize = 3;
/// Columns covered by both hands together.
pub const GRID_COLS: usize = 6;
/// Columns owned by one hand.
pub const HAND_COLS: usize = 3;

/// The area the next grid will subdivide.
///
/// `selection` is relative to the display origin; it always lies inside
/// `display_bounds.at_origin()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRegion {
    pub display: DisplayId,
    pub display_bounds: Rect,
    pub selection: Rect,
}

impl SelectionRegion {
    /// A region covering all of `display`.
    pub fn whole_display(display: &DisplayDescriptor) -> Self {
        Self {
            display: display.id,
            display_bounds: display.bounds,
            selection: display.bounds.at_origin(),
        }
    }

    /// Centre of the selection in virtual-desktop coordinates.
    pub fn absolute_center(&self) -> (f64, f64) {
        let (ox, oy) = self.display_bounds.origin();
        let (cx, cy) = self.selection.center();
        (ox + cx, oy + cy)
    }
}

/// Which grid columns a region is laid out into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub offset: usize,
    pub width: usize,
}

impl ColumnSpan {
    pub const LEFT: Self = Self {
        offset: 0,
        width: HAND_COLS,
    };
    pub const RIGHT: Self = Self {
        offset: HAND_COLS,
        width: HAND_COLS,
    };
    pub const BOTH: Self = Self {
        offset: 0,
        width: GRID_COLS,
    };

    /// The 3-column block owned by `hand`.
    pub fn for_hand(hand: Hand) -> Self {
        match hand {
            Hand::Left => Self::LEFT,
            Hand::Right => Self::RIGHT,
        }
    }

    /// The block of the only enabled hand, or the primary hand's block when
    /// both (or neither) are enabled.
    pub fn single_hand(hands: &HandsConfig) -> Self {
        match (hands.left.enabled, hands.right.enabled) {
            (true, false) => Self::LEFT,
            (false, true) => Self::RIGHT,
            _ => Self::for_hand(hands.primary()),
        }
    }

    /// Pick the span for narrowing `selection`.
    ///
    /// With both hands available the region is split across six columns
    /// when halving its width brings the aspect ratio closer to square.
    pub fn choose(hands: &HandsConfig, selection: &Rect) -> Self {
        match (hands.left.enabled, hands.right.enabled) {
            (true, false) => Self::LEFT,
            (false, true) => Self::RIGHT,
            _ => {
                let whole = (1.0 - selection.width / selection.height).abs();
                let halves = (1.0 - (selection.width / 2.0) / selection.height).abs();
                if halves < whole {
                    Self::BOTH
                } else {
                    Self::for_hand(hands.primary())
                }
            }
        }
    }

    pub fn is_two_handed(&self) -> bool {
        self.width == GRID_COLS
    }

    pub fn columns(&self) -> Range<usize> {
        self.offset..self.offset + self.width
    }
}

/// A 3×6 map from tile coordinate to selectable region.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionGrid {
    tiles: [[Option<SelectionRegion>; GRID_COLS]; GRID_ROWS],
}

impl OptionGrid {
    /// An empty grid (no tiles).
    pub fn new() -> Self {
        Self::default()
    }

    /// Partition `region.selection` into `3 × span.width` equal tiles
    /// placed at columns `span.columns()`.  Other columns are untouched, so
    /// two regions can share one grid.
    pub fn subdivide(&mut self, region: &SelectionRegion, span: ColumnSpan) {
        let sel = region.selection;
        let w = span.width as f64;
        let h = GRID_ROWS as f64;
        for row in 0..GRID_ROWS {
            for col in span.columns() {
                let c = (col - span.offset) as f64;
                let r = row as f64;
                self.tiles[row][col] = Some(SelectionRegion {
                    selection: Rect::new(
                        sel.x + sel.width * c / w,
                        sel.y + sel.height * r / h,
                        sel.width / w,
                        sel.height / h,
                    ),
                    ..*region
                });
            }
        }
    }

    /// A fresh grid holding only the subdivision of `region`.
    pub fn subdivided(region: &SelectionRegion, span: ColumnSpan) -> Self {
        let mut grid = Self::new();
        grid.subdivide(region, span);
        grid
    }

    /// Place a single tile.  Out-of-range coordinates are ignored.
    pub fn set(&mut self, col: usize, row: usize, region: SelectionRegion) {
        if let Some(cell) = self.tiles.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = Some(region);
        }
    }

    /// The tile at `(col, row)`, or `None` when unpopulated or out of range.
    pub fn get(&self, col: usize, row: usize) -> Option<&SelectionRegion> {
        self.tiles.get(row).and_then(|r| r.get(col)).and_then(Option::as_ref)
    }

    /// Every populated tile as `(col, row, region)`, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, &SelectionRegion)> + '_ {
        self.tiles.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(col, t)| t.as_ref().map(|t| (col, row, t)))
        })
    }

    pub fn len(&self) -> usize {
        self.tiles().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//  Tests
