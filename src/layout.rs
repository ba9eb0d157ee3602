//! The 3×3 display topology grid.
//!
//! A [`DisplayLayout`] records where each physical display sits relative to
//! the others.  It is produced by [`topology::resolve`](crate::topology::resolve)
//! or loaded verbatim from a locked [`PersistedLayout`], and consumed by the
//! [`RegionSelector`](crate::selector::RegionSelector).

use crate::geometry::DisplayId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the topology grid.
pub const LAYOUT_SIZE: usize = 3;

/// Maximum number of displays that fit in the grid.
pub const LAYOUT_CAPACITY: usize = LAYOUT_SIZE * LAYOUT_SIZE;

/// Coarse arrangement tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    /// One display, stored at cell `[0][0]`.
    #[default]
    Single,
    /// Two displays side by side in row 0, one per hand.
    Dual,
    /// Displays placed by relative position (or the row-major fallback).
    Multi,
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutMode::Single => write!(f, "single"),
            LayoutMode::Dual => write!(f, "dual"),
            LayoutMode::Multi => write!(f, "multi"),
        }
    }
}

/// `grid[row][col]`, each cell empty or naming one display.
pub type LayoutGrid = [[Option<DisplayId>; LAYOUT_SIZE]; LAYOUT_SIZE];

/// Mode plus the 3×3 grid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayLayout {
    pub mode: LayoutMode,
    pub grid: LayoutGrid,
}

impl DisplayLayout {
    pub fn new(mode: LayoutMode, grid: LayoutGrid) -> Self {
        Self { mode, grid }
    }

    /// Display at `(col, row)`, or `None` when empty or out of range.
    pub fn at(&self, col: usize, row: usize) -> Option<DisplayId> {
        self.grid.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Every populated cell as `(col, row, id)`, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, DisplayId)> + '_ {
        self.grid.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(col, id)| id.map(|id| (col, row, id)))
        })
    }

    /// Number of populated cells.
    pub fn len(&self) -> usize {
        self.cells().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Where `id` sits in the grid, as `(col, row)`.
    pub fn position_of(&self, id: DisplayId) -> Option<(usize, usize)> {
        self.cells()
            .find(|&(_, _, cell)| cell == id)
            .map(|(col, row, _)| (col, row))
    }
}

impl fmt::Display for DisplayLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.mode)?;
        for (i, row) in self.grid.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            for (j, cell) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                match cell {
                    Some(id) => write!(f, "{}", id)?,
                    None => write!(f, "_")?,
                }
            }
        }
        write!(f, "]")
    }
}

/// The on-disk form of a layout.
///
/// A locked layout is reused as-is on the next start instead of being
/// resolved from display geometry.
///
/// ```json
/// { "locked": true, "mode": "Multi", "grid": [[null, 3, null], [2, 1, 4], [null, null, null]] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedLayout {
    pub locked: bool,
    pub mode: LayoutMode,
    pub grid: LayoutGrid,
}

impl PersistedLayout {
    /// Wrap a freshly resolved layout (unlocked).
    pub fn unlocked(layout: &DisplayLayout) -> Self {
        Self {
            locked: false,
            mode: layout.mode,
            grid: layout.grid,
        }
    }

    pub fn layout(&self) -> DisplayLayout {
        DisplayLayout::new(self.mode, self.grid)
    }
}
