//! Display topology resolution.
//!
//! Turns an unordered list of display rectangles into a [`DisplayLayout`]:
//! a 3×3 grid describing which display sits left of, right of, above or
//! below the primary.
//!
//! The adjacency test only looks for *flush or separated* edges.  A display
//! that overlaps the primary along an axis gets offset `0` on that axis, so
//! two unrelated displays can land in the same cell.  When that happens the
//! whole layout falls back to the row-major "dump" arrangement.  Existing
//! persisted layouts depend on this exact behaviour.

use crate::command::Hand;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::geometry::{DisplayDescriptor, Rect};
use crate::layout::{DisplayLayout, LayoutGrid, LayoutMode, LAYOUT_CAPACITY, LAYOUT_SIZE};
use log::{debug, info, warn};

/// Number of non-primary displays at which directional placement is not
/// even attempted.
const DUMP_THRESHOLD: usize = LAYOUT_CAPACITY - 1;

/// Knobs that influence resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveOptions {
    /// With exactly two displays, give each hand its own display
    /// ([`LayoutMode::Dual`]) instead of placing them by position.
    pub two_handed_split: bool,
    /// Which hand drives the primary display in dual mode.
    pub primary_hand: Hand,
}

/// Result of [`resolve`]: always a usable layout, plus anything worth
/// telling the user about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub layout: DisplayLayout,
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolve the topology of `displays` around `primary`.
///
/// `displays` may or may not include the primary; it is filtered out by id
/// and the remaining displays are considered in the given order.
pub fn resolve(
    primary: &DisplayDescriptor,
    displays: &[DisplayDescriptor],
    options: ResolveOptions,
) -> Resolution {
    let others: Vec<&DisplayDescriptor> =
        displays.iter().filter(|d| d.id != primary.id).collect();

    let resolution = match others.len() {
        0 => single(primary),
        1 if options.two_handed_split => dual(primary, others[0], options.primary_hand),
        1 => pair(primary, others[0]),
        n if n >= DUMP_THRESHOLD => dump(primary, &others),
        _ => directional(primary, &others),
    };

    info!("resolved display layout: {}", resolution.layout);
    for d in &resolution.diagnostics {
        warn!("{}", d);
    }
    resolution
}

fn single(primary: &DisplayDescriptor) -> Resolution {
    let mut grid = LayoutGrid::default();
    grid[0][0] = Some(primary.id);
    Resolution {
        layout: DisplayLayout::new(LayoutMode::Single, grid),
        diagnostics: Vec::new(),
    }
}

fn dual(primary: &DisplayDescriptor, other: &DisplayDescriptor, primary_hand: Hand) -> Resolution {
    let (left, right) = match primary_hand {
        Hand::Left => (primary.id, other.id),
        Hand::Right => (other.id, primary.id),
    };
    let mut grid = LayoutGrid::default();
    grid[0][0] = Some(left);
    grid[0][1] = Some(right);
    Resolution {
        layout: DisplayLayout::new(LayoutMode::Dual, grid),
        diagnostics: Vec::new(),
    }
}

/// Two displays placed on opposite sides of the centre cell along the first
/// axis with a clean edge.  Without one, the other display goes right.
fn pair(primary: &DisplayDescriptor, other: &DisplayDescriptor) -> Resolution {
    let (p, o) = (&primary.bounds, &other.bounds);
    // (col, row) of primary, then other
    let ((pc, pr), (oc, or)) = if p.right() <= o.x {
        ((0, 1), (2, 1))
    } else if o.right() <= p.x {
        ((2, 1), (0, 1))
    } else if p.bottom() <= o.y {
        ((1, 0), (1, 2))
    } else if o.bottom() <= p.y {
        ((1, 2), (1, 0))
    } else {
        debug!(
            "display {} overlaps primary {}, placing it right",
            other.id, primary.id
        );
        ((0, 1), (2, 1))
    };

    let mut grid = LayoutGrid::default();
    grid[pr][pc] = Some(primary.id);
    grid[or][oc] = Some(other.id);
    Resolution {
        layout: DisplayLayout::new(LayoutMode::Multi, grid),
        diagnostics: Vec::new(),
    }
}

/// Per-axis offset of `display` relative to `primary`, each in `-1..=1`.
fn offset(primary: &Rect, display: &Rect) -> (isize, isize) {
    let x = if primary.right() <= display.x {
        1
    } else if display.right() <= primary.x {
        -1
    } else {
        0
    };
    let y = if primary.bottom() <= display.y {
        1
    } else if display.bottom() <= primary.y {
        -1
    } else {
        0
    };
    (x, y)
}

fn directional(primary: &DisplayDescriptor, others: &[&DisplayDescriptor]) -> Resolution {
    let mut grid = LayoutGrid::default();
    grid[1][1] = Some(primary.id);

    for display in others {
        let (dx, dy) = offset(&primary.bounds, &display.bounds);
        let col = (1 + dx) as usize;
        let row = (1 + dy) as usize;
        if let Some(existing) = grid[row][col] {
            debug!(
                "display {} wants cell ({}, {}) held by {}, falling back",
                display.id, col, row, existing
            );
            return dump(primary, others);
        }
        grid[row][col] = Some(display.id);
    }

    Resolution {
        layout: DisplayLayout::new(LayoutMode::Multi, grid),
        diagnostics: Vec::new(),
    }
}

/// Row-major fill, primary first, truncated at grid capacity.
fn dump(primary: &DisplayDescriptor, others: &[&DisplayDescriptor]) -> Resolution {
    let mut grid = LayoutGrid::default();
    let ids = std::iter::once(primary.id).chain(others.iter().map(|d| d.id));
    for (i, id) in ids.take(LAYOUT_CAPACITY).enumerate() {
        grid[i / LAYOUT_SIZE][i % LAYOUT_SIZE] = Some(id);
    }

    let mut diagnostics = vec![Diagnostic::new(
        DiagnosticKind::GeometricAmbiguity,
        "could not fit the current displays in a 3x3 layout by position; \
         displays were placed in order instead. Configure and lock a layout to override.",
    )];

    let dropped: Vec<String> = others
        .iter()
        .skip(LAYOUT_CAPACITY - 1)
        .map(|d| d.id.to_string())
        .collect();
    if !dropped.is_empty() {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::CapacityOverflow,
            format!(
                "only {} displays are supported; ignoring {}",
                LAYOUT_CAPACITY,
                dropped.join(", ")
            ),
        ));
    }

    Resolution {
        layout: DisplayLayout::new(LayoutMode::Multi, grid),
        diagnostics,
    }
}

//  Tests
