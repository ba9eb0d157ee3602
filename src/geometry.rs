//! Shared geometry types.
//!
//! All coordinates live in the virtual-desktop space and are `f64`, because
//! repeated subdivision quickly produces fractional rectangles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An axis-aligned rectangle.
///
/// `x`/`y` may be negative (displays left of or above the primary) and
/// rectangles may overlap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The same size, anchored at `(0, 0)`.
    pub fn at_origin(&self) -> Self {
        Self::new(0.0, 0.0, self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}x{:.1}+{:.1}+{:.1}",
            self.width, self.height, self.x, self.y
        )
    }
}

/// Opaque display identifier assigned by the environment.
///
/// Stable for the lifetime of a session; serialises as a bare integer so
/// persisted layouts stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayId(pub u64);

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One physical display as reported by the environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayDescriptor {
    pub id: DisplayId,
    pub bounds: Rect,
}

impl DisplayDescriptor {
    pub fn new(id: u64, bounds: Rect) -> Self {
        Self {
            id: DisplayId(id),
            bounds,
        }
    }
}
