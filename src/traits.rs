//! Core traits that decouple gridpointer from any specific compositor,
//! renderer or transport mechanism.
//!
//! Every concrete backend (Hyprland IPC, the headless overlay renderer, a
//! Unix-socket listener, a test harness, …) implements one of these traits.
//! The [`RegionSelector`](crate::selector::RegionSelector) only depends on
//! these abstractions.

use crate::command::{Button, Command};
use crate::diagnostic::Diagnostic;
use crate::geometry::{DisplayDescriptor, DisplayId, Rect};
use serde::{Deserialize, Serialize};
use std::sync::mpsc;

/// Opaque reference to an overlay surface, minted by the
/// [`OverlayRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayHandle(pub u64);

/// Every connected display plus the primary, taken at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySnapshot {
    pub displays: Vec<DisplayDescriptor>,
    pub primary: DisplayDescriptor,
}

/// Source of display geometry.
pub trait DisplaySource {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Every connected display, in the environment's order.
    fn displays(&self) -> Result<Vec<DisplayDescriptor>, Self::Error>;

    /// The display considered primary.
    fn primary_display(&self) -> Result<DisplayDescriptor, Self::Error>;

    /// Both of the above from one query.  Sources that can change between
    /// two calls (hot-plug) should override this so the primary is always
    /// part of `displays`.
    fn snapshot(&self) -> Result<DisplaySnapshot, Self::Error> {
        Ok(DisplaySnapshot {
            displays: self.displays()?,
            primary: self.primary_display()?,
        })
    }
}

/// Something that can put a transparent, click-through grid overlay on a
/// display.
///
/// Overlay creation is asynchronous: [`request_overlay`](Self::request_overlay)
/// returns immediately, and the renderer later reports the surface through
/// [`RegionSelector::overlay_ready`](crate::selector::RegionSelector::overlay_ready)
/// with the same `generation`.  Requests for a display that already has a
/// surface should reuse it.
pub trait OverlayRenderer {
    /// The error type produced by this renderer.
    type Error: std::error::Error + Send + 'static;

    /// Ask for a visible full-display overlay on `display`.
    fn request_overlay(
        &self,
        display: DisplayId,
        bounds: Rect,
        generation: u64,
    ) -> Result<(), Self::Error>;

    /// Draw the subdivision grid over `selection` (display-relative).
    ///
    /// `two_handed` is set when the grid is six columns wide.
    fn update_overlay_region(
        &self,
        handle: OverlayHandle,
        selection: Rect,
        two_handed: bool,
    ) -> Result<(), Self::Error>;

    /// Highlight a single tile at `(tile_x, tile_y)` of a `tile_w × tile_h`
    /// grid, used to label each display with its compass position.
    fn update_overlay_tiles(
        &self,
        handle: OverlayHandle,
        tile_x: usize,
        tile_y: usize,
        tile_w: usize,
        tile_h: usize,
    ) -> Result<(), Self::Error>;

    fn hide_overlay(&self, handle: OverlayHandle) -> Result<(), Self::Error>;

    fn destroy_overlay(&self, handle: OverlayHandle) -> Result<(), Self::Error>;
}

/// OS-level pointer control.
pub trait PointerDriver {
    /// The error type produced by this driver.
    type Error: std::error::Error + Send + 'static;

    /// Warp the pointer to an absolute virtual-desktop coordinate.
    fn move_pointer(&self, x: f64, y: f64) -> Result<(), Self::Error>;

    /// Press and release `button` wherever the pointer currently is.
    fn click(&self, button: Button) -> Result<(), Self::Error>;
}

/// Receiver for advisory, user-visible notices.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: &Diagnostic);
}

//  Command Source

/// A source of [`Command`]s.
///
/// Implementations listen on some transport (a Unix socket, an in-memory
/// channel, …) and forward parsed commands into the provided
/// [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}
