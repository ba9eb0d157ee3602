//! An [`OverlayRenderer`] that draws nothing.
//!
//! It keeps one surface handle per display, logs what a real renderer would
//! draw, and acknowledges every request by sending
//! [`Command::OverlayReady`] back into the daemon's command channel.  This
//! keeps the asynchronous request/ready protocol intact even without a
//! graphical overlay, so an external renderer can be swapped in later.

use crate::command::Command;
use crate::geometry::{DisplayId, Rect};
use crate::traits::{OverlayHandle, OverlayRenderer};
use log::{debug, info};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::mpsc;

#[derive(Debug, thiserror::Error)]
#[error("headless renderer: {0}")]
pub struct HeadlessError(String);

pub struct HeadlessRenderer {
    sink: mpsc::Sender<Command>,
    next_handle: Cell<u64>,
    surfaces: RefCell<HashMap<DisplayId, OverlayHandle>>,
}

impl HeadlessRenderer {
    pub fn new(sink: mpsc::Sender<Command>) -> Self {
        Self {
            sink,
            next_handle: Cell::new(1),
            surfaces: RefCell::new(HashMap::new()),
        }
    }

    /// The surface for `display`, minting one on first use.
    fn surface(&self, display: DisplayId) -> OverlayHandle {
        *self.surfaces.borrow_mut().entry(display).or_insert_with(|| {
            let handle = OverlayHandle(self.next_handle.get());
            self.next_handle.set(handle.0 + 1);
            handle
        })
    }
}

impl OverlayRenderer for HeadlessRenderer {
    type Error = HeadlessError;

    fn request_overlay(
        &self,
        display: DisplayId,
        bounds: Rect,
        generation: u64,
    ) -> Result<(), Self::Error> {
        let handle = self.surface(display);
        debug!(
            "overlay {:?} on display {} at {} (generation {})",
            handle, display, bounds, generation
        );
        self.sink
            .send(Command::OverlayReady {
                display,
                generation,
                handle,
            })
            .map_err(|e| HeadlessError(format!("command channel closed: {}", e)))
    }

    fn update_overlay_region(
        &self,
        handle: OverlayHandle,
        selection: Rect,
        two_handed: bool,
    ) -> Result<(), Self::Error> {
        let cols = if two_handed { 6 } else { 3 };
        info!("overlay {:?}: 3x{} grid over {}", handle, cols, selection);
        Ok(())
    }

    fn update_overlay_tiles(
        &self,
        handle: OverlayHandle,
        tile_x: usize,
        tile_y: usize,
        tile_w: usize,
        tile_h: usize,
    ) -> Result<(), Self::Error> {
        info!(
            "overlay {:?}: tile ({}, {}) of {}x{}",
            handle, tile_x, tile_y, tile_w, tile_h
        );
        Ok(())
    }

    fn hide_overlay(&self, handle: OverlayHandle) -> Result<(), Self::Error> {
        debug!("overlay {:?} hidden", handle);
        Ok(())
    }

    fn destroy_overlay(&self, handle: OverlayHandle) -> Result<(), Self::Error> {
        debug!("overlay {:?} destroyed", handle);
        self.surfaces.borrow_mut().retain(|_, h| *h != handle);
        Ok(())
    }
}
