//! Per-display overlay bookkeeping.
//!
//! Creating an overlay is asynchronous: the selector asks the
//! [`OverlayRenderer`] for a surface and carries on, and the renderer later
//! reports it ready.  In the meantime the user may narrow again, exit, or
//! move to another display.  [`OverlayTracker`] keeps one slot per display
//! with a generation counter so that:
//!
//! * the most recent content pushed to a display always wins, even if it
//!   arrives while the surface is still being created;
//! * a ready notification for a request that has since been superseded or
//!   cancelled is discarded, and the surface is hidden again if nothing
//!   wants it.

use crate::geometry::{DisplayId, Rect};
use crate::traits::{OverlayHandle, OverlayRenderer};
use log::{debug, trace};
use std::collections::HashMap;

/// What an overlay should draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayContent {
    /// A subdivision grid over `selection` (display-relative).
    Region { selection: Rect, two_handed: bool },
    /// A single highlighted tile of a `cols × rows` grid.
    Tile {
        x: usize,
        y: usize,
        cols: usize,
        rows: usize,
    },
}

/// Lifecycle of one display's overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    Hidden,
    /// Waiting for the renderer to report generation `.0` ready.
    Pending(u64),
    Shown,
}

#[derive(Debug)]
struct OverlaySlot {
    generation: u64,
    handle: Option<OverlayHandle>,
    phase: OverlayPhase,
    content: Option<OverlayContent>,
}

impl OverlaySlot {
    fn new() -> Self {
        Self {
            generation: 0,
            handle: None,
            phase: OverlayPhase::Hidden,
            content: None,
        }
    }

    fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

/// Tracks every overlay the selector has asked for.
#[derive(Debug, Default)]
pub struct OverlayTracker {
    slots: HashMap<DisplayId, OverlaySlot>,
}

impl OverlayTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the overlay on `display` visible with `content`.
    ///
    /// Pushes immediately when the surface is already shown, records the
    /// content when a request is in flight, and issues a new request
    /// otherwise.
    pub fn show<R: OverlayRenderer>(
        &mut self,
        renderer: &R,
        display: DisplayId,
        bounds: Rect,
        content: OverlayContent,
    ) -> Result<(), R::Error> {
        let slot = self.slots.entry(display).or_insert_with(OverlaySlot::new);
        slot.content = Some(content);
        match slot.phase {
            OverlayPhase::Shown => match slot.handle {
                Some(handle) => push(renderer, handle, content),
                None => Ok(()),
            },
            OverlayPhase::Pending(generation) => {
                trace!(
                    "display {} overlay generation {} still pending, content queued",
                    display,
                    generation
                );
                Ok(())
            }
            OverlayPhase::Hidden => {
                let generation = slot.bump();
                debug!(
                    "requesting overlay for display {} (generation {})",
                    display, generation
                );
                slot.phase = OverlayPhase::Pending(generation);
                if let Err(e) = renderer.request_overlay(display, bounds, generation) {
                    slot.phase = OverlayPhase::Hidden;
                    return Err(e);
                }
                Ok(())
            }
        }
    }

    /// Hide the overlay on `display`, cancelling any in-flight request.
    pub fn hide<R: OverlayRenderer>(
        &mut self,
        renderer: &R,
        display: DisplayId,
    ) -> Result<(), R::Error> {
        let Some(slot) = self.slots.get_mut(&display) else {
            return Ok(());
        };
        let previous = slot.phase;
        if previous == OverlayPhase::Hidden {
            return Ok(());
        }
        slot.bump();
        slot.phase = OverlayPhase::Hidden;
        slot.content = None;
        if let (OverlayPhase::Shown, Some(handle)) = (previous, slot.handle) {
            debug!("hiding overlay on display {}", display);
            renderer.hide_overlay(handle)?;
        }
        Ok(())
    }

    /// Hide every overlay whose display is not in `keep`.
    pub fn hide_all_except<R: OverlayRenderer>(
        &mut self,
        renderer: &R,
        keep: &[DisplayId],
    ) -> Result<(), R::Error> {
        let mut displays: Vec<DisplayId> = self
            .slots
            .keys()
            .copied()
            .filter(|d| !keep.contains(d))
            .collect();
        displays.sort();
        for display in displays {
            self.hide(renderer, display)?;
        }
        Ok(())
    }

    /// The renderer finished request `generation` for `display`.
    ///
    /// Returns `true` when the overlay became visible with the latest
    /// content, `false` when the notification was stale and discarded.
    pub fn ready<R: OverlayRenderer>(
        &mut self,
        renderer: &R,
        display: DisplayId,
        generation: u64,
        handle: OverlayHandle,
    ) -> Result<bool, R::Error> {
        let Some(slot) = self.slots.get_mut(&display) else {
            debug!(
                "overlay {:?} ready for untracked display {}, destroying",
                handle, display
            );
            renderer.destroy_overlay(handle)?;
            return Ok(false);
        };
        slot.handle = Some(handle);

        match slot.phase {
            OverlayPhase::Pending(expected) if expected == generation => {
                slot.phase = OverlayPhase::Shown;
                debug!("overlay on display {} ready (generation {})", display, generation);
                match slot.content {
                    Some(content) => push(renderer, handle, content)?,
                    None => trace!("overlay on display {} ready with nothing to draw", display),
                }
                Ok(true)
            }
            OverlayPhase::Hidden => {
                debug!(
                    "discarding stale overlay generation {} for hidden display {}",
                    generation, display
                );
                renderer.hide_overlay(handle)?;
                Ok(false)
            }
            phase => {
                // A newer request is in flight or the surface is already up.
                debug!(
                    "ignoring stale overlay generation {} for display {} ({:?})",
                    generation, display, phase
                );
                Ok(false)
            }
        }
    }

    /// Destroy every known surface and forget all slots.
    pub fn destroy_all<R: OverlayRenderer>(&mut self, renderer: &R) -> Result<(), R::Error> {
        let mut slots: Vec<(DisplayId, OverlaySlot)> = self.slots.drain().collect();
        slots.sort_by_key(|(d, _)| *d);
        for (display, slot) in slots {
            if let Some(handle) = slot.handle {
                debug!("destroying overlay on display {}", display);
                renderer.destroy_overlay(handle)?;
            }
        }
        Ok(())
    }

    /// Current phase for `display` (`Hidden` when never requested).
    pub fn phase(&self, display: DisplayId) -> OverlayPhase {
        self.slots
            .get(&display)
            .map(|s| s.phase)
            .unwrap_or(OverlayPhase::Hidden)
    }

    pub fn handle(&self, display: DisplayId) -> Option<OverlayHandle> {
        self.slots.get(&display).and_then(|s| s.handle)
    }

    /// Displays whose overlay is shown or being created, sorted.
    pub fn active(&self) -> Vec<DisplayId> {
        let mut ids: Vec<DisplayId> = self
            .slots
            .iter()
            .filter(|(_, s)| s.phase != OverlayPhase::Hidden)
            .map(|(d, _)| *d)
            .collect();
        ids.sort();
        ids
    }
}

fn push<R: OverlayRenderer>(
    renderer: &R,
    handle: OverlayHandle,
    content: OverlayContent,
) -> Result<(), R::Error> {
    match content {
        OverlayContent::Region {
            selection,
            two_handed,
        } => renderer.update_overlay_region(handle, selection, two_handed),
        OverlayContent::Tile { x, y, cols, rows } => {
            renderer.update_overlay_tiles(handle, x, y, cols, rows)
        }
    }
}

//  Tests

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Every renderer call, in order.
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Call {
        Request(DisplayId, Rect, u64),
        Region(OverlayHandle, Rect, bool),
        Tiles(OverlayHandle, usize, usize, usize, usize),
        Hide(OverlayHandle),
        Destroy(OverlayHandle),
    }

    /// Record-keeping renderer.  Handles are the display id, which models a
    /// renderer that reuses one surface per display.
    #[derive(Debug, Default)]
    pub(crate) struct RecorderRenderer {
        pub(crate) calls: RefCell<Vec<Call>>,
    }

    impl RecorderRenderer {
        pub(crate) fn take(&self) -> Vec<Call> {
            std::mem::take(&mut *self.calls.borrow_mut())
        }

        /// Outstanding requests as `(display, generation)`, oldest first.
        pub(crate) fn requests(&self) -> Vec<(DisplayId, u64)> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|c| match c {
                    Call::Request(d, _, g) => Some((*d, *g)),
                    _ => None,
                })
                .collect()
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("recorder error")]
    pub(crate) struct RecorderErr;

    impl OverlayRenderer for RecorderRenderer {
        type Error = RecorderErr;

        fn request_overlay(&self, d: DisplayId, b: Rect, g: u64) -> Result<(), RecorderErr> {
            self.calls.borrow_mut().push(Call::Request(d, b, g));
            Ok(())
        }

        fn update_overlay_region(
            &self,
            h: OverlayHandle,
            sel: Rect,
            two: bool,
        ) -> Result<(), RecorderErr> {
            self.calls.borrow_mut().push(Call::Region(h, sel, two));
            Ok(())
        }

        fn update_overlay_tiles(
            &self,
            h: OverlayHandle,
            x: usize,
            y: usize,
            w: usize,
            hh: usize,
        ) -> Result<(), RecorderErr> {
            self.calls.borrow_mut().push(Call::Tiles(h, x, y, w, hh));
            Ok(())
        }

        fn hide_overlay(&self, h: OverlayHandle) -> Result<(), RecorderErr> {
            self.calls.borrow_mut().push(Call::Hide(h));
            Ok(())
        }

        fn destroy_overlay(&self, h: OverlayHandle) -> Result<(), RecorderErr> {
            self.calls.borrow_mut().push(Call::Destroy(h));
            Ok(())
        }
    }

    const D1: DisplayId = DisplayId(1);
    const H1: OverlayHandle = OverlayHandle(1);

    fn bounds() -> Rect {
        Rect::new(0.0, 0.0, 600.0, 400.0)
    }

    fn region(w: f64) -> OverlayContent {
        OverlayContent::Region {
            selection: Rect::new(0.0, 0.0, w, 100.0),
            two_handed: false,
        }
    }

    #[test]
    fn first_show_requests_and_ready_pushes_content() {
        let r = RecorderRenderer::default();
        let mut t = OverlayTracker::new();
        t.show(&r, D1, bounds(), region(600.0)).unwrap();
        assert_eq!(r.take(), vec![Call::Request(D1, bounds(), 1)]);
        assert_eq!(t.phase(D1), OverlayPhase::Pending(1));

        assert!(t.ready(&r, D1, 1, H1).unwrap());
        assert_eq!(
            r.take(),
            vec![Call::Region(H1, Rect::new(0.0, 0.0, 600.0, 100.0), false)]
        );
        assert_eq!(t.phase(D1), OverlayPhase::Shown);
        assert_eq!(t.handle(D1), Some(H1));
    }

    #[test]
    fn latest_content_wins_while_pending() {
        let r = RecorderRenderer::default();
        let mut t = OverlayTracker::new();
        t.show(&r, D1, bounds(), region(600.0)).unwrap();
        t.show(&r, D1, bounds(), region(200.0)).unwrap();
        t.show(&r, D1, bounds(), region(66.0)).unwrap();
        // Only one request went out.
        assert_eq!(r.requests(), vec![(D1, 1)]);
        r.take();

        t.ready(&r, D1, 1, H1).unwrap();
        assert_eq!(
            r.take(),
            vec![Call::Region(H1, Rect::new(0.0, 0.0, 66.0, 100.0), false)]
        );
    }

    #[test]
    fn shown_overlay_is_updated_in_place() {
        let r = RecorderRenderer::default();
        let mut t = OverlayTracker::new();
        t.show(&r, D1, bounds(), region(600.0)).unwrap();
        t.ready(&r, D1, 1, H1).unwrap();
        r.take();
        t.show(&r, D1, bounds(), region(200.0)).unwrap();
        assert_eq!(
            r.take(),
            vec![Call::Region(H1, Rect::new(0.0, 0.0, 200.0, 100.0), false)]
        );
    }

    #[test]
    fn ready_after_hide_is_discarded_and_hidden() {
        let r = RecorderRenderer::default();
        let mut t = OverlayTracker::new();
        t.show(&r, D1, bounds(), region(600.0)).unwrap();
        t.hide(&r, D1).unwrap();
        r.take();

        assert!(!t.ready(&r, D1, 1, H1).unwrap());
        assert_eq!(r.take(), vec![Call::Hide(H1)]);
        assert_eq!(t.phase(D1), OverlayPhase::Hidden);
    }

    #[test]
    fn stale_ready_is_ignored_while_newer_request_pending() {
        let r = RecorderRenderer::default();
        let mut t = OverlayTracker::new();
        t.show(&r, D1, bounds(), region(600.0)).unwrap();
        t.hide(&r, D1).unwrap();
        t.show(&r, D1, bounds(), region(300.0)).unwrap();
        assert_eq!(r.requests(), vec![(D1, 1), (D1, 3)]);
        r.take();

        // Old result arrives first: neither shown nor hidden.
        assert!(!t.ready(&r, D1, 1, H1).unwrap());
        assert!(r.take().is_empty());
        assert_eq!(t.phase(D1), OverlayPhase::Pending(3));

        assert!(t.ready(&r, D1, 3, H1).unwrap());
        assert_eq!(
            r.take(),
            vec![Call::Region(H1, Rect::new(0.0, 0.0, 300.0, 100.0), false)]
        );
    }

    #[test]
    fn hide_of_unknown_or_hidden_display_is_silent() {
        let r = RecorderRenderer::default();
        let mut t = OverlayTracker::new();
        t.hide(&r, D1).unwrap();
        t.show(&r, D1, bounds(), region(600.0)).unwrap();
        t.ready(&r, D1, 1, H1).unwrap();
        t.hide(&r, D1).unwrap();
        r.take();
        t.hide(&r, D1).unwrap();
        assert!(r.take().is_empty());
    }

    #[test]
    fn hide_all_except_keeps_listed_displays() {
        let r = RecorderRenderer::default();
        let mut t = OverlayTracker::new();
        let d2 = DisplayId(2);
        t.show(&r, D1, bounds(), region(600.0)).unwrap();
        t.show(&r, d2, bounds(), region(600.0)).unwrap();
        t.ready(&r, D1, 1, H1).unwrap();
        t.ready(&r, d2, 1, OverlayHandle(2)).unwrap();
        r.take();

        t.hide_all_except(&r, &[d2]).unwrap();
        assert_eq!(r.take(), vec![Call::Hide(H1)]);
        assert_eq!(t.active(), vec![d2]);
    }

    #[test]
    fn tile_content_uses_tile_update() {
        let r = RecorderRenderer::default();
        let mut t = OverlayTracker::new();
        let tile = OverlayContent::Tile {
            x: 2,
            y: 1,
            cols: 3,
            rows: 3,
        };
        t.show(&r, D1, bounds(), tile).unwrap();
        t.ready(&r, D1, 1, H1).unwrap();
        assert_eq!(r.take().last(), Some(&Call::Tiles(H1, 2, 1, 3, 3)));
    }

    #[test]
    fn destroy_all_forgets_slots_and_late_ready_destroys() {
        let r = RecorderRenderer::default();
        let mut t = OverlayTracker::new();
        t.show(&r, D1, bounds(), region(600.0)).unwrap();
        t.ready(&r, D1, 1, H1).unwrap();
        t.show(&r, DisplayId(2), bounds(), region(600.0)).unwrap();
        r.take();

        t.destroy_all(&r).unwrap();
        assert_eq!(r.take(), vec![Call::Destroy(H1)]);
        assert!(t.active().is_empty());

        assert!(!t.ready(&r, DisplayId(2), 1, OverlayHandle(2)).unwrap());
        assert_eq!(r.take(), vec![Call::Destroy(OverlayHandle(2))]);
    }
}
