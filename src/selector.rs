//! The recursive region-selection state machine.
//!
//! [`RegionSelector`] owns the current [`OptionGrid`], the overlay slots and
//! the live display list.  Entering pointer mode lays a grid over one or
//! two displays; every tile pick moves the pointer to the tile's centre and
//! lays a finer grid over that tile, until the user clicks or exits.
//!
//! All collaborators are reached through traits, so the selector knows
//! nothing about the compositor, the overlay toolkit, or how clicks are
//! injected.

use crate::command::{Button, Hand};
use crate::config::{HandsConfig, MultiStart};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::geometry::{DisplayDescriptor, DisplayId};
use crate::grid::{ColumnSpan, OptionGrid, SelectionRegion, GRID_ROWS, HAND_COLS};
use crate::layout::{DisplayLayout, LayoutMode, LAYOUT_SIZE};
use crate::overlay::{OverlayContent, OverlayTracker};
use crate::traits::{DiagnosticSink, OverlayHandle, OverlayRenderer, PointerDriver};
use log::{debug, info, trace, warn};

/// Possible errors from the selector.
///
/// Only collaborator failures surface as errors; geometry problems and
/// stale display ids are reported as [`Diagnostic`]s instead.
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    /// The overlay renderer returned an error.
    #[error("overlay error: {0}")]
    Overlay(String),
    /// The pointer driver returned an error.
    #[error("pointer error: {0}")]
    Pointer(String),
}

/// What picking a tile means in the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Tiles are sub-rectangles of the active region(s).
    Narrowing,
    /// Tiles are whole displays at their compass positions.
    PickDisplay,
}

/// Lifecycle of a pointer-placement session.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorState {
    Idle,
    Active {
        stage: Stage,
        /// The region(s) currently laid out, one per display in use.
        regions: Vec<SelectionRegion>,
        options: OptionGrid,
    },
}

/// Orchestrates grid narrowing, overlays and the pointer.
///
/// # Typical usage
///
/// ```ignore
/// let mut selector = RegionSelector::new(renderer, pointer, notices, layout);
/// selector.set_displays(displays, primary_id);
/// selector.enable()?;
/// selector.select_sub_region(2, 1)?;
/// selector.click(Button::Left)?;
/// ```
pub struct RegionSelector<R, P, D>
where
    R: OverlayRenderer,
    P: PointerDriver,
    D: DiagnosticSink,
{
    renderer: R,
    pointer: P,
    diagnostics: D,
    layout: DisplayLayout,
    hands: HandsConfig,
    multi_start: MultiStart,
    displays: Vec<DisplayDescriptor>,
    primary: Option<DisplayId>,
    state: SelectorState,
    overlays: OverlayTracker,
    last_pointer: Option<(f64, f64)>,
}

impl<R, P, D> RegionSelector<R, P, D>
where
    R: OverlayRenderer,
    P: PointerDriver,
    D: DiagnosticSink,
{
    /// Create an idle selector for `layout`.
    ///
    /// The display list starts empty; call
    /// [`set_displays`](Self::set_displays) before enabling.
    pub fn new(renderer: R, pointer: P, diagnostics: D, layout: DisplayLayout) -> Self {
        Self {
            renderer,
            pointer,
            diagnostics,
            layout,
            hands: HandsConfig::default(),
            multi_start: MultiStart::default(),
            displays: Vec::new(),
            primary: None,
            state: SelectorState::Idle,
            overlays: OverlayTracker::new(),
            last_pointer: None,
        }
    }

    pub fn set_hands(&mut self, hands: HandsConfig) {
        self.hands = hands;
    }

    pub fn set_multi_start(&mut self, multi_start: MultiStart) {
        self.multi_start = multi_start;
    }

    /// Replace the live display list.  An active session is ended first,
    /// since its regions may refer to displays that changed.
    pub fn set_displays(
        &mut self,
        displays: Vec<DisplayDescriptor>,
        primary: DisplayId,
    ) -> Result<(), SelectorError> {
        if self.is_active() {
            self.disable()?;
        }
        self.displays = displays;
        self.primary = Some(primary);
        Ok(())
    }

    /// Replace the topology.  An active session is ended first.
    pub fn set_layout(&mut self, layout: DisplayLayout) -> Result<(), SelectorError> {
        if self.is_active() {
            self.disable()?;
        }
        info!("using display layout {}", layout);
        self.layout = layout;
        Ok(())
    }

    //  Accessors

    pub fn current_layout(&self) -> &DisplayLayout {
        &self.layout
    }

    pub fn state(&self) -> &SelectorState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SelectorState::Active { .. })
    }

    /// The grid of selectable tiles, when active.
    pub fn options(&self) -> Option<&OptionGrid> {
        match &self.state {
            SelectorState::Active { options, .. } => Some(options),
            SelectorState::Idle => None,
        }
    }

    /// The region(s) the current grid subdivides, when active.
    pub fn regions(&self) -> &[SelectionRegion] {
        match &self.state {
            SelectorState::Active { regions, .. } => regions,
            SelectorState::Idle => &[],
        }
    }

    /// Where the pointer was last moved, in virtual-desktop coordinates.
    pub fn last_pointer(&self) -> Option<(f64, f64)> {
        self.last_pointer
    }

    pub fn overlays(&self) -> &OverlayTracker {
        &self.overlays
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn pointer(&self) -> &P {
        &self.pointer
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Log a notice and forward it to the diagnostic sink.
    pub fn report(&self, diagnostic: &Diagnostic) {
        warn!("{}", diagnostic);
        self.diagnostics.report(diagnostic);
    }

    //  Operations

    /// Enter pointer-placement mode and show the first grid.
    ///
    /// If a display the layout refers to is missing, a diagnostic is
    /// reported and the selector stays idle.
    pub fn enable(&mut self) -> Result<(), SelectorError> {
        if self.is_active() {
            debug!("enable while active, restarting session");
            self.disable()?;
        }
        self.last_pointer = None;
        info!("pointer mode on ({} layout)", self.layout.mode);

        match self.layout.mode {
            LayoutMode::Single => {
                let Some(display) = self.display_at(0, 0) else {
                    return Ok(());
                };
                self.narrow(SelectionRegion::whole_display(&display))
            }
            LayoutMode::Dual => {
                let (Some(left), Some(right)) = (self.display_at(0, 0), self.display_at(1, 0))
                else {
                    return Ok(());
                };
                self.show_dual(&left, &right)
            }
            LayoutMode::Multi => match self.multi_start {
                MultiStart::Primary => {
                    let Some(display) = self.start_display() else {
                        return Ok(());
                    };
                    self.narrow(SelectionRegion::whole_display(&display))
                }
                MultiStart::Pick => self.show_compass(),
            },
        }
    }

    /// Leave pointer-placement mode.  Hides every overlay, cancels pending
    /// ones, and leaves the pointer where it is.
    pub fn disable(&mut self) -> Result<(), SelectorError> {
        if self.is_active() {
            info!("pointer mode off");
        }
        self.state = SelectorState::Idle;
        self.overlays
            .hide_all_except(&self.renderer, &[])
            .map_err(|e| SelectorError::Overlay(e.to_string()))
    }

    /// [`enable`](Self::enable) when idle, [`disable`](Self::disable) when
    /// active.
    pub fn toggle(&mut self) -> Result<(), SelectorError> {
        if self.is_active() {
            self.disable()
        } else {
            self.enable()
        }
    }

    /// Pick the tile at `(x, y)` and narrow to it.
    ///
    /// Unpopulated or out-of-range tiles, and calls while idle, are silent
    /// no-ops.
    pub fn select_sub_region(&mut self, x: usize, y: usize) -> Result<(), SelectorError> {
        let tile = match &self.state {
            SelectorState::Active { options, .. } => options.get(x, y).copied(),
            SelectorState::Idle => None,
        };
        let Some(tile) = tile else {
            trace!("no tile at ({}, {})", x, y);
            return Ok(());
        };

        debug!(
            "select ({}, {}) -> display {} {}",
            x, y, tile.display, tile.selection
        );
        let (px, py) = tile.absolute_center();
        self.pointer
            .move_pointer(px, py)
            .map_err(|e| SelectorError::Pointer(e.to_string()))?;
        self.last_pointer = Some((px, py));

        self.narrow(tile)
    }

    /// Pick a tile with one hand's 3×3 key block.
    pub fn press(&mut self, hand: Hand, x: usize, y: usize) -> Result<(), SelectorError> {
        if x >= HAND_COLS || y >= GRID_ROWS {
            trace!("{} hand key ({}, {}) out of range", hand, x, y);
            return Ok(());
        }
        self.select_sub_region(ColumnSpan::for_hand(hand).offset + x, y)
    }

    /// Click `button` at the current pointer position and leave pointer
    /// mode.  Ignored while idle.
    pub fn click(&mut self, button: Button) -> Result<(), SelectorError> {
        if !self.is_active() {
            debug!("click while idle ignored");
            return Ok(());
        }
        info!("{} click at {:?}", button, self.last_pointer);
        let clicked = self
            .pointer
            .click(button)
            .map_err(|e| SelectorError::Pointer(e.to_string()));
        self.disable()?;
        clicked
    }

    /// The renderer finished creating an overlay requested earlier.
    pub fn overlay_ready(
        &mut self,
        display: DisplayId,
        generation: u64,
        handle: OverlayHandle,
    ) -> Result<(), SelectorError> {
        self.overlays
            .ready(&self.renderer, display, generation, handle)
            .map(|_| ())
            .map_err(|e| SelectorError::Overlay(e.to_string()))
    }

    /// Disable and destroy every overlay surface.
    pub fn destroy(&mut self) -> Result<(), SelectorError> {
        self.disable()?;
        self.overlays
            .destroy_all(&self.renderer)
            .map_err(|e| SelectorError::Overlay(e.to_string()))
    }

    //  Internals

    /// Lay a fresh grid over `region` and show it on its display only.
    fn narrow(&mut self, region: SelectionRegion) -> Result<(), SelectorError> {
        let span = ColumnSpan::choose(&self.hands, &region.selection);
        let options = OptionGrid::subdivided(&region, span);
        self.state = SelectorState::Active {
            stage: Stage::Narrowing,
            regions: vec![region],
            options,
        };

        self.overlays
            .hide_all_except(&self.renderer, &[region.display])
            .map_err(|e| SelectorError::Overlay(e.to_string()))?;
        self.overlays
            .show(
                &self.renderer,
                region.display,
                region.display_bounds,
                OverlayContent::Region {
                    selection: region.selection,
                    two_handed: span.is_two_handed(),
                },
            )
            .map_err(|e| SelectorError::Overlay(e.to_string()))
    }

    /// One virtual 3×6 grid across two displays, one hand each.
    fn show_dual(
        &mut self,
        left: &DisplayDescriptor,
        right: &DisplayDescriptor,
    ) -> Result<(), SelectorError> {
        let regions = vec![
            SelectionRegion::whole_display(left),
            SelectionRegion::whole_display(right),
        ];
        let mut options = OptionGrid::new();
        options.subdivide(&regions[0], ColumnSpan::LEFT);
        options.subdivide(&regions[1], ColumnSpan::RIGHT);
        self.state = SelectorState::Active {
            stage: Stage::Narrowing,
            regions: regions.clone(),
            options,
        };

        self.overlays
            .hide_all_except(&self.renderer, &[left.id, right.id])
            .map_err(|e| SelectorError::Overlay(e.to_string()))?;
        for region in &regions {
            self.overlays
                .show(
                    &self.renderer,
                    region.display,
                    region.display_bounds,
                    OverlayContent::Region {
                        selection: region.selection,
                        two_handed: false,
                    },
                )
                .map_err(|e| SelectorError::Overlay(e.to_string()))?;
        }
        Ok(())
    }

    /// Every populated layout cell becomes a whole-display tile in the
    /// active hand's block.
    fn show_compass(&mut self) -> Result<(), SelectorError> {
        let cells: Vec<(usize, usize, DisplayId)> = self.layout.cells().collect();
        if cells.is_empty() {
            self.report(&Diagnostic::new(
                DiagnosticKind::StaleReference,
                "display layout is empty",
            ));
            return Ok(());
        }

        let mut placed = Vec::with_capacity(cells.len());
        for (col, row, id) in cells {
            let Some(display) = self.lookup(id) else {
                return Ok(());
            };
            placed.push((col, row, display));
        }

        let offset = ColumnSpan::single_hand(&self.hands).offset;
        let mut options = OptionGrid::new();
        let mut regions = Vec::with_capacity(placed.len());
        for (col, row, display) in &placed {
            let region = SelectionRegion::whole_display(display);
            options.set(offset + col, *row, region);
            regions.push(region);
        }
        self.state = SelectorState::Active {
            stage: Stage::PickDisplay,
            regions,
            options,
        };

        let ids: Vec<DisplayId> = placed.iter().map(|(_, _, d)| d.id).collect();
        self.overlays
            .hide_all_except(&self.renderer, &ids)
            .map_err(|e| SelectorError::Overlay(e.to_string()))?;
        for (col, row, display) in &placed {
            self.overlays
                .show(
                    &self.renderer,
                    display.id,
                    display.bounds,
                    OverlayContent::Tile {
                        x: *col,
                        y: *row,
                        cols: LAYOUT_SIZE,
                        rows: LAYOUT_SIZE,
                    },
                )
                .map_err(|e| SelectorError::Overlay(e.to_string()))?;
        }
        Ok(())
    }

    /// The display to start narrowing on in a multi layout: the primary
    /// when it is part of the layout, otherwise the first populated cell.
    fn start_display(&self) -> Option<DisplayDescriptor> {
        let in_layout = self
            .primary
            .filter(|p| self.layout.position_of(*p).is_some());
        let id = match in_layout.or_else(|| self.layout.cells().next().map(|(_, _, id)| id)) {
            Some(id) => id,
            None => {
                self.report(&Diagnostic::new(
                    DiagnosticKind::StaleReference,
                    "display layout is empty",
                ));
                return None;
            }
        };
        self.lookup(id)
    }

    /// The live display at layout cell `(col, row)`, reporting a
    /// diagnostic when the cell is empty or names a disconnected display.
    fn display_at(&self, col: usize, row: usize) -> Option<DisplayDescriptor> {
        match self.layout.at(col, row) {
            Some(id) => self.lookup(id),
            None => {
                self.report(&Diagnostic::new(
                    DiagnosticKind::StaleReference,
                    format!(
                        "{} layout has no display at cell ({}, {})",
                        self.layout.mode, col, row
                    ),
                ));
                None
            }
        }
    }

    fn lookup(&self, id: DisplayId) -> Option<DisplayDescriptor> {
        let found = self.displays.iter().find(|d| d.id == id).copied();
        if found.is_none() {
            self.report(&Diagnostic::new(
                DiagnosticKind::StaleReference,
                format!("could not find display with id {}", id),
            ));
        }
        found
    }
}

//  Tests
