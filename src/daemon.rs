//! Glue between the display source, the topology resolver and the
//! selector.
//!
//! [`Daemon`] owns the [`RegionSelector`] and the [`DisplaySource`] and
//! turns every incoming [`Command`] into selector calls.  The binary runs
//! one on its main thread; tests drive it with mocks.

use crate::command::Command;
use crate::config::Config;
use crate::layout::PersistedLayout;
use crate::selector::{RegionSelector, SelectorError};
use crate::topology::{resolve, ResolveOptions};
use crate::traits::{
    DiagnosticSink, DisplaySnapshot, DisplaySource, OverlayRenderer, PointerDriver,
};
use log::{debug, error, info};
use std::sync::mpsc;

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("display query failed: {0}")]
    Displays(String),
    #[error(transparent)]
    Selector(#[from] SelectorError),
}

pub struct Daemon<S, R, P, D>
where
    S: DisplaySource,
    R: OverlayRenderer,
    P: PointerDriver,
    D: DiagnosticSink,
{
    source: S,
    selector: RegionSelector<R, P, D>,
    persisted: PersistedLayout,
    options: ResolveOptions,
}

impl<S, R, P, D> Daemon<S, R, P, D>
where
    S: DisplaySource,
    R: OverlayRenderer,
    P: PointerDriver,
    D: DiagnosticSink,
{
    /// Build the selector from `config` and resolve the initial layout.
    ///
    /// A locked persisted layout is used verbatim; otherwise the layout is
    /// computed from the displays `source` reports.
    pub fn new(
        source: S,
        renderer: R,
        pointer: P,
        diagnostics: D,
        config: &Config,
    ) -> Result<Self, DaemonError> {
        let mut selector =
            RegionSelector::new(renderer, pointer, diagnostics, config.displays.layout());
        selector.set_hands(config.hands);
        selector.set_multi_start(config.layout.multi_start);
        if config.displays.locked {
            info!("using locked display layout {}", selector.current_layout());
        }

        let mut daemon = Self {
            source,
            selector,
            persisted: config.displays.clone(),
            options: config.resolve_options(),
        };
        daemon.relayout()?;
        Ok(daemon)
    }

    /// Re-query displays and, unless the layout is locked, resolve the
    /// topology again.  An active session is ended.
    pub fn relayout(&mut self) -> Result<(), DaemonError> {
        let DisplaySnapshot { displays, primary } = self
            .source
            .snapshot()
            .map_err(|e| DaemonError::Displays(e.to_string()))?;
        debug!("{} displays, primary {}", displays.len(), primary.id);

        self.selector.set_displays(displays.clone(), primary.id)?;
        if self.persisted.locked {
            debug!("display layout locked, not resolving");
            return Ok(());
        }

        let resolution = resolve(&primary, &displays, self.options);
        for diagnostic in &resolution.diagnostics {
            self.selector.diagnostics().report(diagnostic);
        }
        self.selector.set_layout(resolution.layout)?;
        Ok(())
    }

    /// Process a single command.
    pub fn handle(&mut self, cmd: Command) -> Result<(), DaemonError> {
        debug!("handling {:?}", cmd);
        match cmd {
            Command::Enable => self.selector.enable()?,
            Command::Disable => self.selector.disable()?,
            Command::Toggle => self.selector.toggle()?,
            Command::Select(target) => self.selector.select_sub_region(target.x, target.y)?,
            Command::Press(press) => self.selector.press(press.hand, press.x, press.y)?,
            Command::Click(button) => self.selector.click(button)?,
            Command::Relayout => self.relayout()?,
            Command::Shutdown => self.shutdown()?,
            Command::OverlayReady {
                display,
                generation,
                handle,
            } => self.selector.overlay_ready(display, generation, handle)?,
        }
        Ok(())
    }

    /// Process commands until a [`Command::Shutdown`] arrives or every
    /// sender is gone, then release all overlays.
    ///
    /// Command errors are logged and do not stop the loop.
    pub fn run(&mut self, commands: &mpsc::Receiver<Command>) -> Result<(), DaemonError> {
        for cmd in commands.iter() {
            if cmd == Command::Shutdown {
                info!("shutdown requested");
                break;
            }
            if let Err(e) = self.handle(cmd) {
                error!("command error: {}", e);
            }
        }
        self.shutdown()
    }

    /// The layout as it would be persisted: the locked one verbatim, or
    /// the currently resolved one, unlocked.
    pub fn persisted_layout(&self) -> PersistedLayout {
        if self.persisted.locked {
            self.persisted.clone()
        } else {
            PersistedLayout::unlocked(self.selector.current_layout())
        }
    }

    pub fn selector(&self) -> &RegionSelector<R, P, D> {
        &self.selector
    }

    /// Leave pointer mode and release every overlay surface.
    pub fn shutdown(&mut self) -> Result<(), DaemonError> {
        self.selector.destroy()?;
        Ok(())
    }
}

//  Tests
