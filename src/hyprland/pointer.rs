//! [`PointerDriver`] using Hyprland's `movecursor` dispatcher.
//!
//! Hyprland has no dispatcher for synthetic clicks, so clicks run the
//! external command configured for each button.

use super::{ipc_dispatch, HyprlandError};
use crate::command::Button;
use crate::config::ClickConfig;
use crate::exec;
use crate::traits::PointerDriver;

/// Moves the pointer through Hyprland and clicks through a helper tool.
#[derive(Debug, Default)]
pub struct HyprlandPointer {
    click: ClickConfig,
}

impl HyprlandPointer {
    pub fn new(click: ClickConfig) -> Self {
        Self { click }
    }
}

fn movecursor_args(x: f64, y: f64) -> String {
    format!("movecursor {} {}", x.round() as i64, y.round() as i64)
}

impl PointerDriver for HyprlandPointer {
    type Error = HyprlandError;

    fn move_pointer(&self, x: f64, y: f64) -> Result<(), Self::Error> {
        ipc_dispatch(&movecursor_args(x, y))
    }

    fn click(&self, button: Button) -> Result<(), Self::Error> {
        let argv = match button {
            Button::Left => &self.click.left,
            Button::Right => &self.click.right,
        };
        exec::run(argv, &[]).map_err(|e| HyprlandError(format!("{} click: {}", button, e)))
    }
}
