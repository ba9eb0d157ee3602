//! **gridpointer**: keyboard-driven pointer placement across monitors.
//!
//! A 3×3 grid (3×6 when both hands are in play) is laid over a display.
//! Picking a tile warps the pointer to its centre and lays a finer grid
//! over that tile, so a handful of key presses reaches any pixel.  With
//! several monitors, their relative placement is first inferred into a
//! 3×3 compass layout so a display can be chosen by position.
//!
//! # Architecture
//!
//! * [`topology::resolve`] turns display rectangles into a
//!   [`layout::DisplayLayout`].
//! * [`selector::RegionSelector`] is the narrowing state machine.  It only
//!   talks to the outside world through the traits in [`traits`]:
//!   [`traits::OverlayRenderer`], [`traits::PointerDriver`] and
//!   [`traits::DiagnosticSink`].
//! * [`daemon::Daemon`] wires a [`traits::DisplaySource`] to the selector
//!   and dispatches [`command::Command`]s.
//!
//! Concrete implementations live in [`hyprland`] (Hyprland IPC),
//! [`headless`] (overlay bookkeeping without drawing), [`exec`] (external
//! click and notification commands) and [`ipc`] (Unix-socket command
//! listener).

pub mod command;
pub mod config;
pub mod daemon;
pub mod diagnostic;
pub mod exec;
pub mod geometry;
pub mod grid;
pub mod headless;
pub mod hyprland;
pub mod ipc;
pub mod layout;
pub mod overlay;
pub mod selector;
pub mod topology;
pub mod traits;
