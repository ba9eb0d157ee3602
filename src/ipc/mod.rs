//! Command transport.
//!
//! Hotkey helpers talk to the daemon by writing newline-delimited JSON
//! [`Command`](crate::command::Command)s to a Unix socket.

pub mod listener;
