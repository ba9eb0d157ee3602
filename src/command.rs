//! Commands and small vocabulary types shared across gridpointer.
//!
//! [`Command`] describes every request the daemon accepts over its socket;
//! [`Hand`] and [`Button`] are used by the selector and configuration as
//! well.
//!
//! The hotkey helper forwards raw arguments; the daemon parses hand names
//! leniently (`"left"`, `"Left"`, `"L"`) and tile targets either as
//! `{"x": 2, "y": 1}` or as the string `"2 1"`.

use crate::geometry::DisplayId;
use crate::traits::OverlayHandle;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One of the user's two hands, each owning a 3-column block of keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Hand {
    #[default]
    Left,
    Right,
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hand::Left => write!(f, "left"),
            Hand::Right => write!(f, "right"),
        }
    }
}

/// Parse a hand name (case-insensitive; accepts "left", "L", "right", "R").
fn parse_hand(s: &str) -> Option<Hand> {
    match s.trim().to_lowercase().as_str() {
        "left" | "l" => Some(Hand::Left),
        "right" | "r" => Some(Hand::Right),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Hand {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_hand(&s).ok_or_else(|| DeError::custom(format!("invalid hand: {:?}", s)))
    }
}

/// Mouse button to press once the pointer is in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Left,
    Right,
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Button::Left => write!(f, "left"),
            Button::Right => write!(f, "right"),
        }
    }
}

/// Wire format for a tile coordinate: accepts `{"x":0,"y":0}` or `"col row"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileTarget {
    pub x: usize,
    pub y: usize,
}

impl<'de> Deserialize<'de> for TileTarget {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = TileTarget;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "object {{x, y}} or string \"col row\"")
            }
            fn visit_map<A>(self, mut map: A) -> Result<TileTarget, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut x = None;
                let mut y = None;
                while let Some(k) = map.next_key::<String>()? {
                    match k.as_str() {
                        "x" => x = Some(map.next_value()?),
                        "y" => y = Some(map.next_value()?),
                        _ => {
                            let _: serde::de::IgnoredAny = map.next_value()?;
                        }
                    }
                }
                Ok(TileTarget {
                    x: x.ok_or_else(|| DeError::missing_field("x"))?,
                    y: y.ok_or_else(|| DeError::missing_field("y"))?,
                })
            }
            fn visit_str<E>(self, s: &str) -> Result<TileTarget, E>
            where
                E: DeError,
            {
                let parts: Vec<&str> = s.split_whitespace().collect();
                if parts.len() != 2 {
                    return Err(DeError::custom(format!(
                        "tile: expected \"col row\", got {:?}",
                        s
                    )));
                }
                let x: usize = parts[0]
                    .parse()
                    .map_err(|_| DeError::custom("tile: col must be a non-negative integer"))?;
                let y: usize = parts[1]
                    .parse()
                    .map_err(|_| DeError::custom("tile: row must be a non-negative integer"))?;
                Ok(TileTarget { x, y })
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// A key press from one hand's 3×3 block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandPress {
    pub hand: Hand,
    pub x: usize,
    pub y: usize,
}

/// Every request the daemon can process.
///
/// Commands are produced by [`CommandSource`](crate::traits::CommandSource)
/// implementations (and by the overlay renderer, for readiness) and consumed
/// on the main thread, which owns the
/// [`RegionSelector`](crate::selector::RegionSelector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Enter pointer-placement mode and show the first grid.
    Enable,

    /// Leave pointer-placement mode without moving the pointer.
    Disable,

    /// [`Enable`](Command::Enable) when idle, [`Disable`](Command::Disable)
    /// when active.
    Toggle,

    /// Pick the tile at absolute grid coordinate `(x, y)`, where `x` spans
    /// both hands' columns (`0..6`).
    Select(TileTarget),

    /// Pick a tile with one hand's key block; `x` is hand-local (`0..3`).
    Press(HandPress),

    /// Click at the current pointer position and leave the mode.
    Click(Button),

    /// Re-query displays and recompute the topology (e.g. after hot-plug).
    /// Ignored while the persisted layout is locked.
    Relayout,

    /// Leave pointer mode, release overlays and stop the daemon.
    ///
    /// Also sent internally once the command listener exits.
    Shutdown,

    /// An overlay requested earlier is ready to draw.
    ///
    /// Sent by the overlay renderer, not by users.
    OverlayReady {
        display: DisplayId,
        generation: u64,
        handle: OverlayHandle,
    },
}
