//! [`DisplaySource`] backed by Hyprland's `j/monitors` query.

use super::{ipc_json, HyprlandError};
use crate::geometry::{DisplayDescriptor, DisplayId, Rect};
use crate::traits::{DisplaySnapshot, DisplaySource};
use log::debug;
use serde::Deserialize;

/// Reads monitor geometry from Hyprland.
///
/// Each call issues a fresh query, so hot-plugged monitors show up on the
/// next [`Relayout`](crate::command::Command::Relayout).
#[derive(Debug, Default)]
pub struct HyprlandDisplays;

impl HyprlandDisplays {
    pub fn new() -> Self {
        Self
    }
}

/// Subset of the JSON object returned by `j/monitors`.
#[derive(Debug, Deserialize)]
struct MonitorJson {
    id: i64,
    name: String,
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    #[serde(default = "default_scale")]
    scale: f64,
    #[serde(default)]
    transform: u8,
    #[serde(default)]
    focused: bool,
    #[serde(default)]
    disabled: bool,
}

fn default_scale() -> f64 {
    1.0
}

impl MonitorJson {
    /// Geometry in Hyprland's layout coordinates, which is also what
    /// `movecursor` takes.  `width`/`height` are in device pixels, so undo
    /// the scale and account for 90°/270° rotations.
    fn descriptor(&self) -> Option<DisplayDescriptor> {
        let Ok(id) = u64::try_from(self.id) else {
            debug!("skipping monitor {} with id {}", self.name, self.id);
            return None;
        };
        let scale = if self.scale > 0.0 { self.scale } else { 1.0 };
        let (w, h) = if self.transform % 2 == 1 {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        };
        Some(DisplayDescriptor {
            id: DisplayId(id),
            bounds: Rect::new(
                self.x as f64,
                self.y as f64,
                w as f64 / scale,
                h as f64 / scale,
            ),
        })
    }
}

fn parse_monitors(json: &str) -> Result<Vec<MonitorJson>, HyprlandError> {
    let monitors: Vec<MonitorJson> =
        serde_json::from_str(json).map_err(|e| HyprlandError(format!("parse: {}", e)))?;
    Ok(monitors.into_iter().filter(|m| !m.disabled).collect())
}

fn descriptors(monitors: &[MonitorJson]) -> Vec<DisplayDescriptor> {
    monitors.iter().filter_map(MonitorJson::descriptor).collect()
}

/// The focused monitor, else the first one.
fn primary(monitors: &[MonitorJson]) -> Result<DisplayDescriptor, HyprlandError> {
    monitors
        .iter()
        .filter(|m| m.focused)
        .chain(monitors.iter())
        .find_map(MonitorJson::descriptor)
        .ok_or_else(|| HyprlandError("no monitors".into()))
}

fn snapshot_of(monitors: &[MonitorJson]) -> Result<DisplaySnapshot, HyprlandError> {
    Ok(DisplaySnapshot {
        displays: descriptors(monitors),
        primary: primary(monitors)?,
    })
}

impl DisplaySource for HyprlandDisplays {
    type Error = HyprlandError;

    fn displays(&self) -> Result<Vec<DisplayDescriptor>, Self::Error> {
        let monitors = parse_monitors(&ipc_json("monitors")?)?;
        Ok(descriptors(&monitors))
    }

    fn primary_display(&self) -> Result<DisplayDescriptor, Self::Error> {
        let monitors = parse_monitors(&ipc_json("monitors")?)?;
        primary(&monitors)
    }

    fn snapshot(&self) -> Result<DisplaySnapshot, Self::Error> {
        let monitors = parse_monitors(&ipc_json("monitors")?)?;
        snapshot_of(&monitors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_MONITORS: &str = r#"[
        {"id": 0, "name": "eDP-1", "description": "laptop", "width": 2880, "height": 1800,
         "refreshRate": 60.0, "x": 0, "y": 0, "scale": 2.0, "transform": 0, "focused": false},
        {"id": 1, "name": "DP-1", "width": 1920, "height": 1080,
         "x": 1440, "y": 0, "scale": 1.0, "transform": 0, "focused": true}
    ]"#;

    #[test]
    fn scale_is_undone() {
        let monitors = parse_monitors(TWO_MONITORS).unwrap();
        let d = descriptors(&monitors);
        assert_eq!(d.len(), 2);
        assert_eq!(d[0].id, DisplayId(0));
        assert_eq!(d[0].bounds, Rect::new(0.0, 0.0, 1440.0, 900.0));
        assert_eq!(d[1].bounds, Rect::new(1440.0, 0.0, 1920.0, 1080.0));
    }

    #[test]
    fn focused_monitor_is_primary() {
        let monitors = parse_monitors(TWO_MONITORS).unwrap();
        assert_eq!(primary(&monitors).unwrap().id, DisplayId(1));
    }

    #[test]
    fn snapshot_primary_is_among_displays() {
        let monitors = parse_monitors(TWO_MONITORS).unwrap();
        let snap = snapshot_of(&monitors).unwrap();
        assert_eq!(snap.displays.len(), 2);
        assert_eq!(snap.primary.id, DisplayId(1));
        assert!(snap.displays.contains(&snap.primary));
        assert!(snapshot_of(&parse_monitors("[]").unwrap()).is_err());
    }

    #[test]
    fn first_monitor_is_primary_without_focus() {
        let json = r#"[
            {"id": 3, "name": "A", "width": 100, "height": 100, "x": 0, "y": 0},
            {"id": 4, "name": "B", "width": 100, "height": 100, "x": 100, "y": 0}
        ]"#;
        let monitors = parse_monitors(json).unwrap();
        assert_eq!(primary(&monitors).unwrap().id, DisplayId(3));
    }

    #[test]
    fn rotated_monitor_swaps_axes() {
        let json = r#"[{"id": 0, "name": "A", "width": 1920, "height": 1080,
                        "x": 0, "y": 0, "transform": 1}]"#;
        let d = descriptors(&parse_monitors(json).unwrap());
        assert_eq!(d[0].bounds, Rect::new(0.0, 0.0, 1080.0, 1920.0));
    }

    #[test]
    fn disabled_and_negative_ids_skipped() {
        let json = r#"[
            {"id": -1, "name": "FALLBACK", "width": 100, "height": 100, "x": 0, "y": 0},
            {"id": 2, "name": "OFF", "width": 100, "height": 100, "x": 0, "y": 0, "disabled": true},
            {"id": 5, "name": "ON", "width": 100, "height": 100, "x": 0, "y": 0}
        ]"#;
        let monitors = parse_monitors(json).unwrap();
        let d = descriptors(&monitors);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].id, DisplayId(5));
        assert_eq!(primary(&monitors).unwrap().id, DisplayId(5));
    }

    #[test]
    fn no_monitors_is_an_error() {
        let monitors = parse_monitors("[]").unwrap();
        assert!(primary(&monitors).is_err());
        assert!(parse_monitors("{").is_err());
    }
}
