//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/gridpointer/config.json`.
//! Every section is optional; a minimal `{}` file is valid and all sections
//! fall back to their compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "hands": {
//!     "left":  { "enabled": true },
//!     "right": { "enabled": false },
//!     "primary_hand": "left"
//!   },
//!   "layout": { "two_handed_split": false, "multi_start": "Pick" },
//!   "displays": {
//!     "locked": true,
//!     "mode": "Multi",
//!     "grid": [[null, 3, null], [2, 1, 4], [null, null, null]]
//!   },
//!   "click": {
//!     "left":  ["ydotool", "click", "0xC0"],
//!     "right": ["ydotool", "click", "0xC1"]
//!   },
//!   "diagnostics": { "notify_command": ["notify-send", "gridpointer"] }
//! }
//! ```

use crate::command::Hand;
use crate::layout::PersistedLayout;
use crate::topology::ResolveOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Which hands have key blocks bound, and which one is dominant.
    #[serde(default)]
    pub hands: HandsConfig,

    /// Topology and session-start behaviour.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// A persisted display layout; reused verbatim when `locked`.
    #[serde(default)]
    pub displays: PersistedLayout,

    /// External commands that perform mouse clicks.
    #[serde(default)]
    pub click: ClickConfig,

    /// How non-fatal notices reach the user.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Settings for a single hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandConfig {
    pub enabled: bool,
}

impl Default for HandConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Settings for both hands.
///
/// The dominant hand is stored once, so a partial section such as
/// `{"left": {"enabled": true}}` keeps the default `primary_hand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HandsConfig {
    pub left: HandConfig,
    pub right: HandConfig,
    /// Drives the primary display in dual mode and picks the key block
    /// when both hands are bound but only one is used.
    pub primary_hand: Hand,
}

impl HandsConfig {
    /// Only the left hand is bound.
    pub fn left_only() -> Self {
        Self {
            left: HandConfig { enabled: true },
            right: HandConfig { enabled: false },
            primary_hand: Hand::Left,
        }
    }

    /// Only the right hand is bound.
    pub fn right_only() -> Self {
        Self {
            left: HandConfig { enabled: false },
            right: HandConfig { enabled: true },
            primary_hand: Hand::Right,
        }
    }

    pub fn primary(&self) -> Hand {
        self.primary_hand
    }
}

/// What entering pointer mode does when displays are laid out by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MultiStart {
    /// Start narrowing straight away on the primary display.
    #[default]
    Primary,
    /// First pick a display by its compass position, then narrow on it.
    Pick,
}

/// Topology and session-start behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// With exactly two displays, give each hand its own display.
    pub two_handed_split: bool,
    pub multi_start: MultiStart,
}

/// External click commands, as argv vectors.  Empty means unsupported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickConfig {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

/// Diagnostic delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// argv prefix; the notice text is appended as the last argument.
    /// Empty means notices are only logged.
    pub notify_command: Vec<String>,
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Options passed to the topology resolver.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            two_handed_split: self.layout.two_handed_split,
            primary_hand: self.hands.primary(),
        }
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DisplayId;
    use crate::layout::LayoutMode;

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "hands": {
                "left": { "enabled": true },
                "right": { "enabled": true },
                "primary_hand": "Right"
            },
            "layout": { "two_handed_split": true, "multi_start": "Pick" },
            "displays": { "locked": true, "mode": "Dual", "grid": [[1, 2, null], [null, null, null], [null, null, null]] },
            "click": { "left": ["ydotool", "click", "0xC0"] },
            "diagnostics": { "notify_command": ["notify-send", "gridpointer"] }
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.hands.primary(), Hand::Right);
        assert!(cfg.layout.two_handed_split);
        assert_eq!(cfg.layout.multi_start, MultiStart::Pick);
        assert!(cfg.displays.locked);
        assert_eq!(cfg.displays.mode, LayoutMode::Dual);
        assert_eq!(cfg.displays.grid[0][1], Some(DisplayId(2)));
        assert_eq!(cfg.click.left.len(), 3);
        assert!(cfg.click.right.is_empty());
        assert_eq!(cfg.diagnostics.notify_command[0], "notify-send");
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.hands, HandsConfig::default());
        assert_eq!(cfg.hands.primary(), Hand::Left);
        assert_eq!(cfg.layout, LayoutConfig::default());
        assert_eq!(cfg.layout.multi_start, MultiStart::Primary);
        assert!(!cfg.displays.locked);
        assert_eq!(cfg.click, ClickConfig::default());
    }

    #[test]
    fn deserialize_partial_hand() {
        let json = r#"{ "hands": { "right": { "enabled": false } } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert!(!cfg.hands.right.enabled);
        assert!(cfg.hands.left.enabled);
        assert_eq!(cfg.hands.primary(), Hand::Left);
    }

    #[test]
    fn partial_hand_section_keeps_dominant_hand() {
        let json = r#"{ "hands": { "left": { "enabled": true } } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.hands, HandsConfig::default());
        assert_eq!(cfg.hands.primary(), Hand::Left);
        assert_eq!(cfg.resolve_options().primary_hand, Hand::Left);

        let json = r#"{ "hands": { "right": {}, "primary_hand": "r" } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert!(cfg.hands.left.enabled && cfg.hands.right.enabled);
        assert_eq!(cfg.hands.primary(), Hand::Right);
    }

    #[test]
    fn resolve_options_follow_config() {
        let mut cfg = Config::default();
        cfg.layout.two_handed_split = true;
        cfg.hands = HandsConfig::right_only();
        let opts = cfg.resolve_options();
        assert!(opts.two_handed_split);
        assert_eq!(opts.primary_hand, Hand::Right);
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let json = r#"{ "hands": {}, "future_section": { "key": 42 } }"#;
        let _cfg: Config = serde_json::from_str(json).unwrap();
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(Path::new("/nonexistent/gridpointer.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
