//! # Menu Configuration
//!
//! Hover timing, placement offsets and size metrics for context menus.
//!
//! A configuration can be built programmatically, parsed from TOML, or picked up
//! from the file named by the `SLICK_MENU_CONFIG` environment variable:
//!
//! ```toml
//! [delays]
//! open_ms = 150
//! close_ms = 600
//!
//! [offsets]
//! submenu_overlap = 2.0
//!
//! [metrics]
//! item_height = 28.0
//! ```
//!
//! Missing sections and keys fall back to the defaults in [constants](crate::constants).

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::constants::*;
use crate::error::MenuError;

/// Context menu configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Debounce delays for opening and closing submenus.
    pub delays: HoverDelays,
    /// Small offsets applied while placing submenus.
    pub offsets: PlacementOffsets,
    /// Metrics used to estimate the intrinsic menu size.
    pub metrics: MenuMetrics,
}

/// Debounce delays of the hover state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HoverDelays {
    /// Milliseconds an anchor must stay hovered before its submenu opens.
    pub open_ms: u64,
    /// Milliseconds after leaving before a submenu is re-checked for closing.
    pub close_ms: u64,
}

impl HoverDelays {
    /// The open delay as a [Duration].
    pub fn open(&self) -> Duration {
        Duration::from_millis(self.open_ms)
    }

    /// The close delay as a [Duration].
    pub fn close(&self) -> Duration {
        Duration::from_millis(self.close_ms)
    }
}

impl Default for HoverDelays {
    fn default() -> Self {
        Self {
            open_ms: OPEN_DELAY_MS,
            close_ms: CLOSE_DELAY_MS,
        }
    }
}

/// Offsets applied while placing submenus.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlacementOffsets {
    /// Horizontal overlap between a submenu and its parent, in logical pixels.
    pub submenu_overlap: f64,
    /// Downward shift of a submenu forced on top of its parent, in logical pixels.
    pub submenu_shift_down: f64,
    /// Upward lift of the submenu anchor above its row, in screen pixels.
    pub anchor_lift: f64,
}

impl Default for PlacementOffsets {
    fn default() -> Self {
        Self {
            submenu_overlap: SUBMENU_OVERLAP,
            submenu_shift_down: SUBMENU_SHIFT_DOWN,
            anchor_lift: SUBMENU_ANCHOR_LIFT,
        }
    }
}

/// Metrics for estimating the intrinsic size of a menu, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MenuMetrics {
    /// Height of one row.
    pub item_height: f64,
    /// Padding above the first and below the last row.
    pub padding: f64,
    /// Estimated width of one label character.
    pub char_width: f64,
    /// Width reserved next to the longest label.
    pub text_reserve: f64,
    /// Smallest allowed menu width.
    pub min_width: f64,
    /// Largest allowed menu width.
    pub max_width: f64,
}

impl MenuMetrics {
    /// Estimate the size of a menu showing `labels`.
    pub fn menu_size<'a>(&self, labels: impl IntoIterator<Item = &'a str>) -> (f64, f64) {
        let mut rows = 0usize;
        let mut longest = 0usize;
        for label in labels {
            rows += 1;
            longest = longest.max(label.chars().count());
        }

        let estimated = (longest as f64 * self.char_width + self.text_reserve).max(self.min_width);
        let width = estimated.min(self.max_width);
        let height = rows as f64 * self.item_height + self.padding * 2.0;
        (width, height)
    }

    /// Vertical offset of the top of `row` from the top of its menu.
    pub fn row_top(&self, row: usize) -> f64 {
        self.padding + row as f64 * self.item_height
    }
}

impl Default for MenuMetrics {
    fn default() -> Self {
        Self {
            item_height: ITEM_HEIGHT,
            padding: PADDING,
            char_width: TEXT_CHAR_WIDTH,
            text_reserve: TEXT_RESERVE,
            min_width: MIN_WIDTH,
            max_width: MAX_WIDTH,
        }
    }
}

impl MenuConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hover delays.
    pub fn with_delays(mut self, open: Duration, close: Duration) -> Self {
        self.delays = HoverDelays {
            open_ms: open.as_millis() as u64,
            close_ms: close.as_millis() as u64,
        };
        self
    }

    /// Set the placement offsets.
    pub fn with_offsets(mut self, offsets: PlacementOffsets) -> Self {
        self.offsets = offsets;
        self
    }

    /// Set the size metrics.
    pub fn with_metrics(mut self, metrics: MenuMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Parse a configuration from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MenuError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| MenuError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content).map_err(|source| MenuError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the file named by `SLICK_MENU_CONFIG`, or use defaults.
    ///
    /// A file that cannot be read or parsed is logged and ignored.
    pub fn from_env_or_default() -> Self {
        let Ok(path) = env::var(CONFIG_ENV_VAR) else {
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(config) => {
                log::debug!("Loaded menu config from {}", path);
                config
            },
            Err(err) => {
                log::warn!("{}; using default menu config", err);
                Self::default()
            },
        }
    }
}
