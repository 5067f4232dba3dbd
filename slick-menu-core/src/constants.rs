//! Menu constants
//!
//! Default values for hover timing, placement offsets and size estimation.
//! Every value here can be overridden through [MenuConfig](crate::config::MenuConfig).

/// Delay before a hovered submenu anchor opens its submenu, in milliseconds
pub const OPEN_DELAY_MS: u64 = 200;

/// Delay before a submenu that lost the pointer is re-checked for closing, in milliseconds
pub const CLOSE_DELAY_MS: u64 = 500;

/// Horizontal overlap between a submenu and its parent (logical pixels)
pub const SUBMENU_OVERLAP: f64 = 4.0;

/// Downward shift of a submenu that had to be placed on top of its parent (logical pixels)
pub const SUBMENU_SHIFT_DOWN: f64 = 8.0;

/// Upward lift of the submenu anchor point above the anchor row (screen pixels)
pub const SUBMENU_ANCHOR_LIFT: f64 = 4.0;

/// Height of each menu row in logical pixels
pub const ITEM_HEIGHT: f64 = 24.0;

/// Top and bottom padding of the menu body
pub const PADDING: f64 = 4.0;

/// Estimated pixels per label character
pub const TEXT_CHAR_WIDTH: f64 = 7.0;

/// Width reserved next to the label for padding and the submenu arrow
pub const TEXT_RESERVE: f64 = 40.0;

/// Minimum width of a menu
pub const MIN_WIDTH: f64 = 120.0;

/// Maximum width of a menu
pub const MAX_WIDTH: f64 = 400.0;

/// DPI a scale factor of 1.0 corresponds to
pub const DEFAULT_DPI: u32 = 96;

/// Environment variable naming a TOML file to load [MenuConfig](crate::config::MenuConfig) from
pub const CONFIG_ENV_VAR: &str = "SLICK_MENU_CONFIG";
