//! # Menu Error Types
//!
//! Construction-time and runtime errors of the menu core. Placement problems are
//! not errors: they are reported as [GeometryWarning] values next to a best-effort
//! position.

use std::path::PathBuf;
use thiserror::Error;

use crate::instance::MenuId;

/// Errors that can occur while building or driving a context menu.
#[derive(Error, Debug)]
pub enum MenuError {
    /// A menu specification value is neither an action nor a nested mapping.
    #[error("Menu entry '{key}' is neither an action nor a submenu (found {found})")]
    InvalidEntryKind {
        /// The label of the offending entry.
        key: String,
        /// A description of the value that was found.
        found: String,
    },

    /// A menu specification names an action that was never registered.
    #[error("Menu entry '{key}' refers to unknown action '{name}'")]
    UnknownAction {
        /// The label of the offending entry.
        key: String,
        /// The action name that could not be resolved.
        name: String,
    },

    /// A leaf action returned an error. The menu was still closed.
    #[error("Action of menu entry '{label}' failed")]
    ActionFailed {
        /// The label of the activated entry.
        label: String,
        /// The error returned by the action.
        #[source]
        source: anyhow::Error,
    },

    /// The menu id does not belong to this context menu.
    #[error("Unknown menu {0:?}")]
    UnknownMenu(MenuId),

    /// The menu is not shown, so its rows cannot be activated.
    #[error("Menu {0:?} is closed")]
    MenuClosed(MenuId),

    /// The row index is out of range for the menu.
    #[error("Menu {menu:?} has no row {row}")]
    InvalidRow {
        /// The menu that was addressed.
        menu: MenuId,
        /// The requested row.
        row: usize,
    },

    /// The row opens a submenu and has no action to run.
    #[error("Row {row} of menu {menu:?} opens a submenu and cannot be activated")]
    NotAnAction {
        /// The menu that was addressed.
        menu: MenuId,
        /// The requested row.
        row: usize,
    },

    /// A menu specification document could not be parsed.
    #[error("Failed to parse menu specification: {0}")]
    MenuSpecParse(#[from] toml::de::Error),

    /// A configuration file could not be read.
    #[error("Failed to read menu config {path:?}: {source}")]
    ConfigRead {
        /// The path that was read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be parsed.
    #[error("Failed to parse menu config {path:?}: {source}")]
    ConfigParse {
        /// The path that was parsed.
        path: PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

/// Axis of a placement problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The x axis.
    Horizontal,
    /// The y axis.
    Vertical,
}

/// Non-fatal conditions detected while placing a menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryWarning {
    /// The menu is larger than the window on `axis`, so it was pinned to the near edge
    /// and still spills over the far one.
    OverflowUnresolved {
        /// The axis that could not be resolved.
        axis: Axis,
        /// Menu extent on that axis, in screen pixels.
        menu: f64,
        /// Window extent on that axis, in screen pixels.
        window: f64,
    },
    /// The provided scale factor was not a positive finite number; 1.0 was used instead.
    InvalidScaleFactor(f64),
}
