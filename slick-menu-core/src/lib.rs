#![warn(missing_docs)]

//! Core of the slick-menu context menus.
//!
//! Builds menu trees from declarative specs, places menus inside their window,
//! debounces submenu hovering and decides what closes on clicks and focus changes.
//! Rendering is left to the host, which talks to the core through
//! [environment::Environment] and [environment::SurfaceRequest].

/// Menu placement and DPI helpers.
pub mod geometry;

/// Hover debouncing for submenus.
pub mod hover;

/// Live menu instances.
pub mod instance;

/// Menu trees and specs.
pub mod tree;

/// Click and focus-loss handling.
pub mod dismissal;

/// The context menu handle.
pub mod context;

/// Host environment seam.
pub mod environment;

/// Configuration loading.
pub mod config;

/// Default values.
pub mod constants;

/// Error types.
pub mod error;

/// Commonly used types.
pub mod prelude {
    pub use crate::config::{HoverDelays, MenuConfig, MenuMetrics, PlacementOffsets};
    pub use crate::context::{create_menu, create_menu_with, ContextMenu, MenuHandle};
    pub use crate::dismissal::Dismissal;
    pub use crate::environment::{Environment, FixedEnvironment, HoverTarget, SurfaceRequest};
    pub use crate::error::{Axis, GeometryWarning, MenuError};
    pub use crate::geometry::{Placement, WindowBounds};
    pub use crate::hover::{CheckKind, CheckOutcome, HoverState};
    pub use crate::instance::{AnchorId, MenuId};
    pub use crate::tree::{ActionRegistry, MenuSpec, MenuTree};
}
