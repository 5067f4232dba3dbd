//! Host environment seam
//!
//! The menu core never talks to a windowing system. It queries the host through
//! [Environment] and asks it to move widgets by queueing [SurfaceRequest]s, which
//! the host drains once per event-loop turn.

use nalgebra::Vector2;

use crate::geometry::WindowBounds;
use crate::instance::MenuId;

/// What the pointer is currently over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoverTarget {
    /// The menu body under the pointer.
    pub menu: MenuId,
    /// The row under the pointer, if any.
    pub row: Option<usize>,
}

impl HoverTarget {
    /// The pointer is over `row` of `menu`.
    pub fn row(menu: MenuId, row: usize) -> Self {
        Self {
            menu,
            row: Some(row),
        }
    }

    /// The pointer is over `menu` but not over one of its rows.
    pub fn body(menu: MenuId) -> Self {
        Self { menu, row: None }
    }
}

/// Queries the menu core makes against its host.
pub trait Environment {
    /// Current DPI scale factor of the window.
    fn scale_factor(&self) -> f64;

    /// Current screen-space window rectangle.
    fn window_bounds(&self) -> WindowBounds;

    /// The menu row or body currently under the pointer, if any.
    fn widget_under_pointer(&self) -> Option<HoverTarget>;

    /// Measured size of a menu in screen pixels.
    ///
    /// Hosts that lay out real widgets return their requested size here. The
    /// default of `None` makes the core estimate the size from its metrics.
    fn measure(&self, _menu: MenuId) -> Option<Vector2<f64>> {
        None
    }
}

/// A widget operation the host has to carry out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceRequest {
    /// Show the menu at a window-relative, scale-normalized position.
    Place {
        /// The menu to place.
        menu: MenuId,
        /// Top-left corner.
        position: Vector2<f64>,
    },
    /// Hide the menu.
    Remove {
        /// The menu to hide.
        menu: MenuId,
    },
    /// Give the menu keyboard focus.
    Focus {
        /// The menu to focus.
        menu: MenuId,
    },
}

/// An [Environment] backed by plain values.
///
/// Useful for headless hosts and tests: set [pointer](Self::pointer) whenever the
/// pointer moves.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedEnvironment {
    /// Scale factor reported to the core.
    pub scale_factor: f64,
    /// Window rectangle reported to the core.
    pub bounds: WindowBounds,
    /// What the pointer is over.
    pub pointer: Option<HoverTarget>,
}

impl FixedEnvironment {
    /// Unscaled environment for a window at `bounds`.
    pub fn new(bounds: WindowBounds) -> Self {
        Self {
            scale_factor: 1.0,
            bounds,
            pointer: None,
        }
    }

    /// Set the scale factor.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Move the pointer.
    pub fn set_pointer(&mut self, pointer: Option<HoverTarget>) {
        self.pointer = pointer;
    }
}

impl Environment for FixedEnvironment {
    fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    fn window_bounds(&self) -> WindowBounds {
        self.bounds
    }

    fn widget_under_pointer(&self) -> Option<HoverTarget> {
        self.pointer
    }
}
