#![warn(missing_docs)]

//! Hierarchical pop-up context menus with DPI-aware placement and debounced submenus.

pub use nalgebra as math;

pub use slick_menu_core as core;

/// A "prelude" for users of slick-menu.
///
/// Importing this module brings into scope the types needed to build a context
/// menu and wire it to a host.
///
/// ```rust
/// use slick_menu::prelude::*;
/// ```
pub mod prelude {
    pub use slick_menu_core::prelude::*;

    pub use crate::core::geometry::{compute_placement, PlacementRequest};
    pub use crate::core::instance::{MenuInstances, Visibility};

    // Math
    pub use nalgebra::Vector2;
}
