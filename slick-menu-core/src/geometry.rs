//! Menu placement
//!
//! Pure functions that turn a raw screen-space point into the top-left corner of a
//! menu inside its window. Menu and window sizes are measured in screen pixels;
//! returned positions are window-relative and divided by the DPI scale factor, ready
//! to be handed to the widget that places the menu.
//!
//! Placement runs in a fixed order:
//!
//! 1. Make the anchor window-relative and normalize it by the scale factor.
//! 2. If the bottom edge spills, flip a top-level menu upwards or pin a submenu's
//!    bottom edge to the window bottom.
//! 3. If the right edge spills, flip a top-level menu leftwards or move a submenu to
//!    the far side of its parent. Submenus overlap their parent slightly either way.
//! 4. If the menu ended up left of the window, pin its right edge to the window's
//!    right edge. Submenus are also pushed down so the parent's anchor row stays
//!    visible.
//! 5. Clamp the result into the window. Axes where the menu is bigger than the
//!    window are pinned to the near edge and reported as
//!    [GeometryWarning::OverflowUnresolved].

use nalgebra::Vector2;

use crate::config::PlacementOffsets;
use crate::constants::DEFAULT_DPI;
use crate::error::{Axis, GeometryWarning};

/// Screen-space rectangle of the window that hosts the menus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowBounds {
    /// Top-left corner in screen coordinates.
    pub origin: Vector2<f64>,
    /// Width and height in screen pixels.
    pub size: Vector2<f64>,
}

impl WindowBounds {
    /// Create window bounds from an origin and a size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Vector2::new(x, y),
            size: Vector2::new(width, height),
        }
    }
}

/// Everything needed to place one menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    /// Raw screen-space point the menu opens from.
    pub anchor: Vector2<f64>,
    /// Requested menu size in screen pixels.
    pub menu_size: Vector2<f64>,
    /// The containing window.
    pub window: WindowBounds,
    /// DPI scale factor of the window, 1.0 meaning unscaled.
    pub scale_factor: f64,
    /// Nesting depth, 1 for a top-level menu.
    pub depth: usize,
    /// Width of the parent menu in screen pixels. Ignored for top-level menus.
    pub parent_menu_width: f64,
}

impl PlacementRequest {
    /// Request for a top-level menu opened at `anchor`.
    pub fn top_level(
        anchor: Vector2<f64>,
        menu_size: Vector2<f64>,
        window: WindowBounds,
        scale_factor: f64,
    ) -> Self {
        Self {
            anchor,
            menu_size,
            window,
            scale_factor,
            depth: 1,
            parent_menu_width: 0.0,
        }
    }

    /// Request for a submenu at `depth` whose parent is `parent_menu_width` wide.
    pub fn submenu(
        anchor: Vector2<f64>,
        menu_size: Vector2<f64>,
        window: WindowBounds,
        scale_factor: f64,
        depth: usize,
        parent_menu_width: f64,
    ) -> Self {
        Self {
            anchor,
            menu_size,
            window,
            scale_factor,
            depth,
            parent_menu_width,
        }
    }

    fn is_submenu(&self) -> bool {
        self.depth > 1
    }
}

/// Result of [compute_placement].
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Window-relative, scale-normalized top-left corner.
    pub position: Vector2<f64>,
    /// Conditions that could not be fully resolved.
    pub warnings: Vec<GeometryWarning>,
}

/// Compute where a menu should be placed.
pub fn compute_placement(request: &PlacementRequest, offsets: &PlacementOffsets) -> Placement {
    let mut warnings = Vec::new();

    let scale = if request.scale_factor.is_finite() && request.scale_factor > 0.0 {
        request.scale_factor
    } else {
        warnings.push(GeometryWarning::InvalidScaleFactor(request.scale_factor));
        1.0
    };

    let window = request.window.size;
    let menu = request.menu_size;

    let screen = request.anchor - request.window.origin;
    let mut position = screen / scale;
    let bottom_limit = (window.y - menu.y) / scale;

    if screen.y + menu.y > window.y {
        position.y = if request.is_submenu() {
            bottom_limit
        } else {
            position.y - menu.y / scale
        };
        position.y = position.y.max(0.0);
    }

    if screen.x + menu.x > window.x {
        if request.is_submenu() {
            position.x = position.x - (request.parent_menu_width + menu.x) / scale
                + offsets.submenu_overlap;
        } else {
            position.x -= menu.x / scale;
        }
    } else if request.is_submenu() {
        position.x -= offsets.submenu_overlap;
    }

    if position.x < 0.0 {
        position.x = (window.x - menu.x) / scale;

        if request.is_submenu() {
            position.y += offsets.submenu_shift_down;
            if position.y > bottom_limit {
                position.y = bottom_limit;
            }
        }
    }

    position.x = contain(position.x, menu.x, window.x, scale, Axis::Horizontal, &mut warnings);
    position.y = contain(position.y, menu.y, window.y, scale, Axis::Vertical, &mut warnings);

    for warning in &warnings {
        log::warn!("Menu placement: {:?}", warning);
    }
    log::debug!(
        "Placed depth {} menu {}x{} from anchor ({}, {}) at ({}, {})",
        request.depth,
        menu.x,
        menu.y,
        request.anchor.x,
        request.anchor.y,
        position.x,
        position.y
    );

    Placement {
        position,
        warnings,
    }
}

fn contain(
    value: f64,
    menu: f64,
    window: f64,
    scale: f64,
    axis: Axis,
    warnings: &mut Vec<GeometryWarning>,
) -> f64 {
    let max = (window - menu) / scale;
    if max < 0.0 {
        warnings.push(GeometryWarning::OverflowUnresolved { axis, menu, window });
        return 0.0;
    }
    value.clamp(0.0, max)
}

/// Screen-space point a submenu opens from: the parent's right edge, level with
/// the top of the anchor row minus `anchor_lift`.
///
/// `parent_position` is the parent's placed (logical) position, `parent_width` its
/// width in screen pixels and `row_top` the logical offset of the anchor row from
/// the parent's top edge.
pub fn submenu_anchor(
    parent_position: Vector2<f64>,
    parent_width: f64,
    row_top: f64,
    window: &WindowBounds,
    scale_factor: f64,
    anchor_lift: f64,
) -> Vector2<f64> {
    Vector2::new(
        window.origin.x + parent_position.x * scale_factor + parent_width,
        window.origin.y + (parent_position.y + row_top) * scale_factor - anchor_lift,
    )
}

/// Scale factor for a monitor running at `dpi`.
pub fn scale_factor_from_dpi(dpi: u32) -> f64 {
    dpi as f64 / DEFAULT_DPI as f64
}

/// Convert a logical size to screen pixels, rounded to the nearest pixel.
pub fn scale_up(size: f64, scale_factor: f64) -> i64 {
    (size * scale_factor).round() as i64
}

/// Convert a screen-pixel size to logical pixels, rounded to the nearest pixel.
pub fn scale_down(size: f64, scale_factor: f64) -> i64 {
    (size / scale_factor).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(request: PlacementRequest) -> Placement {
        compute_placement(&request, &PlacementOffsets::default())
    }

    fn assert_contained(request: &PlacementRequest, placement: &Placement) {
        let scale = request.scale_factor;
        let p = placement.position;
        let size = request.menu_size / scale;
        let limit = request.window.size / scale;
        let eps = 1e-9;
        assert!(p.x >= 0.0 && p.y >= 0.0, "{:?} -> {:?}", request, p);
        assert!(p.x + size.x <= limit.x + eps, "{:?} -> {:?}", request, p);
        assert!(p.y + size.y <= limit.y + eps, "{:?} -> {:?}", request, p);
    }

    #[test]
    fn test_top_level_without_spill_opens_at_cursor() {
        let request = PlacementRequest::top_level(
            Vector2::new(300.0, 250.0),
            Vector2::new(100.0, 100.0),
            WindowBounds::new(0.0, 0.0, 800.0, 600.0),
            1.0,
        );
        let placement = place(request);
        assert_eq!(placement.position, Vector2::new(300.0, 250.0));
        assert!(placement.warnings.is_empty());
    }

    #[test]
    fn test_top_level_spill_in_offset_window() {
        // 1520x780 window at (200, 200) on a 1920x1080 screen.
        let request = PlacementRequest::top_level(
            Vector2::new(1950.0, 900.0),
            Vector2::new(140.0, 200.0),
            WindowBounds::new(200.0, 200.0, 1520.0, 780.0),
            1.0,
        );
        let placement = place(request);

        // Flipped up by its height; flipped left and then pulled back inside.
        assert_eq!(placement.position, Vector2::new(1380.0, 500.0));
        assert!(placement.warnings.is_empty());
        assert_contained(&request, &placement);
    }

    #[test]
    fn test_top_level_flips_left() {
        let request = PlacementRequest::top_level(
            Vector2::new(750.0, 100.0),
            Vector2::new(100.0, 100.0),
            WindowBounds::new(0.0, 0.0, 800.0, 600.0),
            1.0,
        );
        assert_eq!(place(request).position, Vector2::new(650.0, 100.0));
    }

    #[test]
    fn test_scaled_window() {
        let window = WindowBounds::new(0.0, 0.0, 1600.0, 1200.0);
        let size = Vector2::new(200.0, 100.0);

        let plain = PlacementRequest::top_level(Vector2::new(400.0, 400.0), size, window, 2.0);
        assert_eq!(place(plain).position, Vector2::new(200.0, 200.0));

        let spilling = PlacementRequest::top_level(Vector2::new(1500.0, 1150.0), size, window, 2.0);
        let placement = place(spilling);
        assert_eq!(placement.position, Vector2::new(650.0, 525.0));
        assert_contained(&spilling, &placement);
    }

    #[test]
    fn test_submenu_overlaps_parent() {
        // Parent at x=100, 120 wide.
        let request = PlacementRequest::submenu(
            Vector2::new(220.0, 46.0),
            Vector2::new(120.0, 80.0),
            WindowBounds::new(0.0, 0.0, 800.0, 600.0),
            1.0,
            2,
            120.0,
        );
        assert_eq!(place(request).position, Vector2::new(216.0, 46.0));
    }

    #[test]
    fn test_submenu_opens_left_of_parent() {
        // Parent at x=600, 150 wide; no room on the right.
        let request = PlacementRequest::submenu(
            Vector2::new(750.0, 100.0),
            Vector2::new(120.0, 80.0),
            WindowBounds::new(0.0, 0.0, 800.0, 600.0),
            1.0,
            2,
            150.0,
        );
        assert_eq!(place(request).position, Vector2::new(484.0, 100.0));
    }

    #[test]
    fn test_submenu_without_room_on_either_side() {
        let request = PlacementRequest::submenu(
            Vector2::new(200.0, 50.0),
            Vector2::new(150.0, 80.0),
            WindowBounds::new(0.0, 0.0, 300.0, 600.0),
            1.0,
            2,
            200.0,
        );
        let placement = place(request);
        assert_eq!(placement.position, Vector2::new(150.0, 58.0));
        assert_contained(&request, &placement);
    }

    #[test]
    fn test_submenu_pinned_to_bottom() {
        let request = PlacementRequest::submenu(
            Vector2::new(220.0, 500.0),
            Vector2::new(120.0, 200.0),
            WindowBounds::new(0.0, 0.0, 800.0, 600.0),
            1.0,
            3,
            120.0,
        );
        assert_eq!(place(request).position, Vector2::new(216.0, 400.0));
    }

    #[test]
    fn test_oversized_menu_is_reported() {
        let request = PlacementRequest::top_level(
            Vector2::new(100.0, 100.0),
            Vector2::new(900.0, 100.0),
            WindowBounds::new(0.0, 0.0, 800.0, 600.0),
            1.0,
        );
        let placement = place(request);
        assert_eq!(placement.position.x, 0.0);
        assert_eq!(
            placement.warnings,
            vec![GeometryWarning::OverflowUnresolved {
                axis: Axis::Horizontal,
                menu: 900.0,
                window: 800.0,
            }]
        );
    }

    #[test]
    fn test_invalid_scale_factor_falls_back() {
        let request = PlacementRequest::top_level(
            Vector2::new(10.0, 10.0),
            Vector2::new(100.0, 100.0),
            WindowBounds::new(0.0, 0.0, 800.0, 600.0),
            0.0,
        );
        let placement = place(request);
        assert_eq!(placement.position, Vector2::new(10.0, 10.0));
        assert_eq!(placement.warnings, vec![GeometryWarning::InvalidScaleFactor(0.0)]);
    }

    #[test]
    fn test_always_contained_when_menu_fits() {
        let window = WindowBounds::new(50.0, 30.0, 640.0, 480.0);
        let anchors = [-100.0, 0.0, 45.0, 320.0, 600.0, 700.0, 1200.0];
        let sizes = [(10.0, 10.0), (200.0, 300.0), (640.0, 480.0), (639.0, 12.0)];

        for &scale in &[0.75, 1.0, 1.25, 2.0] {
            for &depth in &[1, 2, 4] {
                for &(w, h) in &sizes {
                    for &ax in &anchors {
                        for &ay in &anchors {
                            let request = PlacementRequest::submenu(
                                Vector2::new(ax, ay),
                                Vector2::new(w, h),
                                window,
                                scale,
                                depth,
                                180.0,
                            );
                            let placement = place(request);
                            assert!(placement.warnings.is_empty());
                            assert_contained(&request, &placement);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_submenu_anchor_uses_parent_right_edge() {
        let window = WindowBounds::new(200.0, 100.0, 800.0, 600.0);
        let anchor = submenu_anchor(Vector2::new(50.0, 40.0), 240.0, 28.0, &window, 2.0, 4.0);
        assert_eq!(anchor, Vector2::new(200.0 + 100.0 + 240.0, 100.0 + 136.0 - 4.0));
    }

    #[test]
    fn test_dpi_helpers() {
        assert_eq!(scale_factor_from_dpi(96), 1.0);
        assert_eq!(scale_factor_from_dpi(144), 1.5);
        assert_eq!(scale_up(101.0, 1.5), 152);
        assert_eq!(scale_down(152.0, 1.5), 101);
    }
}
