//! Tests for debounced submenu hovering

use std::time::{Duration, Instant};

use nalgebra::Vector2;
use slick_menu_core::prelude::*;

fn window() -> FixedEnvironment {
    FixedEnvironment::new(WindowBounds::new(0.0, 0.0, 1024.0, 768.0))
}

fn ms(t0: Instant, ms: u64) -> Instant {
    t0 + Duration::from_millis(ms)
}

fn opened(menu: MenuId) -> CheckOutcome {
    CheckOutcome::Opened {
        menu,
        warnings: Vec::new(),
    }
}

fn siblings() -> ContextMenu {
    let spec = MenuSpec::new()
        .submenu(
            "A",
            MenuSpec::new()
                .action("a1", || Ok(()))
                .submenu("Deeper", MenuSpec::new().action("d1", || Ok(()))),
        )
        .submenu("B", MenuSpec::new().action("b1", || Ok(())))
        .action("Leaf", || Ok(()));
    create_menu(&spec).unwrap()
}

/// Hover `anchor` long enough for its submenu to open.
fn hover_open(
    menu: &mut ContextMenu,
    env: &mut FixedEnvironment,
    anchor: HoverTarget,
    now: Instant,
) {
    env.set_pointer(Some(anchor));
    menu.pointer_enter(anchor, now);
    menu.update(&*env, now + Duration::from_millis(200));
}

fn assert_single_open_per_level(menu: &ContextMenu) {
    for instance in menu.menus().iter() {
        let open = instance
            .children()
            .iter()
            .filter(|(_, child)| menu.menus().is_open(*child))
            .count();
        assert!(open <= 1, "{:?} has {} open submenus", instance.id(), open);
    }
}

#[test]
fn test_hover_opens_after_delay() {
    let mut menu = siblings();
    let mut env = window();
    let t0 = Instant::now();
    let a = menu.find(&["A"]).unwrap();
    let anchor = HoverTarget::row(menu.root(), 0);
    menu.open_at(&env, 10, 10);

    env.set_pointer(Some(anchor));
    menu.pointer_enter(anchor, t0);
    assert_eq!(menu.hover_state(a), HoverState::PendingOpen);
    assert_eq!(menu.next_deadline(), Some(ms(t0, 200)));

    assert!(menu.update(&env, ms(t0, 199)).is_empty());
    assert_eq!(menu.hover_state(a), HoverState::PendingOpen);

    assert_eq!(menu.update(&env, ms(t0, 250)), vec![opened(a)]);
    assert_eq!(menu.hover_state(a), HoverState::Open);
}

#[test]
fn test_moving_into_submenu_keeps_it_open() {
    let mut menu = siblings();
    let mut env = window();
    let t0 = Instant::now();
    let a = menu.find(&["A"]).unwrap();
    let anchor = HoverTarget::row(menu.root(), 0);
    menu.open_at(&env, 10, 10);

    env.set_pointer(Some(anchor));
    menu.pointer_enter(anchor, t0);
    menu.update(&env, ms(t0, 250));
    assert!(menu.menus().is_open(a));

    // Straight from the anchor into the submenu body.
    menu.pointer_leave(anchor, ms(t0, 260));
    env.set_pointer(Some(HoverTarget::row(a, 0)));
    assert_eq!(menu.hover_state(a), HoverState::PendingClose);

    assert_eq!(menu.update(&env, ms(t0, 760)), vec![CheckOutcome::KeptOpen(a)]);
    assert_eq!(menu.hover_state(a), HoverState::Open);
}

#[test]
fn test_returning_to_anchor_keeps_submenu_open() {
    let mut menu = siblings();
    let mut env = window();
    let t0 = Instant::now();
    let a = menu.find(&["A"]).unwrap();
    let anchor = HoverTarget::row(menu.root(), 0);
    menu.open_at(&env, 10, 10);
    hover_open(&mut menu, &mut env, anchor, t0);

    menu.pointer_leave(anchor, ms(t0, 300));
    env.set_pointer(Some(anchor));
    menu.pointer_enter(anchor, ms(t0, 400));

    assert_eq!(menu.update(&env, ms(t0, 800)), vec![CheckOutcome::KeptOpen(a)]);
    assert!(menu.menus().is_open(a));
}

#[test]
fn test_leaving_closes_after_delay() {
    let mut menu = siblings();
    let mut env = window();
    let t0 = Instant::now();
    let a = menu.find(&["A"]).unwrap();
    let anchor = HoverTarget::row(menu.root(), 0);
    menu.open_at(&env, 10, 10);
    hover_open(&mut menu, &mut env, anchor, t0);
    menu.drain_requests();

    menu.pointer_leave(anchor, ms(t0, 300));
    env.set_pointer(Some(HoverTarget::row(menu.root(), 2)));

    assert!(menu.update(&env, ms(t0, 799)).is_empty());
    assert_eq!(menu.update(&env, ms(t0, 800)), vec![CheckOutcome::Closed(a)]);
    assert_eq!(
        menu.drain_requests(),
        vec![
            SurfaceRequest::Remove { menu: a },
            SurfaceRequest::Focus { menu: menu.root() },
        ]
    );
    assert!(menu.is_open());
}

#[test]
fn test_brief_hover_is_ignored() {
    let mut menu = siblings();
    let mut env = window();
    let t0 = Instant::now();
    let a = menu.find(&["A"]).unwrap();
    let anchor = HoverTarget::row(menu.root(), 0);
    menu.open_at(&env, 10, 10);

    env.set_pointer(Some(anchor));
    menu.pointer_enter(anchor, t0);
    menu.pointer_leave(anchor, ms(t0, 50));
    env.set_pointer(None);

    assert_eq!(
        menu.update(&env, ms(t0, 200)),
        vec![CheckOutcome::StaleIgnored(a, CheckKind::Open)]
    );
    assert_eq!(menu.hover_state(a), HoverState::Closed);
}

#[test]
fn test_hovering_sibling_swaps_submenus() {
    let mut menu = siblings();
    let mut env = window();
    let t0 = Instant::now();
    let root = menu.root();
    let a = menu.find(&["A"]).unwrap();
    let b = menu.find(&["B"]).unwrap();
    let anchor_a = HoverTarget::row(root, 0);
    let anchor_b = HoverTarget::row(root, 1);
    menu.open_at(&env, 10, 10);
    hover_open(&mut menu, &mut env, anchor_a, t0);
    assert!(menu.menus().is_open(a));

    menu.pointer_leave(anchor_a, ms(t0, 300));
    env.set_pointer(Some(anchor_b));
    menu.pointer_enter(anchor_b, ms(t0, 300));

    assert_eq!(menu.update(&env, ms(t0, 500)), vec![opened(b)]);
    assert!(!menu.menus().is_open(a));
    assert!(menu.menus().is_open(b));
    assert_eq!(menu.hover_state(a), HoverState::Closed);
    // The close-check of A went away with A.
    assert_eq!(menu.next_deadline(), None);
}

#[test]
fn test_at_most_one_submenu_per_level() {
    let mut menu = siblings();
    let mut env = window();
    let t0 = Instant::now();
    let root = menu.root();
    let a = menu.find(&["A"]).unwrap();
    menu.open_at(&env, 10, 10);

    // Zig-zag between anchors at varying speeds.
    let script = [
        (HoverTarget::row(root, 0), 0),
        (HoverTarget::row(root, 1), 120),
        (HoverTarget::row(root, 0), 180),
        (HoverTarget::row(a, 1), 450),
        (HoverTarget::row(root, 1), 700),
        (HoverTarget::row(root, 0), 760),
        (HoverTarget::row(root, 1), 1300),
        (HoverTarget::row(root, 2), 1550),
    ];

    let mut previous: Option<HoverTarget> = None;
    for (target, at) in script {
        let now = ms(t0, at);
        menu.update(&env, now);
        if let Some(previous) = previous {
            menu.pointer_leave(previous, now);
        }
        env.set_pointer(Some(target));
        menu.pointer_enter(target, now);
        previous = Some(target);
        assert_single_open_per_level(&menu);
    }

    for step in 0..40 {
        menu.update(&env, ms(t0, 1550 + step * 50));
        assert_single_open_per_level(&menu);
    }
    assert!(menu.menus().iter().skip(1).all(|instance| !instance.is_open()));
}

#[test]
fn test_leaving_nested_submenu_closes_chain() {
    let mut menu = siblings();
    let mut env = window();
    let t0 = Instant::now();
    let root = menu.root();
    let a = menu.find(&["A"]).unwrap();
    let deeper = menu.find(&["A", "Deeper"]).unwrap();
    menu.open_at(&env, 10, 10);

    hover_open(&mut menu, &mut env, HoverTarget::row(root, 0), t0);
    menu.pointer_leave(HoverTarget::row(root, 0), ms(t0, 300));
    hover_open(&mut menu, &mut env, HoverTarget::row(a, 1), ms(t0, 320));
    assert!(menu.menus().is_open(deeper));

    // The pending close-check of A sees the pointer inside its subtree.
    env.set_pointer(Some(HoverTarget::row(deeper, 0)));
    assert_eq!(menu.update(&env, ms(t0, 800)), vec![CheckOutcome::KeptOpen(a)]);

    // Leave Deeper for empty space.
    menu.pointer_leave(HoverTarget::body(deeper), ms(t0, 900));
    env.set_pointer(None);
    let outcomes = menu.update(&env, ms(t0, 1400));

    assert!(outcomes.contains(&CheckOutcome::Closed(a)));
    assert!(!menu.menus().is_open(a));
    assert!(!menu.menus().is_open(deeper));
    assert!(menu.is_open());
    assert_eq!(menu.next_deadline(), None);
}

#[test]
fn test_closing_parent_forces_closed_state() {
    let mut menu = siblings();
    let mut env = window();
    let t0 = Instant::now();
    let a = menu.find(&["A"]).unwrap();
    let b = menu.find(&["B"]).unwrap();
    let anchor = HoverTarget::row(menu.root(), 0);
    menu.open_at(&env, 10, 10);
    hover_open(&mut menu, &mut env, anchor, t0);

    menu.pointer_leave(anchor, ms(t0, 300));
    menu.pointer_enter(HoverTarget::row(menu.root(), 1), ms(t0, 300));
    assert_eq!(menu.hover_state(a), HoverState::PendingClose);
    assert_eq!(menu.hover_state(b), HoverState::PendingOpen);

    menu.close();
    assert_eq!(menu.hover_state(a), HoverState::Closed);
    assert_eq!(menu.hover_state(b), HoverState::Closed);
    assert_eq!(menu.next_deadline(), None);
    assert!(menu.update(&env, ms(t0, 2000)).is_empty());
}

#[test]
fn test_custom_delays() {
    let config =
        MenuConfig::new().with_delays(Duration::from_millis(50), Duration::from_millis(80));
    let spec = MenuSpec::new().submenu("More", MenuSpec::new().action("x", || Ok(())));
    let mut menu = create_menu_with(&spec, &ActionRegistry::new(), config).unwrap();
    let mut env = window();
    let t0 = Instant::now();
    let more = menu.find(&["More"]).unwrap();
    let anchor = HoverTarget::row(menu.root(), 0);
    menu.open_at(&env, 10, 10);

    env.set_pointer(Some(anchor));
    menu.pointer_enter(anchor, t0);
    assert_eq!(menu.update(&env, ms(t0, 50)), vec![opened(more)]);

    menu.pointer_leave(anchor, ms(t0, 60));
    env.set_pointer(None);
    assert_eq!(menu.update(&env, ms(t0, 140)), vec![CheckOutcome::Closed(more)]);
}

#[test]
fn test_closed_submenu_hands_focus_back() {
    let mut menu = siblings();
    let mut env = window();
    let t0 = Instant::now();
    let root = menu.root();
    let anchor = HoverTarget::row(root, 0);
    menu.open_at(&env, 10, 10);
    hover_open(&mut menu, &mut env, anchor, t0);

    // Focus sits in the submenu while it is open.
    assert_eq!(menu.focus_lost(root, ms(t0, 250)), Dismissal::Tolerated);
    menu.drain_requests();

    menu.pointer_leave(anchor, ms(t0, 300));
    env.set_pointer(None);
    menu.update(&env, ms(t0, 800));
    assert!(menu
        .drain_requests()
        .contains(&SurfaceRequest::Focus { menu: root }));

    // With the submenu gone, losing focus closes the menu again.
    assert_eq!(menu.focus_lost(root, ms(t0, 900)), Dismissal::CloseAll);
    assert!(!menu.is_open());
}

/// A host whose submenus are taller than its window.
struct TallSubmenus {
    inner: FixedEnvironment,
}

impl Environment for TallSubmenus {
    fn scale_factor(&self) -> f64 {
        self.inner.scale_factor()
    }

    fn window_bounds(&self) -> WindowBounds {
        self.inner.window_bounds()
    }

    fn widget_under_pointer(&self) -> Option<HoverTarget> {
        self.inner.widget_under_pointer()
    }

    fn measure(&self, menu: MenuId) -> Option<Vector2<f64>> {
        (menu != MenuId(0)).then(|| Vector2::new(100.0, 5000.0))
    }
}

#[test]
fn test_hover_open_reports_placement_warnings() {
    let mut menu = siblings();
    let mut host = TallSubmenus {
        inner: FixedEnvironment::new(WindowBounds::new(0.0, 0.0, 800.0, 600.0)),
    };
    let t0 = Instant::now();
    let a = menu.find(&["A"]).unwrap();
    let anchor = HoverTarget::row(menu.root(), 0);
    menu.open_at(&host, 10, 10);

    host.inner.set_pointer(Some(anchor));
    menu.pointer_enter(anchor, t0);
    let outcomes = menu.update(&host, ms(t0, 200));

    assert_eq!(
        outcomes,
        vec![CheckOutcome::Opened {
            menu: a,
            warnings: vec![GeometryWarning::OverflowUnresolved {
                axis: Axis::Vertical,
                menu: 5000.0,
                window: 600.0,
            }],
        }]
    );
    assert!(menu.menus().is_open(a));
}
