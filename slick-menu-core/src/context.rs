//! # Context Menus
//!
//! [ContextMenu] ties the pieces together: the validated [MenuTree], its live
//! [MenuInstances], the [HoverDebouncer] and the [DismissalController]. Hosts feed it
//! pointer, focus and click events plus the current time, call
//! [ContextMenu::update] from their event loop and carry out whatever
//! [ContextMenu::drain_requests] returns.
//!
//! ```
//! use slick_menu_core::prelude::*;
//!
//! let spec = MenuSpec::new()
//!     .action("Copy", || Ok(()))
//!     .submenu("Share", MenuSpec::new().action("Mail", || Ok(())));
//! let mut menu = create_menu(&spec).unwrap();
//!
//! let env = FixedEnvironment::new(WindowBounds::new(0.0, 0.0, 800.0, 600.0));
//! menu.open_at(&env, 100, 100);
//! assert!(menu.is_open());
//!
//! menu.close();
//! assert!(!menu.is_open());
//! ```

use std::time::Instant;

use nalgebra::Vector2;

use crate::config::MenuConfig;
use crate::dismissal::{Dismissal, DismissalController};
use crate::environment::{Environment, HoverTarget, SurfaceRequest};
use crate::error::MenuError;
use crate::geometry::Placement;
use crate::hover::{CheckKind, CheckOutcome, HoverDebouncer, HoverState};
use crate::instance::{AnchorId, MenuId, MenuInstances, RowKind};
use crate::tree::{ActionRegistry, MenuSpec, MenuTree};

/// Handle returned by [create_menu].
pub type MenuHandle = ContextMenu;

/// Build a context menu from `spec` with the default configuration.
///
/// Fails without building anything if an entry is neither an action nor a submenu.
pub fn create_menu(spec: &MenuSpec) -> Result<ContextMenu, MenuError> {
    create_menu_with(spec, &ActionRegistry::new(), MenuConfig::default())
}

/// Build a context menu, resolving named actions through `registry`.
pub fn create_menu_with(
    spec: &MenuSpec,
    registry: &ActionRegistry,
    config: MenuConfig,
) -> Result<ContextMenu, MenuError> {
    let tree = MenuTree::build_with(spec, registry)?;
    Ok(ContextMenu::new(tree, config))
}

/// A pop-up menu with nested submenus.
pub struct ContextMenu {
    tree: MenuTree,
    menus: MenuInstances,
    hover: HoverDebouncer,
    dismissal: DismissalController,
    config: MenuConfig,
}

impl ContextMenu {
    /// Create a context menu for an already validated tree.
    pub fn new(tree: MenuTree, config: MenuConfig) -> Self {
        let menus = MenuInstances::build(&tree, &config);
        log::debug!(
            "Created context menu with {} menus (depth {})",
            menus.len(),
            tree.depth()
        );

        Self {
            tree,
            menus,
            hover: HoverDebouncer::new(config.delays),
            dismissal: DismissalController::new(),
            config,
        }
    }

    /// The tree this menu was built from.
    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    /// The live instances.
    pub fn menus(&self) -> &MenuInstances {
        &self.menus
    }

    /// The configuration in use.
    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// The top-level menu.
    pub fn root(&self) -> MenuId {
        self.menus.root()
    }

    /// Check if the top-level menu is shown.
    pub fn is_open(&self) -> bool {
        self.menus.is_open(self.menus.root())
    }

    /// Find a submenu by the labels of the anchor rows leading to it.
    pub fn find(&self, path: &[&str]) -> Option<MenuId> {
        self.menus.find(path)
    }

    /// Hover state of `submenu`.
    pub fn hover_state(&self, submenu: MenuId) -> HoverState {
        self.hover.state(submenu, self.menus.is_open(submenu))
    }

    /// Open the top-level menu at raw screen coordinates.
    ///
    /// Opening an open menu moves it. Submenus left over from before are closed.
    pub fn open_at(&mut self, env: &dyn Environment, x: i32, y: i32) -> Placement {
        let root = self.menus.root();
        let closed = self.menus.close_children(root);
        self.hover.cancel_menus(&closed);

        let placement = self.menus.top_level_placement(
            Vector2::new(f64::from(x), f64::from(y)),
            env,
            &self.config,
        );
        self.menus.open(root, placement.position);
        placement
    }

    /// Close the top-level menu and every submenu. Returns the menus that closed.
    pub fn close(&mut self) -> Vec<MenuId> {
        let closed = self.menus.close(self.menus.root());
        self.hover.clear();
        closed
    }

    /// Open a submenu right away, skipping the hover delay.
    ///
    /// Returns `None` if its parent is closed or it is already open.
    pub fn open_submenu(&mut self, env: &dyn Environment, submenu: MenuId) -> Option<Placement> {
        let (placement, closed) = self.menus.open_submenu(submenu, env, &self.config)?;
        self.hover.cancel_menus(&closed);
        self.hover.cancel(submenu, CheckKind::Open);
        Some(placement)
    }

    /// The pointer entered a row or a menu body.
    pub fn pointer_enter(&mut self, target: HoverTarget, now: Instant) {
        let Some(row) = target.row else {
            return;
        };
        if let Some(submenu) = self.menus.submenu_at(target.menu, row) {
            let anchor = AnchorId {
                menu: target.menu,
                row,
            };
            self.hover.anchor_entered(&self.menus, anchor, submenu, now);
        }
    }

    /// The pointer left a row or a menu body.
    ///
    /// Leaving a submenu body also schedules close-checks for its open ancestor
    /// submenus. Those stay open if the pointer went back into them.
    pub fn pointer_leave(&mut self, target: HoverTarget, now: Instant) {
        match target.row {
            Some(row) => {
                if let Some(submenu) = self.menus.submenu_at(target.menu, row) {
                    let anchor = AnchorId {
                        menu: target.menu,
                        row,
                    };
                    self.hover.submenu_left(&self.menus, anchor, submenu, now);
                }
            },
            None => {
                let mut current = Some(target.menu);
                while let Some(menu) = current {
                    let Some(anchor) = self.menus.anchor_of(menu) else {
                        break;
                    };
                    self.hover.submenu_left(&self.menus, anchor, menu, now);
                    current = Some(anchor.menu);
                }
            },
        }
    }

    /// `menu` lost keyboard focus.
    pub fn focus_lost(&mut self, menu: MenuId, now: Instant) -> Dismissal {
        let decision = self.dismissal.on_focus_lost(&self.menus, menu);
        match decision {
            Dismissal::CloseAll => {
                log::debug!("Top-level menu lost focus");
                self.close();
            },
            Dismissal::ScheduleCloseCheck { anchor, submenu } => {
                self.hover.submenu_left(&self.menus, anchor, submenu, now);
            },
            _ => {},
        }
        decision
    }

    /// A primary button press landed on `hit`, or outside every menu when `None`.
    ///
    /// Activating a leaf always closes the whole menu, even when its action fails.
    pub fn primary_click(
        &mut self,
        env: &dyn Environment,
        hit: Option<HoverTarget>,
    ) -> Result<Dismissal, MenuError> {
        let decision = self.dismissal.on_primary_click(&self.menus, hit);
        match decision {
            Dismissal::CloseAll => {
                self.close();
            },
            Dismissal::Activate { menu, row } => self.activate(menu, row)?,
            Dismissal::OpenSubmenu { submenu, .. } => {
                self.open_submenu(env, submenu);
            },
            _ => {},
        }
        Ok(decision)
    }

    /// Run the action of a leaf row of an open menu and close the whole menu.
    pub fn activate(&mut self, menu: MenuId, row: usize) -> Result<(), MenuError> {
        let item = self.menus.row(menu, row)?;
        if !self.menus.is_open(menu) {
            return Err(MenuError::MenuClosed(menu));
        }
        let action = match &item.kind {
            RowKind::Action(action) => action.clone(),
            RowKind::Submenu(_) => return Err(MenuError::NotAnAction { menu, row }),
        };
        let label = item.label.clone();

        log::debug!("Activating menu entry '{}'", label);
        let result = action();
        self.close();

        result.map_err(|source| MenuError::ActionFailed { label, source })
    }

    /// Fire the hover checks that are due at `now`.
    pub fn update(&mut self, env: &dyn Environment, now: Instant) -> Vec<CheckOutcome> {
        self.hover.update(now, &mut self.menus, env, &self.config)
    }

    /// When [update](Self::update) next has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.hover.next_deadline()
    }

    /// Take the widget operations queued since the last call.
    pub fn drain_requests(&mut self) -> Vec<SurfaceRequest> {
        self.menus.drain_requests()
    }
}
