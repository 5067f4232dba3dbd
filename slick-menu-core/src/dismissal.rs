//! Click and focus-loss dismissal
//!
//! [DismissalController] only decides. The context menu applies the returned
//! [Dismissal], which keeps the rules testable against a bare [MenuInstances].

use crate::environment::HoverTarget;
use crate::instance::{AnchorId, MenuId, MenuInstances, RowKind};

/// What should happen in response to a click or a focus change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    /// Close the top-level menu and with it every submenu.
    CloseAll,
    /// Run the action of a leaf row, then close everything.
    Activate {
        /// The menu holding the row.
        menu: MenuId,
        /// The activated row.
        row: usize,
    },
    /// Open a submenu right away, without waiting for the hover delay.
    OpenSubmenu {
        /// The clicked anchor row.
        anchor: AnchorId,
        /// The submenu it opens.
        submenu: MenuId,
    },
    /// Schedule a close-check for a submenu that lost focus.
    ScheduleCloseCheck {
        /// The anchor row of the submenu.
        anchor: AnchorId,
        /// The submenu that lost focus.
        submenu: MenuId,
    },
    /// Focus moved into an open submenu; keep everything open.
    Tolerated,
    /// Nothing to do.
    Ignore,
}

/// Decides which menus close on clicks and focus changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DismissalController;

impl DismissalController {
    /// Create a new controller.
    pub fn new() -> Self {
        Self
    }

    /// A primary button press landed on `hit`, or outside every menu when `None`.
    pub fn on_primary_click(&self, menus: &MenuInstances, hit: Option<HoverTarget>) -> Dismissal {
        if !menus.is_open(menus.root()) {
            return Dismissal::Ignore;
        }

        let Some(hit) = hit else {
            log::debug!("Click outside of the context menu");
            return Dismissal::CloseAll;
        };
        if !menus.is_open(hit.menu) {
            // Hidden menus cannot be clicked, so the press went somewhere else.
            return Dismissal::CloseAll;
        }
        let Some(row) = hit.row else {
            return Dismissal::Ignore;
        };

        match menus.row(hit.menu, row) {
            Ok(item) => match item.kind {
                RowKind::Action(_) => Dismissal::Activate {
                    menu: hit.menu,
                    row,
                },
                RowKind::Submenu(submenu) => Dismissal::OpenSubmenu {
                    anchor: AnchorId {
                        menu: hit.menu,
                        row,
                    },
                    submenu,
                },
            },
            Err(err) => {
                log::trace!("Ignoring click: {}", err);
                Dismissal::Ignore
            },
        }
    }

    /// `menu` lost keyboard focus.
    pub fn on_focus_lost(&self, menus: &MenuInstances, menu: MenuId) -> Dismissal {
        if !menus.is_open(menu) {
            return Dismissal::Ignore;
        }
        if menus.open_child(menu).is_some() {
            return Dismissal::Tolerated;
        }

        match menus.anchor_of(menu) {
            Some(anchor) => Dismissal::ScheduleCloseCheck {
                anchor,
                submenu: menu,
            },
            None => Dismissal::CloseAll,
        }
    }
}
