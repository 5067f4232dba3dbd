//! Live menu instances
//!
//! Every node of a [MenuTree] gets one [MenuInstance], built eagerly when the
//! context menu is created. Instances live in a [MenuInstances] arena and refer to
//! each other by [MenuId]: a parent lists its children, a child only remembers its
//! parent's id. Only visibility and position change after construction.

use nalgebra::Vector2;

use crate::config::MenuConfig;
use crate::environment::{Environment, HoverTarget, SurfaceRequest};
use crate::error::MenuError;
use crate::geometry::{compute_placement, submenu_anchor, Placement, PlacementRequest};
use crate::tree::{Action, EntryPayload, MenuTree};

/// Identifier of a menu instance inside its context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MenuId(pub usize);

/// The row of a parent menu that opens a submenu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorId {
    /// The menu the row belongs to.
    pub menu: MenuId,
    /// Row index inside that menu.
    pub row: usize,
}

impl AnchorId {
    /// The hover target that means "the pointer is on this anchor".
    pub fn target(&self) -> HoverTarget {
        HoverTarget::row(self.menu, self.row)
    }
}

/// Whether a menu is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Not shown.
    #[default]
    Closed,
    /// Shown at its current position.
    Open,
}

/// What a row does when activated.
#[derive(Clone)]
pub enum RowKind {
    /// Runs an action.
    Action(Action),
    /// Opens the given submenu.
    Submenu(MenuId),
}

/// A row of a live menu.
#[derive(Clone)]
pub struct Row {
    /// Display label.
    pub label: String,
    /// Behaviour on activation.
    pub kind: RowKind,
}

/// A placeable popup mirroring one [MenuTree] node.
#[derive(Clone)]
pub struct MenuInstance {
    id: MenuId,
    rows: Vec<Row>,
    size: Vector2<f64>,
    position: Option<Vector2<f64>>,
    visibility: Visibility,
    depth: usize,
    parent: Option<MenuId>,
    children: Vec<(AnchorId, MenuId)>,
}

impl MenuInstance {
    /// This menu's id.
    pub fn id(&self) -> MenuId {
        self.id
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Intrinsic size in logical pixels.
    pub fn size(&self) -> Vector2<f64> {
        self.size
    }

    /// Position of the last placement, if the menu was ever opened.
    pub fn position(&self) -> Option<Vector2<f64>> {
        self.position
    }

    /// Current visibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Check if the menu is shown.
    pub fn is_open(&self) -> bool {
        self.visibility == Visibility::Open
    }

    /// Nesting depth, 1 for the top-level menu.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The menu this one is a submenu of.
    pub fn parent(&self) -> Option<MenuId> {
        self.parent
    }

    /// Submenus paired with the rows that open them.
    pub fn children(&self) -> &[(AnchorId, MenuId)] {
        &self.children
    }
}

/// Arena owning every instance of one context menu.
#[derive(Clone)]
pub struct MenuInstances {
    menus: Vec<MenuInstance>,
    requests: Vec<SurfaceRequest>,
}

impl MenuInstances {
    /// Build the instance tree for `tree`. The top-level menu is [MenuInstances::root].
    pub fn build(tree: &MenuTree, config: &MenuConfig) -> Self {
        let mut instances = Self {
            menus: Vec::new(),
            requests: Vec::new(),
        };
        instances.add(tree, None, 1, config);
        instances
    }

    fn add(
        &mut self,
        tree: &MenuTree,
        parent: Option<MenuId>,
        depth: usize,
        config: &MenuConfig,
    ) -> MenuId {
        let id = MenuId(self.menus.len());
        let (width, height) = config
            .metrics
            .menu_size(tree.entries().iter().map(|entry| entry.label.as_str()));

        self.menus.push(MenuInstance {
            id,
            rows: Vec::new(),
            size: Vector2::new(width, height),
            position: None,
            visibility: Visibility::Closed,
            depth,
            parent,
            children: Vec::new(),
        });

        let mut rows = Vec::with_capacity(tree.len());
        let mut children = Vec::new();
        for (row, entry) in tree.entries().iter().enumerate() {
            let kind = match &entry.payload {
                EntryPayload::Action(action) => RowKind::Action(action.clone()),
                EntryPayload::Submenu(nested) => {
                    let child = self.add(nested, Some(id), depth + 1, config);
                    children.push((AnchorId { menu: id, row }, child));
                    RowKind::Submenu(child)
                },
            };
            rows.push(Row {
                label: entry.label.clone(),
                kind,
            });
        }

        let menu = &mut self.menus[id.0];
        menu.rows = rows;
        menu.children = children;
        id
    }

    /// The top-level menu.
    pub fn root(&self) -> MenuId {
        MenuId(0)
    }

    /// Number of instances, submenus included.
    pub fn len(&self) -> usize {
        self.menus.len()
    }

    /// Always false: the top-level menu exists even when it has no rows.
    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }

    /// Look up an instance.
    pub fn get(&self, id: MenuId) -> Option<&MenuInstance> {
        self.menus.get(id.0)
    }

    /// Look up an instance, failing for foreign ids.
    pub fn menu(&self, id: MenuId) -> Result<&MenuInstance, MenuError> {
        self.get(id).ok_or(MenuError::UnknownMenu(id))
    }

    /// Iterate over all instances in construction order.
    pub fn iter(&self) -> impl Iterator<Item = &MenuInstance> {
        self.menus.iter()
    }

    /// Check if a menu is shown. Unknown ids are closed.
    pub fn is_open(&self, id: MenuId) -> bool {
        self.get(id).is_some_and(MenuInstance::is_open)
    }

    /// The row at `row` of `menu`.
    pub fn row(&self, menu: MenuId, row: usize) -> Result<&Row, MenuError> {
        self.menu(menu)?
            .rows
            .get(row)
            .ok_or(MenuError::InvalidRow { menu, row })
    }

    /// The submenu opened by `row` of `menu`, if that row is an anchor.
    pub fn submenu_at(&self, menu: MenuId, row: usize) -> Option<MenuId> {
        match self.row(menu, row).ok()?.kind {
            RowKind::Submenu(child) => Some(child),
            RowKind::Action(_) => None,
        }
    }

    /// The anchor row of a submenu. `None` for the top-level menu.
    pub fn anchor_of(&self, submenu: MenuId) -> Option<AnchorId> {
        let parent = self.get(submenu)?.parent?;
        self.get(parent)?
            .children
            .iter()
            .find(|(_, child)| *child == submenu)
            .map(|(anchor, _)| *anchor)
    }

    /// The open submenu of `menu`, if any.
    pub fn open_child(&self, menu: MenuId) -> Option<MenuId> {
        self.get(menu)?
            .children
            .iter()
            .map(|(_, child)| *child)
            .find(|child| self.is_open(*child))
    }

    /// Check if `menu` is `ancestor` or one of its descendants.
    pub fn is_within(&self, menu: MenuId, ancestor: MenuId) -> bool {
        let mut current = Some(menu);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(MenuInstance::parent);
        }
        false
    }

    /// Find a menu by the labels of the anchor rows leading to it.
    ///
    /// An empty path is the top-level menu.
    pub fn find(&self, path: &[&str]) -> Option<MenuId> {
        let mut current = self.root();
        for label in path {
            let menu = self.get(current)?;
            current = menu.rows.iter().find_map(|row| match row.kind {
                RowKind::Submenu(child) if row.label == *label => Some(child),
                _ => None,
            })?;
        }
        Some(current)
    }

    /// Show a menu at `position` and focus it. Re-opening only moves it.
    pub fn open(&mut self, id: MenuId, position: Vector2<f64>) {
        let Some(menu) = self.menus.get_mut(id.0) else {
            return;
        };
        if menu.is_open() {
            log::debug!("Moving open menu {:?} to ({}, {})", id, position.x, position.y);
        } else {
            log::debug!("Opening menu {:?} at ({}, {})", id, position.x, position.y);
        }

        menu.position = Some(position);
        menu.visibility = Visibility::Open;
        self.requests.push(SurfaceRequest::Place { menu: id, position });
        self.requests.push(SurfaceRequest::Focus { menu: id });
    }

    /// Close a menu and every open descendant, deepest first.
    ///
    /// Returns the menus that were actually closed. Closing a closed menu is a no-op.
    /// An open parent of `id` gets the focus back.
    pub fn close(&mut self, id: MenuId) -> Vec<MenuId> {
        let mut closed = Vec::new();
        self.close_into(id, &mut closed);
        if !closed.is_empty() {
            if let Some(parent) = self.get(id).and_then(MenuInstance::parent) {
                self.refocus(parent);
            }
        }
        closed
    }

    /// Close every open submenu of `id`, leaving `id` itself open and focused.
    pub fn close_children(&mut self, id: MenuId) -> Vec<MenuId> {
        let mut closed = Vec::new();
        let children: Vec<MenuId> = match self.get(id) {
            Some(menu) => menu.children.iter().map(|(_, child)| *child).collect(),
            None => return closed,
        };
        for child in children {
            self.close_into(child, &mut closed);
        }
        if !closed.is_empty() {
            self.refocus(id);
        }
        closed
    }

    fn refocus(&mut self, id: MenuId) {
        if self.is_open(id) {
            log::debug!("Returning focus to menu {:?}", id);
            self.requests.push(SurfaceRequest::Focus { menu: id });
        }
    }

    fn close_into(&mut self, id: MenuId, closed: &mut Vec<MenuId>) {
        let children: Vec<MenuId> = match self.get(id) {
            Some(menu) => menu
                .children
                .iter()
                .map(|(_, child)| *child)
                .filter(|child| self.is_open(*child))
                .collect(),
            None => return,
        };
        for child in children {
            self.close_into(child, closed);
        }

        let menu = &mut self.menus[id.0];
        if menu.is_open() {
            log::debug!("Closing menu {:?}", id);
            menu.visibility = Visibility::Closed;
            self.requests.push(SurfaceRequest::Remove { menu: id });
            closed.push(id);
        }
    }

    /// Size of a menu in screen pixels, as measured by the host or estimated.
    pub fn screen_size(&self, id: MenuId, env: &dyn Environment) -> Vector2<f64> {
        env.measure(id).unwrap_or_else(|| {
            let size = self.get(id).map(MenuInstance::size).unwrap_or_else(Vector2::zeros);
            size * env.scale_factor()
        })
    }

    /// Where the top-level menu goes when opened at screen point `anchor`.
    pub fn top_level_placement(
        &self,
        anchor: Vector2<f64>,
        env: &dyn Environment,
        config: &MenuConfig,
    ) -> Placement {
        let request = PlacementRequest::top_level(
            anchor,
            self.screen_size(self.root(), env),
            env.window_bounds(),
            env.scale_factor(),
        );
        compute_placement(&request, &config.offsets)
    }

    /// Where `submenu` goes when opened next to its (open) parent.
    pub fn submenu_placement(
        &self,
        submenu: MenuId,
        env: &dyn Environment,
        config: &MenuConfig,
    ) -> Option<Placement> {
        let anchor = self.anchor_of(submenu)?;
        let parent = self.get(anchor.menu)?;
        let parent_position = parent.position?;
        let parent_width = self.screen_size(parent.id, env).x;
        let window = env.window_bounds();
        let scale = env.scale_factor();

        let point = submenu_anchor(
            parent_position,
            parent_width,
            config.metrics.row_top(anchor.row),
            &window,
            scale,
            config.offsets.anchor_lift,
        );
        let request = PlacementRequest::submenu(
            point,
            self.screen_size(submenu, env),
            window,
            scale,
            self.get(submenu)?.depth,
            parent_width,
        );
        Some(compute_placement(&request, &config.offsets))
    }

    /// Open `submenu` next to its parent, closing the parent's other submenus first.
    ///
    /// Does nothing and returns `None` unless the parent is open and `submenu` is
    /// closed. Otherwise returns the placement and the siblings that were closed.
    pub fn open_submenu(
        &mut self,
        submenu: MenuId,
        env: &dyn Environment,
        config: &MenuConfig,
    ) -> Option<(Placement, Vec<MenuId>)> {
        let parent = self.get(submenu)?.parent?;
        if !self.is_open(parent) || self.is_open(submenu) {
            return None;
        }

        // Only one submenu per level.
        let closed = self.close_children(parent);
        let placement = self.submenu_placement(submenu, env, config)?;
        self.open(submenu, placement.position);
        Some((placement, closed))
    }

    /// Take the queued widget operations.
    pub fn drain_requests(&mut self) -> Vec<SurfaceRequest> {
        std::mem::take(&mut self.requests)
    }
}
