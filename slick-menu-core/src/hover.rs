//! Debounced submenu hover handling
//!
//! Hovering a submenu anchor does not open the submenu right away, and leaving it
//! does not close it right away. Instead a check is scheduled, and when it fires the
//! *current* pointer and visibility state decides what happens. Per submenu this
//! gives four states:
//!
//! ```text
//!   Closed --enter anchor--> PendingOpen --check, still hovered--> Open
//!   PendingOpen --check, no longer hovered--> Closed
//!   Open --leave anchor/body--> PendingClose --check, pointer gone--> Closed
//!   PendingClose --check, pointer back on anchor/body--> Open
//! ```
//!
//! Closing an ancestor forces the whole subtree to `Closed` and cancels its checks.
//! A newer check of the same kind for the same submenu replaces the older one.

use std::time::{Duration, Instant};

use crate::config::{HoverDelays, MenuConfig};
use crate::environment::Environment;
use crate::error::GeometryWarning;
use crate::instance::{AnchorId, MenuId, MenuInstances};

/// The two kinds of debounced checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    /// Should the submenu open?
    Open,
    /// Should the submenu close?
    Close,
}

/// One scheduled check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverCheckToken {
    /// Monotonic token number.
    pub id: u64,
    /// The submenu the check is about.
    pub target: MenuId,
    /// The row that opens `target`.
    pub anchor: AnchorId,
    /// What the check decides.
    pub kind: CheckKind,
    /// When the triggering event arrived.
    pub issued_at: Instant,
    /// When the check fires.
    pub due: Instant,
}

/// Hover state of one submenu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverState {
    /// Hidden, nothing scheduled.
    Closed,
    /// Hidden, an open-check is scheduled.
    PendingOpen,
    /// Shown, nothing scheduled.
    Open,
    /// Shown, a close-check is scheduled.
    PendingClose,
}

/// What a fired check did.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// The submenu was opened.
    Opened {
        /// The submenu that opened.
        menu: MenuId,
        /// Placement problems that could not be resolved.
        warnings: Vec<GeometryWarning>,
    },
    /// The submenu and its descendants were closed.
    Closed(MenuId),
    /// A close-check found the pointer back on the anchor or submenu.
    KeptOpen(MenuId),
    /// The conditions changed since the check was scheduled; nothing happened.
    StaleIgnored(MenuId, CheckKind),
}

/// Schedules and fires hover checks for the submenus of one context menu.
#[derive(Debug, Clone)]
pub struct HoverDebouncer {
    delays: HoverDelays,
    pending: Vec<HoverCheckToken>,
    next_token: u64,
}

impl HoverDebouncer {
    /// Create a debouncer with the given delays.
    pub fn new(delays: HoverDelays) -> Self {
        Self {
            delays,
            pending: Vec::new(),
            next_token: 0,
        }
    }

    /// The configured delays.
    pub fn delays(&self) -> HoverDelays {
        self.delays
    }

    /// Checks that have not fired yet, in scheduling order.
    pub fn pending(&self) -> &[HoverCheckToken] {
        &self.pending
    }

    /// Check if a check of `kind` is scheduled for `target`.
    pub fn is_pending(&self, target: MenuId, kind: CheckKind) -> bool {
        self.pending
            .iter()
            .any(|token| token.target == target && token.kind == kind)
    }

    /// When the earliest scheduled check fires.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|token| token.due).min()
    }

    /// Hover state of `target` given whether it is currently shown.
    pub fn state(&self, target: MenuId, is_open: bool) -> HoverState {
        let closing = self.is_pending(target, CheckKind::Close);
        let opening = self.is_pending(target, CheckKind::Open);
        match (is_open, closing, opening) {
            (true, true, _) => HoverState::PendingClose,
            (true, false, _) => HoverState::Open,
            (false, _, true) => HoverState::PendingOpen,
            (false, _, false) => HoverState::Closed,
        }
    }

    /// Schedule a check, replacing any pending check of the same kind for `target`.
    pub fn schedule(
        &mut self,
        target: MenuId,
        anchor: AnchorId,
        kind: CheckKind,
        now: Instant,
    ) -> HoverCheckToken {
        if self.cancel(target, kind) {
            log::trace!("Superseded pending {:?} check for {:?}", kind, target);
        }

        let delay: Duration = match kind {
            CheckKind::Open => self.delays.open(),
            CheckKind::Close => self.delays.close(),
        };
        let token = HoverCheckToken {
            id: self.next_token,
            target,
            anchor,
            kind,
            issued_at: now,
            due: now + delay,
        };
        self.next_token += 1;
        self.pending.push(token);
        token
    }

    /// Drop the pending check of `kind` for `target`. Returns whether one existed.
    pub fn cancel(&mut self, target: MenuId, kind: CheckKind) -> bool {
        let before = self.pending.len();
        self.pending
            .retain(|token| !(token.target == target && token.kind == kind));
        before != self.pending.len()
    }

    /// Drop every pending check for the given menus.
    pub fn cancel_menus(&mut self, menus: &[MenuId]) {
        if menus.is_empty() {
            return;
        }
        self.pending.retain(|token| !menus.contains(&token.target));
    }

    /// Drop every pending check.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Remove and return the checks due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<HoverCheckToken> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|token| token.due <= now);
        self.pending = pending;
        due.sort_by_key(|token| (token.due, token.id));
        due
    }

    /// The pointer entered the anchor row of `submenu`.
    pub fn anchor_entered(
        &mut self,
        menus: &MenuInstances,
        anchor: AnchorId,
        submenu: MenuId,
        now: Instant,
    ) {
        if menus.is_open(submenu) {
            return;
        }
        self.schedule(submenu, anchor, CheckKind::Open, now);
    }

    /// The pointer left the anchor row or the body of `submenu`, or `submenu` lost focus.
    ///
    /// Only open submenus schedule a close-check; a pending open-check re-validates
    /// the pointer by itself.
    pub fn submenu_left(
        &mut self,
        menus: &MenuInstances,
        anchor: AnchorId,
        submenu: MenuId,
        now: Instant,
    ) {
        if !menus.is_open(submenu) {
            return;
        }
        self.schedule(submenu, anchor, CheckKind::Close, now);
    }

    /// Fire every check due at `now` against the live state.
    pub fn update(
        &mut self,
        now: Instant,
        menus: &mut MenuInstances,
        env: &dyn Environment,
        config: &MenuConfig,
    ) -> Vec<CheckOutcome> {
        self.take_due(now)
            .into_iter()
            .map(|token| self.fire(token, menus, env, config))
            .collect()
    }

    fn fire(
        &mut self,
        token: HoverCheckToken,
        menus: &mut MenuInstances,
        env: &dyn Environment,
        config: &MenuConfig,
    ) -> CheckOutcome {
        let outcome = match token.kind {
            CheckKind::Open => self.fire_open(token, menus, env, config),
            CheckKind::Close => self.fire_close(token, menus, env),
        };

        match &outcome {
            CheckOutcome::StaleIgnored(target, kind) => {
                log::trace!("Ignoring stale {:?} check for {:?}", kind, target)
            },
            CheckOutcome::KeptOpen(target) => {
                log::trace!("Pointer returned to {:?}, keeping it open", target)
            },
            CheckOutcome::Opened { .. } | CheckOutcome::Closed(_) => {},
        }
        outcome
    }

    fn fire_open(
        &mut self,
        token: HoverCheckToken,
        menus: &mut MenuInstances,
        env: &dyn Environment,
        config: &MenuConfig,
    ) -> CheckOutcome {
        let anchor_hovered = env.widget_under_pointer() == Some(token.anchor.target());
        if !menus.is_open(token.anchor.menu) || menus.is_open(token.target) || !anchor_hovered {
            return CheckOutcome::StaleIgnored(token.target, token.kind);
        }

        match menus.open_submenu(token.target, env, config) {
            Some((placement, closed)) => {
                self.cancel_menus(&closed);
                CheckOutcome::Opened {
                    menu: token.target,
                    warnings: placement.warnings,
                }
            },
            None => CheckOutcome::StaleIgnored(token.target, token.kind),
        }
    }

    fn fire_close(
        &mut self,
        token: HoverCheckToken,
        menus: &mut MenuInstances,
        env: &dyn Environment,
    ) -> CheckOutcome {
        if !menus.is_open(token.target) {
            return CheckOutcome::StaleIgnored(token.target, token.kind);
        }

        let pointer = env.widget_under_pointer();
        let anchor_hovered = pointer == Some(token.anchor.target());
        let body_hovered = pointer.is_some_and(|hover| menus.is_within(hover.menu, token.target));
        if anchor_hovered || body_hovered {
            return CheckOutcome::KeptOpen(token.target);
        }

        let closed = menus.close(token.target);
        self.cancel_menus(&closed);
        CheckOutcome::Closed(token.target)
    }
}

impl Default for HoverDebouncer {
    fn default() -> Self {
        Self::new(HoverDelays::default())
    }
}
