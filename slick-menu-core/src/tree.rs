//! Menu trees
//!
//! A [MenuTree] is the immutable description of a menu: an ordered list of labelled
//! entries, each either a leaf [Action] or a nested submenu. Trees are built once
//! from a declarative [MenuSpec] and never change afterwards.

use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::MenuError;

/// A zero-argument callback run when a leaf entry is activated.
pub type Action = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// Wrap a closure into an [Action].
pub fn action<F>(f: F) -> Action
where
    F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A value in a [MenuSpec].
#[derive(Clone)]
pub enum SpecValue {
    /// A leaf action.
    Action(Action),
    /// A nested mapping that becomes a submenu.
    Submenu(MenuSpec),
    /// Declarative data. Strings name an action in an [ActionRegistry], tables are
    /// nested mappings; anything else is rejected when the tree is built.
    Value(toml::Value),
}

impl fmt::Debug for SpecValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecValue::Action(_) => f.write_str("Action(..)"),
            SpecValue::Submenu(spec) => f.debug_tuple("Submenu").field(spec).finish(),
            SpecValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

impl From<MenuSpec> for SpecValue {
    fn from(spec: MenuSpec) -> Self {
        SpecValue::Submenu(spec)
    }
}

impl From<toml::Value> for SpecValue {
    fn from(value: toml::Value) -> Self {
        SpecValue::Value(value)
    }
}

impl From<&str> for SpecValue {
    /// A registered action name.
    fn from(name: &str) -> Self {
        SpecValue::Value(toml::Value::String(name.to_string()))
    }
}

impl From<i64> for SpecValue {
    fn from(value: i64) -> Self {
        SpecValue::Value(toml::Value::Integer(value))
    }
}

impl From<i32> for SpecValue {
    fn from(value: i32) -> Self {
        SpecValue::Value(toml::Value::Integer(value.into()))
    }
}

impl From<f64> for SpecValue {
    fn from(value: f64) -> Self {
        SpecValue::Value(toml::Value::Float(value))
    }
}

impl From<bool> for SpecValue {
    fn from(value: bool) -> Self {
        SpecValue::Value(toml::Value::Boolean(value))
    }
}

/// Ordered mapping from labels to actions or nested mappings.
///
/// Insertion order is the vertical order of the menu rows.
#[derive(Clone, Debug, Default)]
pub struct MenuSpec {
    entries: IndexMap<String, SpecValue>,
}

impl MenuSpec {
    /// Create an empty specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a leaf action.
    pub fn action<F>(self, label: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.entry(label, SpecValue::Action(action(f)))
    }

    /// Add a nested submenu.
    pub fn submenu(self, label: impl Into<String>, spec: MenuSpec) -> Self {
        self.entry(label, SpecValue::Submenu(spec))
    }

    /// Add an arbitrary value.
    ///
    /// Re-using a label replaces the earlier value but keeps its position.
    pub fn entry(mut self, label: impl Into<String>, value: impl Into<SpecValue>) -> Self {
        self.entries.insert(label.into(), value.into());
        self
    }

    /// Parse a specification from a TOML document.
    ///
    /// ```toml
    /// Copy = "copy"
    /// Paste = "paste"
    ///
    /// [Share]
    /// Mail = "share_mail"
    /// ```
    ///
    /// Tables become submenus and strings name actions in an [ActionRegistry].
    pub fn from_toml(content: &str) -> Result<Self, MenuError> {
        let table: toml::Table = content.parse()?;
        Ok(table.into_iter().map(|(key, value)| (key, SpecValue::Value(value))).collect())
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the specification has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SpecValue)> {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<SpecValue>> FromIterator<(K, V)> for MenuSpec {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Named actions that declarative specifications can refer to.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Action>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), action(f));
    }

    /// Builder form of [register](Self::register).
    pub fn with<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(name, f);
        self
    }

    /// Look up an action.
    pub fn get(&self, name: &str) -> Option<Action> {
        self.actions.get(name).cloned()
    }

    /// Check if an action is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }
}

/// What activating a [MenuEntry] does.
#[derive(Clone)]
pub enum EntryPayload {
    /// Runs an action.
    Action(Action),
    /// Opens a nested menu.
    Submenu(MenuTree),
}

impl fmt::Debug for EntryPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryPayload::Action(_) => f.write_str("Action(..)"),
            EntryPayload::Submenu(tree) => f.debug_tuple("Submenu").field(tree).finish(),
        }
    }
}

/// One row of a menu.
#[derive(Clone, Debug)]
pub struct MenuEntry {
    /// Display label.
    pub label: String,
    /// Leaf action or nested menu.
    pub payload: EntryPayload,
}

impl MenuEntry {
    /// Check if this entry opens a submenu.
    pub fn is_submenu(&self) -> bool {
        matches!(self.payload, EntryPayload::Submenu(_))
    }
}

/// Immutable, ordered menu description.
#[derive(Clone, Debug, Default)]
pub struct MenuTree {
    entries: Vec<MenuEntry>,
}

impl MenuTree {
    /// Build a tree from a specification without named actions.
    pub fn build(spec: &MenuSpec) -> Result<Self, MenuError> {
        Self::build_with(spec, &ActionRegistry::default())
    }

    /// Build a tree, resolving action names through `registry`.
    ///
    /// Fails on the first entry that is neither an action nor a nested mapping;
    /// nothing is partially built.
    pub fn build_with(spec: &MenuSpec, registry: &ActionRegistry) -> Result<Self, MenuError> {
        let entries = spec
            .iter()
            .map(|(key, value)| {
                let payload = match value {
                    SpecValue::Action(action) => EntryPayload::Action(action.clone()),
                    SpecValue::Submenu(nested) => {
                        EntryPayload::Submenu(Self::build_with(nested, registry)?)
                    },
                    SpecValue::Value(value) => resolve_value(key, value, registry)?,
                };
                Ok(MenuEntry {
                    label: key.clone(),
                    payload,
                })
            })
            .collect::<Result<Vec<_>, MenuError>>()?;

        Ok(Self { entries })
    }

    /// The entries in display order.
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the menu has no rows.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by label.
    pub fn get(&self, label: &str) -> Option<&MenuEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }

    /// Number of menu levels, counting this one.
    pub fn depth(&self) -> usize {
        1 + self
            .entries
            .iter()
            .filter_map(|entry| match &entry.payload {
                EntryPayload::Submenu(tree) => Some(tree.depth()),
                EntryPayload::Action(_) => None,
            })
            .max()
            .unwrap_or(0)
    }
}

fn resolve_value(
    key: &str,
    value: &toml::Value,
    registry: &ActionRegistry,
) -> Result<EntryPayload, MenuError> {
    match value {
        toml::Value::String(name) => registry
            .get(name)
            .map(EntryPayload::Action)
            .ok_or_else(|| MenuError::UnknownAction {
                key: key.to_string(),
                name: name.clone(),
            }),
        toml::Value::Table(table) => {
            let nested: MenuSpec = table
                .iter()
                .map(|(k, v)| (k.clone(), SpecValue::Value(v.clone())))
                .collect();
            MenuTree::build_with(&nested, registry).map(EntryPayload::Submenu)
        },
        other => Err(MenuError::InvalidEntryKind {
            key: key.to_string(),
            found: other.type_str().to_string(),
        }),
    }
}
