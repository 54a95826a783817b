// src/graph/model.rs

use std::collections::BTreeMap;

/// Name of a research item, as declared in `[item.<name>]`.
pub type ItemName = String;

/// Ordinal technology tier. Higher means later.
pub type Tier = u32;

/// Grouping tab used for vertical banding in the layout.
pub type Category = String;

/// A single research item plus its layout state.
#[derive(Debug, Clone)]
pub struct ResearchItem {
    pub name: ItemName,
    pub tier: Tier,
    pub category: Category,
    pub cost: f64,

    /// Direct prerequisites (names in `prerequisites = [...]`).
    pub prerequisites: Vec<ItemName>,
    /// Direct dependents: items that list this one as a prerequisite.
    pub dependents: Vec<ItemName>,

    pub completed: bool,

    /// Grid column ("depth"). Dependency edges always point to greater X.
    pub x: i32,
    /// Grid row ("lane").
    pub y: i32,
    /// Whether a coordinate has been assigned (pinned or auto-placed).
    pub placed: bool,
    /// Coordinate was authored externally; the layout pass must not move it.
    pub pinned: bool,
    /// Coordinate differs from what the definitions supplied (edit moves).
    pub position_changed: bool,
}

impl ResearchItem {
    /// Grid-space centre of the item's cell, for scroll targeting.
    pub fn center(&self) -> (f32, f32) {
        (self.x as f32 + 0.5, self.y as f32 + 0.5)
    }
}

/// The immutable-after-build research DAG.
///
/// Items are keyed by name in a `BTreeMap`, so every iteration over the graph
/// happens in name order. Tier fix-up and `completed` flags are the only
/// mutations after construction, besides coordinates (owned by the layout
/// pass and the edit move).
#[derive(Debug, Clone, Default)]
pub struct TechGraph {
    pub(crate) items: BTreeMap<ItemName, ResearchItem>,
}

impl TechGraph {
    /// Return all item names in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(|s| s.as_str())
    }

    /// All items in name order.
    pub fn items(&self) -> impl Iterator<Item = &ResearchItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn item(&self, name: &str) -> Option<&ResearchItem> {
        self.items.get(name)
    }

    pub(crate) fn item_mut(&mut self, name: &str) -> Option<&mut ResearchItem> {
        self.items.get_mut(name)
    }

    /// Direct prerequisites of an item.
    pub fn prerequisites_of(&self, name: &str) -> &[ItemName] {
        self.items
            .get(name)
            .map(|n| n.prerequisites.as_slice())
            .unwrap_or(&[])
    }

    /// Direct dependents of an item.
    pub fn dependents_of(&self, name: &str) -> &[ItemName] {
        self.items
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_pinned(&self, name: &str) -> bool {
        self.items.get(name).map(|n| n.pinned).unwrap_or(false)
    }

    pub fn is_completed(&self, name: &str) -> bool {
        self.items.get(name).map(|n| n.completed).unwrap_or(false)
    }

    /// Mark an item completed (driven by the host's completion notification).
    pub fn set_completed(&mut self, name: &str, completed: bool) {
        if let Some(item) = self.items.get_mut(name) {
            item.completed = completed;
        }
    }

    /// Rebuild every item's dependent list from the prerequisite lists.
    pub(crate) fn rebuild_dependents(&mut self) {
        let names: Vec<ItemName> = self.items.keys().cloned().collect();
        for item in self.items.values_mut() {
            item.dependents.clear();
        }
        for name in names {
            let deps = self
                .items
                .get(&name)
                .map(|n| n.prerequisites.clone())
                .unwrap_or_default();
            for dep in deps {
                if let Some(dep_item) = self.items.get_mut(&dep) {
                    dep_item.dependents.push(name.clone());
                }
            }
        }
    }
}
