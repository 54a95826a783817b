// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level research tree definitions as read from a TOML file.
///
/// ```toml
/// [tree]
/// category_gap = 2
///
/// [item.Smithing]
/// tier = 1
/// category = "main"
/// cost = 800.0
/// prerequisites = ["Woodworking"]
/// pos = [3, 2]
/// ```
///
/// The `[tree]` section is optional and has reasonable defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeConfig {
    /// Global layout options from `[tree]`.
    #[serde(default)]
    pub tree: TreeSection,

    /// All research items from `[item.<name>]`.
    ///
    /// Keys are the *item names* (e.g. `"Smithing"`). A `BTreeMap` keeps
    /// iteration in name order, which downstream passes rely on for
    /// reproducible output.
    #[serde(default)]
    pub item: BTreeMap<String, ItemConfig>,
}

/// `[tree]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeSection {
    /// Blank rows separating stacked category bands.
    #[serde(default = "default_category_gap")]
    pub category_gap: i32,

    /// Category assigned to items that do not specify one.
    #[serde(default = "default_category")]
    pub default_category: String,
}

fn default_category_gap() -> i32 {
    2
}

fn default_category() -> String {
    "main".to_string()
}

impl Default for TreeSection {
    fn default() -> Self {
        Self {
            category_gap: default_category_gap(),
            default_category: default_category(),
        }
    }
}

/// `[item.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemConfig {
    /// Ordinal technology tier (0 = earliest).
    pub tier: u32,

    /// Grouping tab for vertical banding.
    ///
    /// If `None`, the item uses `tree.default_category`.
    #[serde(default)]
    pub category: Option<String>,

    /// Research cost, used as a sort tie-breaker when queueing batches.
    #[serde(default)]
    pub cost: f64,

    /// Names of directly prerequisite items.
    #[serde(default)]
    pub prerequisites: Vec<String>,

    /// Whether this item is already completed at load time.
    #[serde(default)]
    pub completed: bool,

    /// Externally authored grid coordinate `[x, y]`.
    ///
    /// Present means the item is *pinned*: the layout pass must not move it.
    /// Absent means the layout pass computes a coordinate.
    #[serde(default)]
    pub pos: Option<[i32; 2]>,
}

impl ItemConfig {
    /// Effective category given the `[tree]` default.
    pub fn effective_category(&self, default_category: &str) -> String {
        self.category
            .clone()
            .unwrap_or_else(|| default_category.to_string())
    }
}
