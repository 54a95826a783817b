#![allow(dead_code)]

use std::collections::BTreeMap;
use techtree::config::{ItemConfig, TreeConfig, TreeSection};

/// Builder for `TreeConfig` to simplify test setup.
pub struct TreeConfigBuilder {
    config: TreeConfig,
}

impl TreeConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: TreeConfig {
                tree: TreeSection::default(),
                item: BTreeMap::new(),
            },
        }
    }

    pub fn with_item(mut self, name: &str, item: ItemConfig) -> Self {
        self.config.item.insert(name.to_string(), item);
        self
    }

    pub fn with_category_gap(mut self, gap: i32) -> Self {
        self.config.tree.category_gap = gap;
        self
    }

    pub fn with_default_category(mut self, category: &str) -> Self {
        self.config.tree.default_category = category.to_string();
        self
    }

    pub fn build(self) -> TreeConfig {
        self.config
    }
}

impl Default for TreeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ItemConfig`.
pub struct ItemConfigBuilder {
    item: ItemConfig,
}

impl ItemConfigBuilder {
    pub fn new(tier: u32) -> Self {
        Self {
            item: ItemConfig {
                tier,
                category: None,
                cost: 0.0,
                prerequisites: vec![],
                completed: false,
                pos: None,
            },
        }
    }

    pub fn prereq(mut self, dep: &str) -> Self {
        self.item.prerequisites.push(dep.to_string());
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.item.category = Some(category.to_string());
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.item.cost = cost;
        self
    }

    pub fn completed(mut self, val: bool) -> Self {
        self.item.completed = val;
        self
    }

    pub fn pinned_at(mut self, x: i32, y: i32) -> Self {
        self.item.pos = Some([x, y]);
        self
    }

    pub fn build(self) -> ItemConfig {
        self.item
    }
}
