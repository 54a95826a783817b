// src/graph/consistency.rs

//! One-time validation fixes applied right after the graph is built.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, warn};

use crate::graph::model::{ItemName, TechGraph};

impl TechGraph {
    /// Remove direct prerequisites that are already implied transitively.
    ///
    /// A direct prerequisite is redundant when it also appears in the
    /// ancestor closure of another direct prerequisite of the same item.
    /// Logged per item, never fatal.
    pub fn prune_redundant_prerequisites(&mut self) {
        debug!("checking for redundant prerequisites");
        let names: Vec<ItemName> = self.items.keys().cloned().collect();
        let mut pruned_any = false;

        for name in names {
            let prereqs = self.prerequisites_of(&name).to_vec();
            if prereqs.len() < 2 {
                continue;
            }

            // Ancestors reachable through each direct prerequisite (the
            // prerequisite itself excluded, so an edge never invalidates
            // itself).
            let mut implied: HashSet<ItemName> = HashSet::new();
            for p in prereqs.iter() {
                implied.extend(self.ancestors(p).map(|a| a.to_string()));
            }

            let redundant: Vec<ItemName> = prereqs
                .iter()
                .filter(|p| implied.contains(*p))
                .cloned()
                .collect();
            if redundant.is_empty() {
                continue;
            }

            warn!(
                item = %name,
                pruned = %redundant.join(", "),
                "removing redundant prerequisites already implied transitively"
            );
            if let Some(item) = self.item_mut(&name) {
                item.prerequisites.retain(|p| !redundant.contains(p));
            }
            pruned_any = true;
        }

        if pruned_any {
            self.rebuild_dependents();
        }
    }

    /// Raise every item's tier to at least the max tier among its direct
    /// prerequisites, propagating to dependents breadth-first.
    ///
    /// This never fails: tiers only move up, the tier domain is finite and
    /// the item count bounded, so the work queue drains.
    pub fn fix_tier_consistency(&mut self) {
        debug!("checking tier consistency");
        let mut queue: VecDeque<ItemName> = self.items.keys().cloned().collect();

        while let Some(name) = queue.pop_front() {
            let Some(item) = self.item(&name) else {
                continue;
            };
            let tier = item.tier;
            let max_prereq_tier = item
                .prerequisites
                .iter()
                .filter_map(|p| self.item(p))
                .map(|p| p.tier)
                .max();

            let Some(max_prereq_tier) = max_prereq_tier else {
                continue;
            };
            if tier >= max_prereq_tier {
                continue;
            }

            warn!(
                item = %name,
                tier,
                raised_to = max_prereq_tier,
                "item has a lower tier than one of its prerequisites; raising"
            );
            if let Some(item) = self.item_mut(&name) {
                item.tier = max_prereq_tier;
            }
            // Dependents may now violate the same rule; re-check them.
            for dep in self.dependents_of(&name).to_vec() {
                queue.push_back(dep);
            }
        }
    }
}
