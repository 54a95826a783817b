// src/layout/engine.rs

//! Grid placement of research items.
//!
//! Pinned items keep their externally authored coordinates; everything else
//! is auto-placed tier by tier so that dependency edges always point to a
//! strictly greater column, then stacked into per-category bands below the
//! pinned block. The whole pass is deterministic: re-running it on an
//! unchanged graph reproduces identical coordinates.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::{debug, trace, warn};

use crate::graph::model::{Category, ItemName, TechGraph, Tier};

/// Vertical row span of one category's band, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub start: i32,
    pub end: i32,
}

/// Layout state derived from the graph plus pinned coordinates.
///
/// Owned by the engine context; rebuilt wholesale by [`Layout::compute`],
/// never patched incrementally.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    category_gap: i32,
    tier_left_bounds: BTreeMap<Tier, i32>,
    category_bands: BTreeMap<Category, Band>,
    /// Full grid extent (columns, rows) over all placed items.
    size: (i32, i32),
    /// Grid extent of the pinned block alone.
    pinned_size: (i32, i32),
}

impl Layout {
    pub fn new(category_gap: i32) -> Self {
        Self {
            category_gap: category_gap.max(0),
            ..Self::default()
        }
    }

    /// Left column bound for each tier, in ascending tier order.
    pub fn tier_left_bounds(&self) -> &BTreeMap<Tier, i32> {
        &self.tier_left_bounds
    }

    /// Row span of each auto-placed category band.
    pub fn category_bands(&self) -> &BTreeMap<Category, Band> {
        &self.category_bands
    }

    /// Full grid extent (columns, rows).
    pub fn size(&self) -> (i32, i32) {
        self.size
    }

    /// Grid extent of the pinned block alone.
    pub fn pinned_size(&self) -> (i32, i32) {
        self.pinned_size
    }

    /// Run the full placement pass: tier bounds, auto placement, category
    /// bands and grid sizes.
    ///
    /// An authoritative coordinate change (a relayout after an edit move)
    /// always comes back through here; nothing is invalidated partially.
    pub fn compute(&mut self, graph: &mut TechGraph) {
        debug!("computing layout");
        self.reset_auto_items(graph);
        self.warn_on_pinned_collisions(graph);
        self.seed_tier_bounds_from_pins(graph);
        let local_rows = self.place_auto_items(graph);
        self.stack_category_bands(graph, local_rows);
        self.update_sizes(graph);
    }

    fn reset_auto_items(&self, graph: &mut TechGraph) {
        for name in graph.names().map(str::to_string).collect::<Vec<_>>() {
            if let Some(item) = graph.item_mut(&name) {
                if !item.pinned {
                    item.x = -1;
                    item.y = -1;
                    item.placed = false;
                }
            }
        }
    }

    /// Duplicate pinned coordinates are tolerated (the items will overlap on
    /// screen) but worth a warning so the layout author can fix the defs.
    fn warn_on_pinned_collisions(&self, graph: &TechGraph) {
        let mut seen: HashMap<(i32, i32), &str> = HashMap::new();
        for item in graph.items().filter(|i| i.pinned) {
            if let Some(other) = seen.insert((item.x, item.y), &item.name) {
                warn!(
                    item = %item.name,
                    other = %other,
                    x = item.x,
                    y = item.y,
                    "pinned items share a coordinate; keeping both"
                );
            }
        }
    }

    /// Tiers that contain pinned items anchor their left bound at the
    /// minimum pinned column. Bounds for the remaining tiers are chained
    /// from the previous tier during placement.
    fn seed_tier_bounds_from_pins(&mut self, graph: &TechGraph) {
        self.tier_left_bounds.clear();
        for item in graph.items().filter(|i| i.pinned) {
            self.tier_left_bounds
                .entry(item.tier)
                .and_modify(|b| *b = (*b).min(item.x))
                .or_insert(item.x);
        }
        for (tier, bound) in self.tier_left_bounds.iter() {
            trace!(tier, bound, "tier left bound from pinned items");
        }
    }

    /// Place every unpinned item, tier by tier. Returns each auto item's
    /// band-local row (columns are final, rows are shifted per category
    /// afterwards).
    fn place_auto_items(&mut self, graph: &mut TechGraph) -> HashMap<ItemName, i32> {
        let tiers: BTreeSet<Tier> = graph.items().map(|i| i.tier).collect();
        let mut occupancy: HashMap<Category, HashSet<(i32, i32)>> = HashMap::new();
        let mut local_rows: HashMap<ItemName, i32> = HashMap::new();
        let mut prev_tier: Option<Tier> = None;

        for &tier in tiers.iter() {
            self.ensure_tier_bound(graph, tier, prev_tier, &local_rows);
            let bound = self.tier_left_bounds[&tier];

            // Name order; the deterministic tie-break for items that become
            // ready in the same round.
            let mut remaining: Vec<ItemName> = graph
                .items()
                .filter(|i| !i.pinned && i.tier == tier)
                .map(|i| i.name.clone())
                .collect();

            while !remaining.is_empty() {
                // Ready: no prerequisite still waiting in this tier. Placing
                // ready items first keeps every edge pointing to a greater
                // column even across categories.
                let ready: Vec<ItemName> = remaining
                    .iter()
                    .filter(|n| {
                        graph
                            .prerequisites_of(n.as_str())
                            .iter()
                            .all(|p| !remaining.contains(p))
                    })
                    .cloned()
                    .collect();
                if ready.is_empty() {
                    // Unreachable on a DAG; bail out instead of spinning.
                    warn!(tier, stuck = remaining.len(), "no ready items in tier; skipping rest");
                    break;
                }
                remaining.retain(|n| !ready.contains(n));

                for name in ready {
                    self.place_one(graph, &name, bound, &mut occupancy, &mut local_rows);
                }
            }

            prev_tier = Some(tier);
        }

        local_rows
    }

    /// Chain a bound for a tier without pinned items: one past the widest
    /// column the previous tier's auto items used, so tiers never regress
    /// horizontally.
    fn ensure_tier_bound(
        &mut self,
        graph: &TechGraph,
        tier: Tier,
        prev_tier: Option<Tier>,
        local_rows: &HashMap<ItemName, i32>,
    ) {
        if self.tier_left_bounds.contains_key(&tier) {
            return;
        }
        let prev_max_x = prev_tier
            .map(|prev| {
                graph
                    .items()
                    .filter(|i| !i.pinned && i.tier == prev && local_rows.contains_key(&i.name))
                    .map(|i| i.x)
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0);
        let bound = prev_max_x + 1;
        trace!(tier, bound, "tier left bound chained from previous tier");
        self.tier_left_bounds.insert(tier, bound);
    }

    fn place_one(
        &self,
        graph: &mut TechGraph,
        name: &str,
        bound: i32,
        occupancy: &mut HashMap<Category, HashSet<(i32, i32)>>,
        local_rows: &mut HashMap<ItemName, i32>,
    ) {
        let Some(item) = graph.item(name) else {
            warn!(item = %name, "asked to place an unknown item; ignoring");
            return;
        };
        let (category, x, seed_y) = {
            let max_placed_prereq_x = item
                .prerequisites
                .iter()
                .filter_map(|p| graph.item(p))
                .filter(|p| p.placed)
                .map(|p| p.x)
                .max();
            let x = match max_placed_prereq_x {
                Some(px) => (px + 1).max(bound),
                None => bound,
            };

            // Rows start next to the closest same-category prerequisite so
            // related chains stay visually adjacent. Pinned prerequisites
            // live in the pinned block, outside this band's row space.
            let seed_y = item
                .prerequisites
                .iter()
                .filter(|p| {
                    graph
                        .item(p)
                        .map(|pi| pi.category == item.category)
                        .unwrap_or(false)
                })
                .filter_map(|p| local_rows.get(p.as_str()))
                .min()
                .copied()
                .unwrap_or(0)
                .max(0);

            (item.category.clone(), x, seed_y)
        };

        let cells = occupancy.entry(category).or_default();
        let mut y = seed_y;
        while cells.contains(&(x, y)) {
            y += 1;
        }
        cells.insert((x, y));

        local_rows.insert(name.to_string(), y);
        if let Some(item) = graph.item_mut(name) {
            item.x = x;
            item.y = y;
            item.placed = true;
            trace!(item = %name, x, y, "auto-placed (band-local row)");
        }
    }

    /// Stack auto categories into vertical bands below the pinned block,
    /// largest category first, separated by blank gap rows.
    fn stack_category_bands(&mut self, graph: &mut TechGraph, local_rows: HashMap<ItemName, i32>) {
        self.category_bands.clear();

        let mut counts: BTreeMap<Category, (usize, i32)> = BTreeMap::new();
        for item in graph.items().filter(|i| !i.pinned && i.placed) {
            let entry = counts.entry(item.category.clone()).or_insert((0, 0));
            entry.0 += 1;
            entry.1 = entry.1.max(item.y);
        }

        let mut ordered: Vec<(Category, usize, i32)> = counts
            .into_iter()
            .map(|(cat, (count, max_y))| (cat, count, max_y))
            .collect();
        // Descending by population; BTreeMap already gave name order for ties.
        ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let pinned_max_y = graph
            .items()
            .filter(|i| i.pinned)
            .map(|i| i.y)
            .max();
        let mut next_start = match pinned_max_y {
            Some(max_y) => max_y + 1 + self.category_gap,
            None => 0,
        };

        for (category, count, local_max_y) in ordered {
            let band = Band {
                start: next_start,
                end: next_start + local_max_y,
            };
            debug!(
                category = %category,
                items = count,
                start = band.start,
                end = band.end,
                "category band"
            );
            for name in local_rows.keys() {
                let Some(item) = graph.item_mut(name) else {
                    continue;
                };
                if item.category == category && !item.pinned {
                    item.y += band.start;
                }
            }
            self.category_bands.insert(category, band);
            next_start = band.end + 1 + self.category_gap;
        }
    }

    fn update_sizes(&mut self, graph: &TechGraph) {
        let placed = || graph.items().filter(|i| i.placed);
        self.size = (
            placed().map(|i| i.x).max().unwrap_or(-1) + 1,
            placed().map(|i| i.y).max().unwrap_or(-1) + 1,
        );
        let pinned = || graph.items().filter(|i| i.pinned);
        self.pinned_size = (
            pinned().map(|i| i.x).max().unwrap_or(-1) + 1,
            pinned().map(|i| i.y).max().unwrap_or(-1) + 1,
        );
        trace!(size = ?self.size, pinned_size = ?self.pinned_size, "updated grid sizes");
    }
}
