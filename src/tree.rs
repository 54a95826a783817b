// src/tree.rs

//! The engine context: one object owning graph, layout, router and queue.
//!
//! Construction runs a strict sequential pipeline; every stage completes
//! before the next starts, and the engine only answers queries once the
//! final stage has marked it ready. Before that, queries warn and return
//! harmless defaults instead of panicking. All mutation happens through
//! `&mut self`, which is the serialization point if a concurrent host ever
//! wraps this in a mutex.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use tracing::{debug, info, warn};

use crate::config::model::TreeConfig;
use crate::graph::model::{ItemName, ResearchItem, TechGraph, Tier};
use crate::layout::engine::Layout;
use crate::queue::manager::ResearchQueue;
use crate::route::router::EdgeRouter;
use crate::route::segment::RouteSegment;

/// Which pinned items an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    /// Every pinned item.
    All,
    /// Only pinned items whose position was changed by an edit move.
    Changed,
}

#[derive(Debug, Clone, Default)]
pub struct TechTree {
    graph: TechGraph,
    layout: Layout,
    router: EdgeRouter,
    queue: ResearchQueue,
    initialized: bool,
}

impl TechTree {
    /// Run the full initialization pipeline on validated definitions.
    ///
    /// Stages, in order, each completing before the next: build graph ->
    /// prune redundant prerequisites -> fix tiers -> layout -> route edges ->
    /// sanity check -> mark ready.
    pub fn build(cfg: &TreeConfig) -> Self {
        info!(items = cfg.item.len(), "building research tree");

        let mut graph = TechGraph::from_config(cfg);
        graph.prune_redundant_prerequisites();
        graph.fix_tier_consistency();

        let mut layout = Layout::new(cfg.tree.category_gap);
        layout.compute(&mut graph);

        let mut router = EdgeRouter::new();
        router.rebuild(&graph);

        let mut tree = Self {
            graph,
            layout,
            router,
            queue: ResearchQueue::new(),
            initialized: false,
        };
        tree.sanity_check();
        tree.initialized = true;
        info!(
            items = tree.graph.len(),
            segments = tree.router.len(),
            size = ?tree.layout.size(),
            "research tree ready"
        );
        tree
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Host must not query before the pipeline finishes; warn and let the
    /// caller fall through to a default.
    fn ready(&self, op: &str) -> bool {
        if !self.initialized {
            warn!(op, "engine queried before initialization finished; returning default");
        }
        self.initialized
    }

    // ------------------------------------------------------------------
    // Graph queries
    // ------------------------------------------------------------------

    pub fn graph(&self) -> &TechGraph {
        &self.graph
    }

    pub fn item(&self, name: &str) -> Option<&ResearchItem> {
        self.graph.item(name)
    }

    /// Current coordinate and edit-move flag, if the item exists and is
    /// placed.
    pub fn position(&self, name: &str) -> Option<(i32, i32, bool)> {
        if !self.ready("position") {
            return None;
        }
        self.graph
            .item(name)
            .filter(|i| i.placed)
            .map(|i| (i.x, i.y, i.position_changed))
    }

    /// Grid-space centre of an item's cell, for scroll targeting.
    pub fn center_target(&self, name: &str) -> Option<(f32, f32)> {
        if !self.ready("center_target") {
            return None;
        }
        self.graph.item(name).filter(|i| i.placed).map(|i| i.center())
    }

    // ------------------------------------------------------------------
    // Layout queries
    // ------------------------------------------------------------------

    pub fn layout_size(&self) -> (i32, i32) {
        if !self.ready("layout_size") {
            return (0, 0);
        }
        self.layout.size()
    }

    pub fn tier_left_bounds(&self) -> BTreeMap<Tier, i32> {
        if !self.ready("tier_left_bounds") {
            return BTreeMap::new();
        }
        self.layout.tier_left_bounds().clone()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Authoritative single-item move from edit mode.
    ///
    /// Coordinates clamp to the positive quadrant. Only pinned items accept
    /// moves; auto coordinates belong to the bulk pass and would be
    /// overwritten by the relayout this triggers. A move never partially
    /// invalidates anything: bounds, auto placement, sizes and routing are
    /// all recomputed.
    pub fn move_item(&mut self, name: &str, x: i32, y: i32) {
        if !self.ready("move_item") {
            return;
        }
        let (x, y) = (x.max(0), y.max(0));
        match self.graph.item_mut(name) {
            Some(item) if !item.pinned => {
                warn!(item = %name, "cannot move an auto-placed item; ignoring");
                return;
            }
            Some(item) => {
                if item.x == x && item.y == y {
                    debug!(item = %name, x, y, "move is a no-op");
                    return;
                }
                debug!(item = %name, from = ?(item.x, item.y), to = ?(x, y), "edit move");
                item.x = x;
                item.y = y;
                item.position_changed = true;
            }
            None => {
                warn!(item = %name, "move requested for unknown item; ignoring");
                return;
            }
        }
        self.layout.compute(&mut self.graph);
        self.router.rebuild(&self.graph);
    }

    // ------------------------------------------------------------------
    // Router queries
    // ------------------------------------------------------------------

    pub fn segments(&self) -> &[RouteSegment] {
        if !self.ready("segments") {
            return &[];
        }
        self.router.segments()
    }

    /// Highlight the incoming edges of `name` and of all of its ancestors,
    /// the hover feedback path.
    pub fn set_highlighted(&mut self, name: &str) {
        if !self.ready("set_highlighted") {
            return;
        }
        self.router.set_highlighted(name);
        let ancestors: Vec<ItemName> =
            self.graph.ancestors(name).map(|a| a.to_string()).collect();
        for ancestor in ancestors {
            self.router.set_highlighted(&ancestor);
        }
    }

    pub fn clear_highlighted(&mut self) {
        self.router.clear_highlighted();
    }

    // ------------------------------------------------------------------
    // Queue commands
    // ------------------------------------------------------------------

    pub fn queue_entries(&self) -> &[ItemName] {
        if !self.ready("queue_entries") {
            return &[];
        }
        self.queue.entries()
    }

    /// The active item.
    pub fn active_item(&self) -> Option<&str> {
        self.queue.head()
    }

    /// Number of entries waiting behind the active item.
    pub fn pending_count(&self) -> usize {
        self.queue.pending()
    }

    pub fn is_queued(&self, name: &str) -> bool {
        self.queue.is_queued(name)
    }

    pub fn enqueue(&mut self, name: &str, append: bool) {
        if !self.ready("enqueue") || !self.known(name) {
            return;
        }
        self.queue.enqueue(&self.graph, name, append);
    }

    pub fn enqueue_range(&mut self, names: &[ItemName], append: bool) {
        if !self.ready("enqueue_range") {
            return;
        }
        self.queue.enqueue_range(&self.graph, names, append);
    }

    pub fn insert_at_beginning(&mut self, name: &str) {
        if !self.ready("insert_at_beginning") || !self.known(name) {
            return;
        }
        self.queue.insert_at_beginning(&self.graph, name);
    }

    pub fn insert_at_beginning_range(&mut self, names: &[ItemName]) {
        if !self.ready("insert_at_beginning_range") {
            return;
        }
        self.queue.insert_at_beginning_range(&self.graph, names);
    }

    /// Queue an item together with its incomplete ancestors, in
    /// dependency-safe order.
    pub fn queue_with_prerequisites(&mut self, name: &str, append: bool) {
        if !self.ready("queue_with_prerequisites") || !self.known(name) {
            return;
        }
        let batch = self.with_incomplete_ancestors(name);
        self.queue.enqueue_range(&self.graph, &batch, append);
    }

    /// Front-insert an item together with its incomplete ancestors.
    pub fn insert_with_prerequisites(&mut self, name: &str) {
        if !self.ready("insert_with_prerequisites") || !self.known(name) {
            return;
        }
        let batch = self.with_incomplete_ancestors(name);
        self.queue.insert_at_beginning_range(&self.graph, &batch);
    }

    pub fn dequeue(&mut self, name: &str) {
        if !self.ready("dequeue") {
            return;
        }
        self.queue.dequeue(&self.graph, name);
    }

    pub fn move_queued(&mut self, name: &str, drop_x: f32) {
        if !self.ready("move_queued") {
            return;
        }
        self.queue.move_to(&self.graph, name, drop_x);
    }

    /// Host notification that an item finished. Marks it completed, updates
    /// the queue, and returns the newly active item as the completion
    /// signal back to the host.
    pub fn on_item_completed(&mut self, name: &str) -> Option<ItemName> {
        if !self.ready("on_item_completed") || !self.known(name) {
            return None;
        }
        self.graph.set_completed(name, true);
        let next = self.queue.on_item_completed(name);
        info!(
            item = %name,
            next = next.as_deref().unwrap_or("<none>"),
            "research completed"
        );
        next
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Emit final coordinates of pinned items as a `[pins]` TOML table,
    /// one `"name" = [x, y]` record per item. The output round-trips back
    /// in through `config::apply_pins`.
    pub fn export_positions(&self, scope: ExportScope) -> String {
        if !self.ready("export_positions") {
            return String::new();
        }
        let mut out = String::from("[pins]\n");
        for item in self.graph.items().filter(|i| i.pinned) {
            if scope == ExportScope::Changed && !item.position_changed {
                continue;
            }
            let _ = writeln!(out, "\"{}\" = [{}, {}]", item.name, item.x, item.y);
        }
        out
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn known(&self, name: &str) -> bool {
        if !self.graph.contains(name) {
            warn!(item = %name, "operation names an unknown item; ignoring");
            return false;
        }
        true
    }

    /// The item plus its incomplete ancestors, deduplicated, in name order
    /// (the batch sorters impose the real order).
    fn with_incomplete_ancestors(&self, name: &str) -> Vec<ItemName> {
        let mut batch: Vec<ItemName> = self
            .graph
            .incomplete_ancestors(name)
            .map(|a| a.to_string())
            .collect();
        batch.push(name.to_string());
        batch.sort_unstable();
        batch.dedup();
        batch
    }

    /// Log anomalies in the final placement: overlapping cells and items
    /// outside the positive quadrant. Neither is fatal.
    fn sanity_check(&self) {
        let mut seen: std::collections::HashMap<(i32, i32), &str> =
            std::collections::HashMap::new();
        for item in self.graph.items().filter(|i| i.placed) {
            if let Some(other) = seen.insert((item.x, item.y), item.name.as_str()) {
                warn!(
                    a = %other,
                    b = %item.name,
                    x = item.x,
                    y = item.y,
                    "two items share a grid cell"
                );
            }
            if item.x < 0 || item.y < 0 {
                warn!(item = %item.name, x = item.x, y = item.y, "item placed out of bounds");
            }
        }
    }
}
