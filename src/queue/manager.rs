// src/queue/manager.rs

//! The ordered research queue.
//!
//! Entries are item names, no duplicates; the head is the *active* item.
//! Every public operation leaves the queue dependency-consistent: a queued
//! incomplete prerequisite always sits at a lower index than its dependent.
//! Insertions restore that invariant with a targeted fix-up pass rather
//! than a re-sort, so untouched entries keep their relative order. Batch
//! operations lean on the placement invariant (dependency edges point to
//! greater X), so sorting by (layout X, cost) is a cheap topological proxy.

use tracing::{debug, warn};

use crate::graph::model::{ItemName, TechGraph};

/// Width of one queue slot, in the host's anchor coordinate space.
pub const QUEUE_SLOT_WIDTH: f32 = 140.0;
/// Gap between adjacent queue slots.
pub const QUEUE_SLOT_GAP: f32 = 6.0;

/// Ordered sequence of items selected for processing.
///
/// Owned exclusively by the engine; nothing else may reorder it.
#[derive(Debug, Clone, Default)]
pub struct ResearchQueue {
    entries: Vec<ItemName>,
}

impl ResearchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current order, head first.
    pub fn entries(&self) -> &[ItemName] {
        &self.entries
    }

    /// The active item: the head of the queue.
    pub fn head(&self) -> Option<&str> {
        self.entries.first().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries waiting behind the active item.
    pub fn pending(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    pub fn is_queued(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e == name)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Centre of slot `index` in the host's anchor coordinate space, the
    /// space `move_to` drop positions arrive in.
    pub fn slot_center(&self, index: usize) -> f32 {
        QUEUE_SLOT_GAP
            + index as f32 * (QUEUE_SLOT_WIDTH + QUEUE_SLOT_GAP)
            + QUEUE_SLOT_WIDTH / 2.0
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e == name)
    }

    /// Append an item; with `append = false` the queue is replaced.
    /// Idempotent for already-queued items.
    ///
    /// If a queued dependent of the item was already waiting, the fix-up
    /// pass pulls the new entry in front of it.
    pub fn enqueue(&mut self, graph: &TechGraph, name: &str, append: bool) {
        if !append {
            self.entries.clear();
        }
        if self.is_queued(name) {
            return;
        }
        self.entries.push(name.to_string());
        debug!(item = %name, "enqueued");
        self.reconcile_dependents(graph, name);
    }

    /// Enqueue a batch in dependency-safe order: ascending (layout X, cost).
    pub fn enqueue_range(&mut self, graph: &TechGraph, names: &[ItemName], append: bool) {
        if !append {
            self.entries.clear();
        }
        for name in sorted_by_depth(graph, names, false) {
            self.enqueue(graph, &name, true);
        }
    }

    /// Move (or insert) an item to the front; it becomes the active item
    /// unless a queued incomplete prerequisite has to be pulled in front
    /// of it.
    pub fn insert_at_beginning(&mut self, graph: &TechGraph, name: &str) {
        if let Some(idx) = self.index_of(name) {
            self.entries.remove(idx);
        }
        self.entries.insert(0, name.to_string());
        debug!(item = %name, "inserted at queue head");
        self.reconcile(graph, name);
    }

    /// Front-insert a batch, deepest dependency first (descending
    /// (layout X, cost)), so shallower items finish closer to the head.
    pub fn insert_at_beginning_range(&mut self, graph: &TechGraph, names: &[ItemName]) {
        for name in sorted_by_depth(graph, names, true) {
            self.insert_at_beginning(graph, &name);
        }
    }

    /// Remove an item, cascading to every queued entry whose
    /// incomplete-ancestor closure contains it (those entries became
    /// unsatisfiable).
    pub fn dequeue(&mut self, graph: &TechGraph, name: &str) {
        if let Some(idx) = self.index_of(name) {
            self.entries.remove(idx);
            debug!(item = %name, "dequeued");
        }
        let orphaned: Vec<ItemName> = self
            .entries
            .iter()
            .filter(|e| graph.has_incomplete_ancestor(e.as_str(), name))
            .cloned()
            .collect();
        for entry in orphaned {
            if let Some(idx) = self.index_of(&entry) {
                self.entries.remove(idx);
                debug!(item = %entry, removed = %name, "dequeued dependent of removed item");
            }
        }
    }

    /// Reorder an item to the slot nearest `drop_x`, then restore the
    /// dependency invariant for it and for every queued incomplete
    /// descendant it may have displaced.
    pub fn move_to(&mut self, graph: &TechGraph, name: &str, drop_x: f32) {
        if !self.is_queued(name) {
            warn!(item = %name, "move requested for an item not in the queue; ignoring");
            return;
        }

        // Nearest slot by anchor distance; ties keep the earlier slot.
        let mut target = 0usize;
        let mut best = f32::INFINITY;
        for index in 0..self.entries.len() {
            let dist = (self.slot_center(index) - drop_x).abs();
            if dist < best {
                best = dist;
                target = index;
            }
        }

        if let Some(idx) = self.index_of(name) {
            self.entries.remove(idx);
        }
        let target = target.min(self.entries.len());
        self.entries.insert(target, name.to_string());
        debug!(item = %name, index = target, "moved within queue");

        self.reconcile(graph, name);
        self.reconcile_dependents(graph, name);
    }

    /// Pull queued incomplete prerequisites of `name` in front of it,
    /// recursively for each pulled prerequisite.
    ///
    /// Untouched entries keep their relative order; this is a targeted
    /// fix-up, not a re-sort. Iterative with an explicit work stack so a
    /// pathological dependency chain cannot blow the call stack.
    pub fn reconcile(&mut self, graph: &TechGraph, name: &str) {
        let mut stack: Vec<ItemName> = vec![name.to_string()];

        while let Some(current) = stack.pop() {
            let Some(at) = self.index_of(&current) else {
                continue;
            };
            let prereqs: Vec<ItemName> = graph
                .prerequisites_of(&current)
                .iter()
                .filter(|p| !graph.is_completed(p))
                .cloned()
                .collect();
            for prereq in prereqs {
                if let Some(found) = self.index_of(&prereq) {
                    if found > at {
                        self.entries.remove(found);
                        self.entries.insert(at, prereq.clone());
                        debug!(item = %prereq, before = %current, "pulled prerequisite forward");
                        stack.push(prereq);
                    }
                }
            }
        }
    }

    /// Run the fix-up on every queued incomplete descendant of `name`.
    fn reconcile_dependents(&mut self, graph: &TechGraph, name: &str) {
        let displaced: Vec<ItemName> = graph
            .descendants(name)
            .filter(|d| !graph.is_completed(d) && self.is_queued(d))
            .map(|d| d.to_string())
            .collect();
        for dep in displaced {
            self.reconcile(graph, &dep);
        }
    }

    /// Handle external completion of an item.
    ///
    /// The completed item is expected to be the active head; if it is not,
    /// that is logged and it is removed anyway. Returns the newly active
    /// item, if any.
    pub fn on_item_completed(&mut self, name: &str) -> Option<ItemName> {
        if self.is_queued(name) {
            if self.head() != Some(name) {
                warn!(
                    item = %name,
                    head = self.head().unwrap_or("<none>"),
                    "completed item was queued but not active; removing anyway"
                );
            }
            if let Some(idx) = self.index_of(name) {
                self.entries.remove(idx);
            }
        } else {
            warn!(item = %name, "completed item was not queued");
        }
        let next = self.entries.first().cloned();
        debug!(item = %name, next = next.as_deref().unwrap_or("<none>"), "completion processed");
        next
    }
}

/// Sort a batch by (layout X, cost); the placement invariant makes this a
/// valid stand-in for topological order. Unknown names are dropped with a
/// warning. Stable, so equal keys keep the caller's order.
fn sorted_by_depth(graph: &TechGraph, names: &[ItemName], descending: bool) -> Vec<ItemName> {
    let mut known: Vec<ItemName> = Vec::with_capacity(names.len());
    for name in names {
        if graph.contains(name) {
            known.push(name.clone());
        } else {
            warn!(item = %name, "batch names an unknown item; skipping");
        }
    }
    known.sort_by(|a, b| {
        let key = |name: &ItemName| {
            graph
                .item(name)
                .map(|i| (i.x, i.cost))
                .unwrap_or((0, 0.0))
        };
        let (xa, ca) = key(a);
        let (xb, cb) = key(b);
        let ord = xa.cmp(&xb).then(ca.total_cmp(&cb));
        if descending { ord.reverse() } else { ord }
    });
    known
}
