// src/graph/traverse.rs

//! Lazy traversals over the prerequisite / dependent relations.
//!
//! All traversals are breadth-first with a visited set, yield each reachable
//! item exactly once, and exclude the start item. No ordering beyond "some
//! valid traversal order" is guaranteed; callers must not rely on it.

use std::collections::{HashSet, VecDeque};

use crate::graph::model::TechGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Follow prerequisites (towards the roots).
    Up,
    /// Follow dependents (towards the leaves).
    Down,
}

/// Restartable breadth-first walk over one of the two relations.
///
/// Created by [`TechGraph::ancestors`], [`TechGraph::descendants`] or
/// [`TechGraph::incomplete_ancestors`]; call the constructor again for a
/// fresh traversal.
pub struct Walk<'g> {
    graph: &'g TechGraph,
    direction: Direction,
    /// Restrict the walk to incomplete items (and stop at completed ones).
    only_incomplete: bool,
    queue: VecDeque<&'g str>,
    seen: HashSet<&'g str>,
}

impl<'g> Walk<'g> {
    fn new(graph: &'g TechGraph, start: &str, direction: Direction, only_incomplete: bool) -> Self {
        let mut walk = Self {
            graph,
            direction,
            only_incomplete,
            queue: VecDeque::new(),
            seen: HashSet::new(),
        };
        if let Some((key, _)) = graph.items.get_key_value(start) {
            // The start item itself is never yielded, but it is marked seen so
            // a cycle back to it cannot re-yield it.
            walk.seen.insert(key.as_str());
            walk.expand(key.as_str());
        }
        walk
    }

    fn neighbours(&self, name: &str) -> &'g [String] {
        match self.direction {
            Direction::Up => self.graph.prerequisites_of(name),
            Direction::Down => self.graph.dependents_of(name),
        }
    }

    fn expand(&mut self, name: &str) {
        // Split borrows: collect first, then mutate the queue.
        let next: Vec<&'g str> = self
            .neighbours(name)
            .iter()
            .map(|s| s.as_str())
            .filter(|n| !self.seen.contains(n))
            .filter(|n| !self.only_incomplete || !self.graph.is_completed(n))
            .collect();
        for n in next {
            self.seen.insert(n);
            self.queue.push_back(n);
        }
    }
}

impl<'g> Iterator for Walk<'g> {
    type Item = &'g str;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.queue.pop_front()?;
        self.expand(name);
        Some(name)
    }
}

impl TechGraph {
    /// Transitive closure over prerequisites, self excluded.
    pub fn ancestors<'g>(&'g self, name: &str) -> Walk<'g> {
        Walk::new(self, name, Direction::Up, false)
    }

    /// Transitive closure over the dependent relation, self excluded.
    pub fn descendants<'g>(&'g self, name: &str) -> Walk<'g> {
        Walk::new(self, name, Direction::Down, false)
    }

    /// Ancestors restricted to incomplete items.
    ///
    /// A completed prerequisite ends its branch: its own ancestors are not
    /// visited. This is the closure the queue uses to decide which entries a
    /// removal makes unsatisfiable.
    pub fn incomplete_ancestors<'g>(&'g self, name: &str) -> Walk<'g> {
        Walk::new(self, name, Direction::Up, true)
    }

    /// True if `ancestor` appears in the incomplete-ancestor closure of `name`.
    pub fn has_incomplete_ancestor(&self, name: &str, ancestor: &str) -> bool {
        self.incomplete_ancestors(name).any(|a| a == ancestor)
    }
}
