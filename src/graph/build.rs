// src/graph/build.rs

use std::collections::{BTreeMap, BTreeSet, HashSet};

use petgraph::graphmap::DiGraphMap;
use tracing::{debug, warn};

use crate::config::model::TreeConfig;
use crate::graph::model::{ItemName, ResearchItem, TechGraph};

impl TechGraph {
    /// Build the research DAG from validated definitions.
    ///
    /// Items whose prerequisite closure includes themselves (a direct
    /// self-reference or any longer cycle) are excluded, together with every
    /// item whose ancestor closure contains an excluded item. This never
    /// fails; exclusions are logged once as a warning.
    pub fn from_config(cfg: &TreeConfig) -> Self {
        let excluded = cyclic_closure(cfg);
        if !excluded.is_empty() {
            let names: Vec<&str> = excluded.iter().map(|s| s.as_str()).collect();
            warn!(
                count = names.len(),
                items = %names.join(", "),
                "excluding items with cyclic prerequisite chains (and their dependents)"
            );
        }

        let mut items: BTreeMap<ItemName, ResearchItem> = BTreeMap::new();
        for (name, ic) in cfg.item.iter() {
            if excluded.contains(name) {
                continue;
            }
            let prerequisites: Vec<ItemName> = ic
                .prerequisites
                .iter()
                .filter(|p| cfg.item.contains_key(*p) && !excluded.contains(*p))
                .cloned()
                .collect();

            let (x, y, pinned) = match ic.pos {
                Some([x, y]) => (x, y, true),
                None => (-1, -1, false),
            };

            items.insert(
                name.clone(),
                ResearchItem {
                    name: name.clone(),
                    tier: ic.tier,
                    category: ic.effective_category(&cfg.tree.default_category),
                    cost: ic.cost,
                    prerequisites,
                    dependents: Vec::new(),
                    completed: ic.completed,
                    x,
                    y,
                    placed: pinned,
                    pinned,
                    position_changed: false,
                },
            );
        }

        let mut graph = Self { items };
        graph.rebuild_dependents();
        debug!(items = graph.len(), excluded = excluded.len(), "built research graph");
        graph
    }
}

/// Names of all items on a prerequisite cycle, plus every item that
/// (transitively) depends on one of them.
fn cyclic_closure(cfg: &TreeConfig) -> BTreeSet<ItemName> {
    // Edge direction: prerequisite -> item, mirroring the queue/layout view
    // of the graph.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.item.keys() {
        graph.add_node(name.as_str());
    }

    // Items listing themselves as a prerequisite are cyclic on their own;
    // they are kept out of the petgraph edges and seeded directly below.
    let mut excluded: HashSet<&str> = HashSet::new();
    for (name, item) in cfg.item.iter() {
        for dep in item.prerequisites.iter() {
            if dep == name {
                excluded.insert(name.as_str());
            } else if cfg.item.contains_key(dep) {
                graph.add_edge(dep.as_str(), name.as_str(), ());
            }
        }
    }

    // An SCC with more than one member is a longer cycle.
    for scc in petgraph::algo::tarjan_scc(&graph) {
        if scc.len() > 1 {
            excluded.extend(scc);
        }
    }

    // Forward sweep: anything reachable from an excluded item over the
    // dependent relation is unsatisfiable and goes too.
    let mut stack: Vec<&str> = excluded.iter().copied().collect();
    while let Some(name) = stack.pop() {
        for (_, dependent, _) in graph.edges(name) {
            if excluded.insert(dependent) {
                stack.push(dependent);
            }
        }
    }

    excluded.into_iter().map(|s| s.to_string()).collect()
}
