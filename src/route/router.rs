// src/route/router.rs

//! Orthogonal edge routing with shared-segment deduplication.
//!
//! Every prerequisite edge becomes a path of unit segments: out of the
//! parent's column, vertically to the child's row, then horizontally into
//! the child, with quarter-circle corners at the turns. Segments are keyed
//! by `(anchor, kind)`, so channels shared by several edges are stored (and
//! drawn) once; each shared segment accumulates the dependent items passing
//! through it for highlight propagation.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::graph::model::{ItemName, ResearchItem, TechGraph};
use crate::route::segment::{Anchor, CornerQuadrant, RouteSegment, SegmentKind};

/// Derived routing state. Fully rebuilt from graph + coordinates; never
/// survives a relayout.
#[derive(Debug, Clone, Default)]
pub struct EdgeRouter {
    segments: Vec<RouteSegment>,
    index: HashMap<(Anchor, SegmentKind), usize>,
    by_destination: HashMap<ItemName, Vec<usize>>,
}

impl EdgeRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All segments, in creation order.
    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Drop every segment and index. Must run before a relayout re-routes,
    /// so no segment can reference superseded coordinates.
    pub fn clear_all(&mut self) {
        self.segments.clear();
        self.index.clear();
        self.by_destination.clear();
    }

    /// Re-derive all segments from the graph's placed coordinates.
    pub fn rebuild(&mut self, graph: &TechGraph) {
        self.clear_all();
        for child in graph.items() {
            if !child.placed {
                continue;
            }
            for prereq in child.prerequisites.iter() {
                match graph.item(prereq) {
                    Some(parent) if parent.placed => self.add_edge(parent, child),
                    Some(_) => {}
                    None => {
                        warn!(item = %child.name, prereq = %prereq, "edge references an unknown item");
                    }
                }
            }
        }
        debug!(segments = self.segments.len(), "routed edges");
    }

    /// Route one prerequisite edge (`parent` -> `child`).
    ///
    /// The vertical run lives in the column just right of the parent; the
    /// horizontal run lives on the child's row. Over-corner caps keep long
    /// runs visually continuous where corners of other edges punch holes.
    pub fn add_edge(&mut self, parent: &ResearchItem, child: &ResearchItem) {
        let (x1, y1) = (parent.x, parent.y);
        let (x2, y2) = (child.x, child.y);
        let col = x1 + 1;

        let dy = y2 - y1;
        if dy > 0 {
            // Child sits below: turn right-to-down, run down to its row.
            self.attach(child, Anchor::new(col, y1), SegmentKind::Corner(CornerQuadrant::RightTop));
            for i in 0..dy {
                self.attach(child, Anchor::new(col, y1 + i), SegmentKind::Vertical);
                if i > 0 {
                    self.attach(child, Anchor::new(col, y1 + i), SegmentKind::VerticalOverCorner);
                }
            }
        } else if dy < 0 {
            // Child sits above: turn right-to-up, run up to its row.
            self.attach(child, Anchor::new(col, y1), SegmentKind::Corner(CornerQuadrant::RightBottom));
            for k in 0..-dy {
                self.attach(child, Anchor::new(col, y1 - k - 1), SegmentKind::Vertical);
                if k > 0 {
                    self.attach(child, Anchor::new(col, y1 - k), SegmentKind::VerticalOverCorner);
                }
            }
        } else {
            // Same row: straight through, no vertical run.
            self.attach(child, Anchor::new(col, y2), SegmentKind::HorizontalOverCorner);
        }

        let dx = x2 - x1;
        if dx > 0 {
            if dy > 0 {
                self.attach(child, Anchor::new(col, y2), SegmentKind::Corner(CornerQuadrant::LeftBottom));
            } else if dy < 0 {
                self.attach(child, Anchor::new(col, y2), SegmentKind::Corner(CornerQuadrant::LeftTop));
            } else {
                self.attach(child, Anchor::new(x2, y2), SegmentKind::HorizontalOverCorner);
            }
            for j in 0..dx - 1 {
                self.attach(child, Anchor::new(col + j, y2), SegmentKind::Horizontal);
                self.attach(child, Anchor::new(col + 1 + j, y2), SegmentKind::HorizontalOverCorner);
            }
        }

        self.attach(child, Anchor::new(col, y1), SegmentKind::StartStub);
        self.attach(child, Anchor::new(x2, y2), SegmentKind::EndArrow);
    }

    /// Look up or create the segment at `(anchor, kind)` and record `child`
    /// as one of its destinations.
    fn attach(&mut self, child: &ResearchItem, anchor: Anchor, kind: SegmentKind) {
        let idx = match self.index.get(&(anchor, kind)) {
            Some(&idx) => idx,
            None => {
                let idx = self.segments.len();
                self.segments.push(RouteSegment::new(anchor, kind));
                self.index.insert((anchor, kind), idx);
                idx
            }
        };
        if self.segments[idx].destinations.insert(child.name.clone()) {
            self.by_destination
                .entry(child.name.clone())
                .or_default()
                .push(idx);
        }
    }

    /// Highlight every segment that carries an edge into `name`.
    pub fn set_highlighted(&mut self, name: &str) {
        let Some(indices) = self.by_destination.get(name) else {
            return;
        };
        for &idx in indices {
            self.segments[idx].highlighted = true;
        }
    }

    /// Reset all highlight flags.
    pub fn clear_highlighted(&mut self) {
        for segment in self.segments.iter_mut() {
            segment.highlighted = false;
        }
    }
}
