// src/route/mod.rs

pub mod router;
pub mod segment;

pub use router::EdgeRouter;
pub use segment::{Anchor, CornerQuadrant, RouteSegment, SegmentKind};
