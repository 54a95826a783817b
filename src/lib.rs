// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod graph;
pub mod layout;
pub mod logging;
pub mod queue;
pub mod route;
pub mod tree;

use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::cli::{CliArgs, ExportArg};
use crate::config::loader::{apply_pins, load_and_validate};
use crate::config::model::TreeConfig;
use crate::tree::{ExportScope, TechTree};

pub use crate::graph::{Category, ItemName, ResearchItem, Tier};
pub use crate::layout::{Band, GridRect};
pub use crate::route::{Anchor, CornerQuadrant, RouteSegment, SegmentKind};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - definitions loading (+ optional pins overlay)
/// - the initialization pipeline
/// - dry-run / export / summary output
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let mut cfg = load_and_validate(&config_path)?;

    if let Some(pins_path) = &args.pins {
        apply_pins(&mut cfg, PathBuf::from(pins_path))?;
    }

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let tree = TechTree::build(&cfg);

    match args.export {
        Some(ExportArg::All) => print!("{}", tree.export_positions(ExportScope::All)),
        Some(ExportArg::Changed) => print!("{}", tree.export_positions(ExportScope::Changed)),
        None => print_summary(&tree),
    }

    Ok(())
}

/// Simple dry-run output: print items, tiers and prerequisites.
fn print_dry_run(cfg: &TreeConfig) {
    println!("techtree dry-run");
    println!("  tree.category_gap = {}", cfg.tree.category_gap);
    println!("  tree.default_category = {}", cfg.tree.default_category);
    println!();

    println!("items ({}):", cfg.item.len());
    for (name, item) in cfg.item.iter() {
        println!("  - {name}");
        println!("      tier: {}", item.tier);
        if let Some(ref category) = item.category {
            println!("      category: {category}");
        }
        if item.cost > 0.0 {
            println!("      cost: {}", item.cost);
        }
        if !item.prerequisites.is_empty() {
            println!("      prerequisites: {:?}", item.prerequisites);
        }
        if let Some(pos) = item.pos {
            println!("      pos: {:?}", pos);
        }
        if item.completed {
            println!("      completed: true");
        }
    }

    debug!("dry-run complete (no layout)");
}

/// Post-layout summary: grid size, tier bounds, category bands.
fn print_summary(tree: &TechTree) {
    let (w, h) = tree.layout_size();
    println!("laid out {} items on a {w} x {h} grid", tree.graph().len());

    println!("tier left bounds:");
    for (tier, bound) in tree.tier_left_bounds() {
        println!("  tier {tier}: column {bound}");
    }

    println!("category bands:");
    for (category, band) in tree.layout().category_bands() {
        println!("  {category}: rows {} - {}", band.start, band.end);
    }

    println!("route segments: {}", tree.segments().len());
}
