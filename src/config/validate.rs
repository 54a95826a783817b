// src/config/validate.rs

use anyhow::anyhow;

use crate::config::model::TreeConfig;
use crate::errors::{Result, TechTreeError};

/// Run basic semantic validation against a loaded definitions file.
///
/// This checks:
/// - there is at least one item
/// - all `prerequisites` refer to existing items
/// - costs are not negative
///
/// It does **not**:
/// - reject cyclic prerequisite chains (the graph build excludes those
///   items and warns, instead of failing the whole tree)
/// - check tier ordering against prerequisites (auto-corrected later)
pub fn validate_config(cfg: &TreeConfig) -> Result<()> {
    ensure_has_items(cfg)?;
    validate_prerequisite_references(cfg)?;
    validate_costs(cfg)?;
    Ok(())
}

fn ensure_has_items(cfg: &TreeConfig) -> Result<()> {
    if cfg.item.is_empty() {
        return Err(TechTreeError::ConfigError(
            "definitions must contain at least one [item.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_prerequisite_references(cfg: &TreeConfig) -> Result<()> {
    for (name, item) in cfg.item.iter() {
        for dep in item.prerequisites.iter() {
            if !cfg.item.contains_key(dep) {
                return Err(TechTreeError::Other(anyhow!(
                    "item '{}' has unknown prerequisite '{}'",
                    name,
                    dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_costs(cfg: &TreeConfig) -> Result<()> {
    for (name, item) in cfg.item.iter() {
        if item.cost < 0.0 || !item.cost.is_finite() {
            return Err(TechTreeError::ConfigError(format!(
                "item '{}' has invalid cost {}",
                name, item.cost
            )));
        }
    }
    Ok(())
}
