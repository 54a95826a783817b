// src/config/loader.rs

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::model::TreeConfig;
use crate::config::validate::validate_config;
use crate::errors::Result;

/// Load a definitions file from a given path.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (prerequisite references, etc.). Use [`load_and_validate`] for
/// that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<TreeConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: TreeConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a definitions file from path and run basic validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - an empty item table,
///   - unknown `prerequisites` references,
///   - negative costs.
///
/// Cyclic prerequisite chains are deliberately *not* rejected here: the graph
/// build pass excludes them with a warning and keeps going.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<TreeConfig> {
    let config = load_from_path(&path)?;
    validate_config(&config)?;
    Ok(config)
}

/// On-disk shape of an exported position overlay.
///
/// This is exactly what `TechTree::export_positions` produces, so a user can
/// save the export to a file and feed it back in with `--pins`.
#[derive(Debug, Clone, Deserialize)]
struct PinsFile {
    #[serde(default)]
    pins: BTreeMap<String, [i32; 2]>,
}

/// Merge a `[pins]` overlay file into an already-loaded configuration.
///
/// Every entry pins the named item at the given coordinate. Entries naming
/// unknown items are skipped with a warning rather than failing the load.
pub fn apply_pins(config: &mut TreeConfig, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let overlay: PinsFile = toml::from_str(&contents)?;

    let mut applied = 0usize;
    for (name, pos) in overlay.pins {
        match config.item.get_mut(&name) {
            Some(item) => {
                item.pos = Some(pos);
                applied += 1;
            }
            None => {
                warn!(item = %name, "pins overlay names an unknown item; skipping");
            }
        }
    }
    debug!(applied, path = %path.display(), "applied pins overlay");

    Ok(())
}

/// Helper to resolve a default config path.
///
/// Currently this just returns `Tree.toml` in the current working directory,
/// but this function exists so you can later:
///
/// - Respect an env var (e.g. `TECHTREE_CONFIG`).
/// - Look for multiple default locations.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Tree.toml")
}
