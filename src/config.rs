use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Name of the optional per-project configuration file.
pub const CONFIG_FILE: &str = ".incdeps.toml";

/// Tunable thresholds and string constants consumed by the reporting layer
/// and the build-file reader. The core compares these; it never interprets
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Marker line identifying regenerated build files.
    pub regen_tag: String,
    /// Substrings in a build-file line that declare a library target.
    pub library_aliases: BTreeSet<String>,
    /// Substrings in a build-file line that declare an executable target.
    pub executable_aliases: BTreeSet<String>,
    /// File names excluded from the walk.
    pub blacklist: BTreeSet<String>,
    /// Outward edges beyond this count make a component an outlier.
    pub component_link_limit: usize,
    pub component_loc_lower_limit: usize,
    pub component_loc_upper_limit: usize,
    pub file_loc_upper_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            regen_tag: "generated by incdeps".to_string(),
            library_aliases: ["add_library".to_string()].into(),
            executable_aliases: ["add_executable".to_string()].into(),
            blacklist: BTreeSet::new(),
            component_link_limit: 30,
            component_loc_lower_limit: 200,
            component_loc_upper_limit: 20_000,
            file_loc_upper_limit: 2_000,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Reads `.incdeps.toml` from `dir` when present, falling back to the
    /// defaults (with a warning on a malformed file).
    pub fn load_or_default(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Warning: {err:#}; using default configuration");
                Self::default()
            }
        }
    }
}
