//! Shared JSON fixtures for StructVista tests.
//!
//! `fixtures/manifest.json` at the workspace root names every fixture and
//! tags each command script with the structure it drives:
//!
//! ```json
//! { "scenarios": { "list-basics": { "path": "scenarios/list_basics.json", "structure": "linked-list" } },
//!   "configs": { "fast-seeded": { "path": "configs/fast_seeded.json" } } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    scenarios: BTreeMap<String, Entry>,
    #[serde(default)]
    configs: BTreeMap<String, Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    /// Relative to `fixtures/`.
    path: String,
    /// Structure kind a scenario selects, in its wire spelling.
    #[serde(default)]
    structure: Option<String>,
}

/// One section of the manifest.
#[derive(Debug, Clone, Copy)]
pub struct FixtureSet {
    label: &'static str,
    entries: &'static BTreeMap<String, Entry>,
}

/// Command scripts with their expected end state.
pub fn scenarios() -> FixtureSet {
    FixtureSet {
        label: "scenario",
        entries: &MANIFEST.scenarios,
    }
}

/// Standalone app configs.
pub fn configs() -> FixtureSet {
    FixtureSet {
        label: "config",
        entries: &MANIFEST.configs,
    }
}

impl FixtureSet {
    /// Names in sorted order.
    pub fn keys(&self) -> Vec<&'static str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Names tagged with `structure`, in sorted order.
    pub fn for_structure(&self, structure: &str) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|(_, e)| e.structure.as_deref() == Some(structure))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn structure(&self, name: &str) -> Result<Option<&'static str>> {
        Ok(self.entry(name)?.structure.as_deref())
    }

    pub fn path(&self, name: &str) -> Result<PathBuf> {
        Ok(fixtures_root().join(&self.entry(name)?.path))
    }

    pub fn json(&self, name: &str) -> Result<String> {
        let path = self.path(name)?;
        fs::read_to_string(&path)
            .with_context(|| format!("failed to read {} fixture at {}", self.label, path.display()))
    }

    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let text = self.json(name)?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse {} fixture '{name}'", self.label))
    }

    fn entry(&self, name: &str) -> Result<&'static Entry> {
        self.entries
            .get(name)
            .ok_or_else(|| anyhow!("unknown {} fixture '{name}'", self.label))
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}
