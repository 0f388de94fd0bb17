//! Shared JSON fixtures for the animfix test suites.
//!
//! Fixture files live under the workspace `fixtures/` directory and are
//! looked up by name through `fixtures/manifest.json`.

use std::collections::HashMap;
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
    scenes: HashMap<String, String>,
    #[serde(rename = "clip-libraries")]
    clip_libraries: HashMap<String, String>,
    #[serde(default)]
    configs: HashMap<String, String>,
    controllers: HashMap<String, ControllerEntry>,
}

/// A controller fixture is either a single controller file or a merge case:
/// the controllers to merge plus the expected result.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ControllerEntry {
    Path(String),
    Merge {
        sources: Vec<String>,
        #[serde(default)]
        expected: Option<String>,
    },
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

macro_rules! simple_fixture_module {
    ($module:ident, $field:ident, $kind:literal) => {
        pub mod $module {
            use super::*;

            pub fn keys() -> Vec<String> {
                MANIFEST.$field.keys().cloned().collect()
            }

            pub fn json(name: &str) -> Result<String> {
                let rel = lookup(&MANIFEST.$field, $kind, name)?;
                read_to_string(rel)
            }

            pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
                let rel = lookup(&MANIFEST.$field, $kind, name)?;
                super::load_json(rel)
            }

            pub fn path(name: &str) -> Result<PathBuf> {
                let rel = lookup(&MANIFEST.$field, $kind, name)?;
                Ok(resolve_path(rel))
            }
        }
    };
}

simple_fixture_module!(scenes, scenes, "scene");
simple_fixture_module!(clip_libraries, clip_libraries, "clip library");
simple_fixture_module!(configs, configs, "config");

pub mod controllers {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.controllers.keys().cloned().collect()
    }

    /// Load a single-controller fixture.
    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        match lookup(&MANIFEST.controllers, "controller", name)? {
            ControllerEntry::Path(rel) => super::load_json(rel),
            ControllerEntry::Merge { .. } => {
                Err(anyhow!("controller fixture '{name}' is a merge case"))
            }
        }
    }

    /// Load the sources of a merge case, in merge order.
    pub fn merge_sources<T: DeserializeOwned>(name: &str) -> Result<Vec<T>> {
        match lookup(&MANIFEST.controllers, "controller", name)? {
            ControllerEntry::Merge { sources, .. } => {
                sources.iter().map(|rel| super::load_json(rel)).collect()
            }
            ControllerEntry::Path(_) => {
                Err(anyhow!("controller fixture '{name}' is not a merge case"))
            }
        }
    }

    /// Expected merge result, when the case declares one.
    pub fn merge_expected<T: DeserializeOwned>(name: &str) -> Result<Option<T>> {
        match lookup(&MANIFEST.controllers, "controller", name)? {
            ControllerEntry::Merge { expected, .. } => match expected {
                Some(rel) => super::load_json(rel).map(Some),
                None => Ok(None),
            },
            ControllerEntry::Path(_) => {
                Err(anyhow!("controller fixture '{name}' is not a merge case"))
            }
        }
    }
}
