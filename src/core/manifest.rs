// Manifest
// The ordered list of assets to place into each build output directory

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::utilities::effective_name;

/// One asset to copy: a source path and an optional destination name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestEntry {
    /// Path relative to the source root; may name a file or a directory
    pub source: String,

    /// Name under the target root (defaults to the source's base name)
    #[serde(default)]
    pub dest: Option<String>,
}

impl ManifestEntry {
    pub fn new(source: impl Into<String>, dest: Option<&str>) -> Self {
        Self {
            source: source.into(),
            dest: dest.map(str::to_string),
        }
    }

    /// Name the entry takes inside a target root
    pub fn target_name(&self) -> String {
        match &self.dest {
            Some(dest) if !dest.is_empty() => dest.clone(),
            _ => effective_name(&self.source),
        }
    }
}

/// Manifest entries plus the target roots they are applied to
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    /// Assets in the order they are processed
    #[serde(default)]
    pub entries: Vec<ManifestEntry>,

    /// Build output directories, relative to the source root
    #[serde(default)]
    pub targets: Vec<PathBuf>,
}

impl Manifest {
    /// Build a manifest from compiled-in tables
    pub fn from_static(entries: &[(&str, Option<&str>)], targets: &[&str]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(source, dest)| ManifestEntry::new(*source, *dest))
                .collect(),
            targets: targets.iter().map(PathBuf::from).collect(),
        }
    }

    /// Load a manifest from a YAML file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

        let manifest = Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid manifest: {}", path.display()))?;

        Ok(manifest)
    }

    /// Parse and validate a manifest from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let manifest: Manifest =
            serde_yaml::from_str(content).context("Failed to parse manifest YAML")?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Reject entries that would read or write outside their roots
    pub fn validate(&self) -> Result<()> {
        for entry in &self.entries {
            check_relative("source", &entry.source)?;
            if let Some(dest) = &entry.dest {
                check_relative("dest", dest)?;
            }
        }
        Ok(())
    }
}

fn check_relative(field: &str, value: &str) -> Result<()> {
    let path = Path::new(value);

    if value.trim().is_empty() {
        bail!("manifest {} must not be empty", field);
    }
    if path.is_absolute() || path.has_root() {
        bail!("manifest {} must be relative: {}", field, value);
    }
    if path.components().any(|c| c == Component::ParentDir) {
        bail!("manifest {} must not contain '..': {}", field, value);
    }

    Ok(())
}
