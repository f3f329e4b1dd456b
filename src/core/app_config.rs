// Application Configuration
// Defaults compiled from config.yaml at build time
// Modify config.yaml and rebuild to change these values

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::Manifest;

// Include the auto-generated config from build.rs
pub mod compiled {
    include!(concat!(env!("OUT_DIR"), "/compiled_config.rs"));
}

/// Behaviour switches for a run
///
/// `force` only matters when `sync` is off; sync mode overwrites stale
/// files on its own terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Reconcile destinations: copy new and changed files, remove orphans
    pub sync: bool,
    /// Replace existing destination entries instead of skipping them
    pub force: bool,
}

/// Everything the manifest driver needs for one run
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Assets and target roots
    pub manifest: Manifest,

    /// Mode flags
    pub options: SyncOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            manifest: Manifest::from_static(compiled::MANIFEST, compiled::TARGET_DIRS),
            options: SyncOptions::default(),
        }
    }
}

impl AppConfig {
    /// Use the manifest at `path`, or the compiled-in one when `None`
    pub fn load(manifest_path: Option<&Path>) -> Result<Self> {
        match manifest_path {
            Some(path) => Ok(Self {
                manifest: Manifest::load(path)?,
                options: SyncOptions::default(),
            }),
            None => Ok(Self::default()),
        }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the manifest's target roots (ignored when empty)
    pub fn with_targets(mut self, targets: Vec<PathBuf>) -> Self {
        if !targets.is_empty() {
            self.manifest.targets = targets;
        }
        self
    }
}
