// Core infrastructure module
// Configuration and the manifest that drives a run

pub mod app_config;
pub mod manifest;

pub use app_config::{AppConfig, SyncOptions};
pub use manifest::{Manifest, ManifestEntry};
