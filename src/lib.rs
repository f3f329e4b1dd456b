// Asset Sync Library
// Post-build asset synchronizer: places a manifest of resources into build output directories

// Core infrastructure - configuration and the manifest
pub mod core;

// Errors raised by filesystem operations
pub mod error;

// Operations - change detection, sync primitives and the manifest driver
pub mod operations;

// UI - console progress output
pub mod ui;

// Utilities - helper functions and tools
pub mod utilities;

// Re-export commonly used items for convenience
pub use crate::core::{AppConfig, Manifest, ManifestEntry, SyncOptions};
pub use error::{Result, SyncError};
pub use operations::{EntryAction, ManifestDriver, Reporter, RunReport};
pub use ui::ConsoleReporter;
