// Utilities module
// Helper functions and tools

pub mod paths;

pub use paths::{display_relative, effective_name, normalize_path, resolve_path};
