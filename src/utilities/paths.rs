// Path Utilities
// Helper functions for path manipulation

use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving . and .. components
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                components.pop();
            }
            Component::CurDir => {}
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Resolve a path relative to a base directory
pub fn resolve_path(base: &Path, relative: impl AsRef<Path>) -> PathBuf {
    let relative = relative.as_ref();
    if relative.is_absolute() {
        relative.to_path_buf()
    } else {
        normalize_path(&base.join(relative))
    }
}

/// Base name of a manifest source, ignoring trailing separators
///
/// `resources/sound/` yields `sound`; a path with no name yields it unchanged.
pub fn effective_name(source: &str) -> String {
    let trimmed = source.trim_end_matches(['/', '\\']);

    trimmed
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(source)
        .to_string()
}

/// Show `path` relative to `base` when it lives underneath it
pub fn display_relative(path: &Path, base: &Path) -> String {
    let path = normalize_path(path);
    let base = normalize_path(base);

    match path.strip_prefix(&base) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.display().to_string(),
        _ => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        let path = Path::new("a/b/../c/./d");
        assert_eq!(normalize_path(path), PathBuf::from("a/c/d"));
    }

    #[test]
    fn test_resolve_path() {
        let base = Path::new("/home/user/project");
        assert_eq!(
            resolve_path(base, "target/debug"),
            PathBuf::from("/home/user/project/target/debug")
        );
        assert_eq!(resolve_path(base, "resources/sound/"), PathBuf::from("/home/user/project/resources/sound"));
        assert_eq!(resolve_path(base, "/opt/out"), PathBuf::from("/opt/out"));
    }

    #[test]
    fn test_effective_name() {
        assert_eq!(effective_name("resources/sound/"), "sound");
        assert_eq!(effective_name("resources/sound//"), "sound");
        assert_eq!(effective_name("lib\\windows\\libvosk.dll"), "libvosk.dll");
        assert_eq!(effective_name("models"), "models");
        assert_eq!(effective_name("/"), "/");
    }

    #[test]
    fn test_display_relative() {
        let base = Path::new("/work/jarvis");
        assert_eq!(display_relative(Path::new("/work/jarvis/target/debug"), base), "target/debug");
        assert_eq!(display_relative(Path::new("/elsewhere/out"), base), "/elsewhere/out");
    }
}
