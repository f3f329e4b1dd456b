// Build script - reads config.yaml at compile time and generates the default manifest
// This allows changing the asset list during development without editing source code

use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Tell Cargo to rerun if config.yaml changes
    println!("cargo:rerun-if-changed=src/config.yaml");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("compiled_config.rs");

    // Try to read config.yaml from src/, fall back to an empty manifest if not found
    let config = if Path::new("src/config.yaml").exists() {
        let content = fs::read_to_string("src/config.yaml")
            .expect("Failed to read src/config.yaml");
        parse_config(&content)
    } else {
        CompiledConfig::default()
    };

    // Generate Rust code with the compiled-in values
    let generated = format!(
        r#"// Auto-generated from config.yaml at compile time
// Do not edit - modify config.yaml and rebuild instead

pub const MANIFEST: &[(&str, Option<&str>)] = &[
{entries}
];

pub const TARGET_DIRS: &[&str] = &[
{targets}
];
"#,
        entries = config.entries
            .iter()
            .map(|(source, dest)| match dest {
                Some(dest) => format!("    ({:?}, Some({:?})),", source, dest),
                None => format!("    ({:?}, None),", source),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        targets = config.targets
            .iter()
            .map(|t| format!("    {:?},", t))
            .collect::<Vec<_>>()
            .join("\n"),
    );

    fs::write(&dest_path, generated).expect("Failed to write compiled config");
}

#[derive(Default)]
struct CompiledConfig {
    entries: Vec<(String, Option<String>)>,
    targets: Vec<String>,
}

fn parse_config(content: &str) -> CompiledConfig {
    let mut config = CompiledConfig::default();

    // Simple YAML parsing (avoiding external dependencies in build script)
    let mut in_entries = false;
    let mut in_targets = false;

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // Track which section we're in
        if trimmed.starts_with("entries:") {
            in_entries = true;
            in_targets = false;
            continue;
        } else if trimmed.starts_with("targets:") {
            in_entries = false;
            in_targets = true;
            continue;
        }

        if in_entries {
            let item = trimmed.strip_prefix("- ").unwrap_or(trimmed);
            if let Some((key, value)) = parse_kv(item) {
                match key {
                    // A new list item always starts with its source
                    "source" if trimmed.starts_with("- ") => {
                        config.entries.push((value.to_string(), None));
                    }
                    "dest" => {
                        if let Some(last) = config.entries.last_mut() {
                            last.1 = Some(value.to_string());
                        }
                    }
                    _ => {}
                }
            }
        } else if in_targets {
            if let Some(value) = trimmed.strip_prefix("- ") {
                config.targets.push(unquote(value).to_string());
            }
        }
    }

    config
}

fn parse_kv(line: &str) -> Option<(&str, &str)> {
    // Find the colon separator
    let colon_pos = line.find(':')?;
    let key = line[..colon_pos].trim();
    let mut value = line[colon_pos + 1..].trim();

    // Remove inline comments
    if let Some(comment_pos) = value.find(" #") {
        value = value[..comment_pos].trim();
    }

    // Skip if value is empty (section header)
    if value.is_empty() {
        return None;
    }

    Some((key, unquote(value)))
}

fn unquote(s: &str) -> &str {
    let s = s.trim();
    s.trim_matches('"').trim_matches('\'')
}
