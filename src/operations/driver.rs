// Manifest Driver
// Applies the manifest to every target root

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, info_span};

use super::sync::{copy_file, copy_tree, create_dir_all, remove_path, sync_directory, sync_file};
use super::{DirSyncStats, FileOutcome};
use crate::core::{AppConfig, ManifestEntry, SyncOptions};
use crate::error::Result;
use crate::utilities::resolve_path;

/// What a manifest source turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    /// Missing, or neither a regular file nor a directory
    Unknown,
}

/// What the driver did with one manifest entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryAction {
    /// Destination was absent and has been created
    Copied,
    /// Destination existed and was replaced (force)
    Overwritten,
    /// Destination existed and was left alone
    AlreadyExists,
    /// Destination file was stale and has been refreshed (sync)
    Updated,
    /// Nothing to do (sync)
    UpToDate,
    /// Directory reconciled with at least one change (sync)
    Synced(DirSyncStats),
    /// Source is neither a file nor a directory
    Unknown,
}

impl EntryAction {
    /// True if the destination was modified
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            Self::Copied | Self::Overwritten | Self::Updated | Self::Synced(_)
        )
    }
}

/// Result of applying one manifest entry to one target root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    /// Source path as written in the manifest
    pub source: String,
    /// Destination name under the target root
    pub target_name: String,
    pub kind: EntryKind,
    pub action: EntryAction,
}

/// All entries applied to a single target root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub root: PathBuf,
    pub entries: Vec<EntryReport>,
}

/// Summary of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Target roots that were processed, in order
    pub targets: Vec<TargetReport>,
    /// Target roots skipped because they are not directories
    pub skipped: Vec<PathBuf>,
}

impl RunReport {
    /// True if no destination was modified anywhere
    pub fn is_up_to_date(&self) -> bool {
        self.targets
            .iter()
            .flat_map(|t| &t.entries)
            .all(|e| !e.action.is_change())
    }
}

/// Receives progress as the driver works through the manifest
pub trait Reporter {
    /// Called once before any target root is touched
    fn run_started(&mut self, _options: &SyncOptions) {}

    fn target_skipped(&mut self, _root: &Path) {}

    fn entry(&mut self, _root: &Path, _report: &EntryReport) {}

    /// Completion marker for a target root
    fn target_done(&mut self, _root: &Path) {}
}

/// Reporter that discards everything
#[derive(Debug, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Drives the manifest against each target root in turn
pub struct ManifestDriver {
    /// Root that manifest sources and relative target roots resolve against
    source_root: PathBuf,
    config: AppConfig,
}

impl ManifestDriver {
    /// Create a new driver for the given source root and configuration
    pub fn new(source_root: impl Into<PathBuf>, config: AppConfig) -> Self {
        Self {
            source_root: source_root.into(),
            config,
        }
    }

    /// Apply every manifest entry to every existing target root
    ///
    /// Stops at the first filesystem error; everything done before it stays
    /// in place.
    pub fn run(&self, reporter: &mut dyn Reporter) -> Result<RunReport> {
        let mut report = RunReport::default();

        reporter.run_started(&self.config.options);

        for target in &self.config.manifest.targets {
            let root = resolve_path(&self.source_root, target);

            if !root.is_dir() {
                info!(root = %root.display(), "skipping target, not a directory");
                reporter.target_skipped(&root);
                report.skipped.push(root);
                continue;
            }

            report.targets.push(self.run_target(&root, reporter)?);
            reporter.target_done(&root);
        }

        Ok(report)
    }

    /// Apply the manifest to a single target root
    pub fn run_target(&self, root: &Path, reporter: &mut dyn Reporter) -> Result<TargetReport> {
        let _span = info_span!("target", root = %root.display()).entered();
        let mut entries = Vec::with_capacity(self.config.manifest.entries.len());

        for entry in &self.config.manifest.entries {
            let entry_report = self.apply_entry(root, entry)?;
            reporter.entry(root, &entry_report);
            entries.push(entry_report);
        }

        Ok(TargetReport {
            root: root.to_path_buf(),
            entries,
        })
    }

    fn apply_entry(&self, root: &Path, entry: &ManifestEntry) -> Result<EntryReport> {
        let source = resolve_path(&self.source_root, &entry.source);
        let target_name = entry.target_name();
        let dest = resolve_path(root, &target_name);

        let (kind, action) = if source.is_dir() {
            (EntryKind::Directory, self.apply_directory(&source, &dest)?)
        } else if source.is_file() {
            (EntryKind::File, self.apply_file(&source, &dest)?)
        } else {
            (EntryKind::Unknown, EntryAction::Unknown)
        };

        info!(source = %entry.source, dest = %dest.display(), ?action, "entry applied");

        Ok(EntryReport {
            source: entry.source.clone(),
            target_name,
            kind,
            action,
        })
    }

    fn apply_directory(&self, source: &Path, dest: &Path) -> Result<EntryAction> {
        let options = self.config.options;

        if options.sync {
            // A linked destination is replaced, never synced through
            if is_real_dir(dest) {
                let stats = sync_directory(source, dest)?;
                return Ok(if stats.is_up_to_date() {
                    EntryAction::UpToDate
                } else {
                    EntryAction::Synced(stats)
                });
            }
            // A file or link squatting on the directory's name is not worth keeping
            if exists(dest) {
                remove_path(dest)?;
            }
            copy_tree(source, dest)?;
            return Ok(EntryAction::Copied);
        }

        if exists(dest) {
            if !options.force {
                return Ok(EntryAction::AlreadyExists);
            }
            remove_path(dest)?;
            copy_tree(source, dest)?;
            return Ok(EntryAction::Overwritten);
        }

        copy_tree(source, dest)?;
        Ok(EntryAction::Copied)
    }

    fn apply_file(&self, source: &Path, dest: &Path) -> Result<EntryAction> {
        let options = self.config.options;

        if options.sync {
            return Ok(match sync_file(source, dest)? {
                FileOutcome::Copied => EntryAction::Copied,
                FileOutcome::Updated => EntryAction::Updated,
                FileOutcome::Unchanged => EntryAction::UpToDate,
            });
        }

        if exists(dest) {
            if !options.force {
                return Ok(EntryAction::AlreadyExists);
            }
            remove_path(dest)?;
            place_file(source, dest)?;
            return Ok(EntryAction::Overwritten);
        }

        place_file(source, dest)?;
        Ok(EntryAction::Copied)
    }
}

fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn is_real_dir(path: &Path) -> bool {
    fs::symlink_metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

fn place_file(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        create_dir_all(parent)?;
    }
    copy_file(source, dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Manifest;
    use crate::error::SyncError;
    use tempfile::tempdir;

    #[derive(Default)]
    struct Recorder {
        lines: Vec<String>,
    }

    impl Reporter for Recorder {
        fn target_skipped(&mut self, root: &Path) {
            self.lines.push(format!("skip {}", root.display()));
        }

        fn entry(&mut self, _root: &Path, report: &EntryReport) {
            self.lines.push(format!("{} {:?}", report.target_name, report.action));
        }

        fn target_done(&mut self, root: &Path) {
            self.lines.push(format!("done {}", root.file_name().unwrap().to_string_lossy()));
        }
    }

    fn config(entries: &[(&str, Option<&str>)], targets: &[&str], options: SyncOptions) -> AppConfig {
        AppConfig {
            manifest: Manifest::from_static(entries, targets),
            options,
        }
    }

    #[test]
    fn test_missing_target_is_skipped() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("target/debug")).unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let driver = ManifestDriver::new(
            dir.path(),
            config(&[("a.txt", None)], &["target/debug", "target/release"], SyncOptions::default()),
        );
        let mut recorder = Recorder::default();
        let report = driver.run(&mut recorder).unwrap();

        assert_eq!(report.targets.len(), 1);
        assert_eq!(report.skipped, vec![dir.path().join("target/release")]);
        assert_eq!(
            recorder.lines,
            vec![
                "a.txt Copied".to_string(),
                "done debug".to_string(),
                format!("skip {}", dir.path().join("target/release").display()),
            ]
        );
    }

    #[test]
    fn test_unknown_entry_does_not_stop_run() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("out")).unwrap();
        fs::write(dir.path().join("real.txt"), "real").unwrap();

        let driver = ManifestDriver::new(
            dir.path(),
            config(&[("ghost.dll", None), ("real.txt", None)], &["out"], SyncOptions::default()),
        );
        let report = driver.run(&mut SilentReporter).unwrap();

        let entries = &report.targets[0].entries;
        assert_eq!(entries[0].kind, EntryKind::Unknown);
        assert_eq!(entries[0].action, EntryAction::Unknown);
        assert_eq!(entries[1].action, EntryAction::Copied);
        assert!(dir.path().join("out/real.txt").is_file());
    }

    #[test]
    fn test_rename_creates_nested_destination() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("resources/lib")).unwrap();
        fs::create_dir_all(dir.path().join("out")).unwrap();
        fs::write(dir.path().join("resources/lib/x.so"), "x").unwrap();
        fs::write(dir.path().join("note.txt"), "n").unwrap();

        let driver = ManifestDriver::new(
            dir.path(),
            config(
                &[("resources/lib/", Some("lib/")), ("note.txt", Some("docs/readme.txt"))],
                &["out"],
                SyncOptions::default(),
            ),
        );
        driver.run(&mut SilentReporter).unwrap();

        assert!(dir.path().join("out/lib/x.so").is_file());
        assert!(dir.path().join("out/docs/readme.txt").is_file());
    }

    #[test]
    fn test_file_force_and_skip() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("out")).unwrap();
        fs::write(dir.path().join("a.txt"), "source").unwrap();
        fs::write(dir.path().join("out/a.txt"), "existing").unwrap();

        let skip = ManifestDriver::new(
            dir.path(),
            config(&[("a.txt", None)], &["out"], SyncOptions::default()),
        );
        let report = skip.run(&mut SilentReporter).unwrap();
        assert_eq!(report.targets[0].entries[0].action, EntryAction::AlreadyExists);
        assert_eq!(fs::read_to_string(dir.path().join("out/a.txt")).unwrap(), "existing");

        let force = ManifestDriver::new(
            dir.path(),
            config(&[("a.txt", None)], &["out"], SyncOptions { sync: false, force: true }),
        );
        let report = force.run(&mut SilentReporter).unwrap();
        assert_eq!(report.targets[0].entries[0].action, EntryAction::Overwritten);
        assert_eq!(fs::read_to_string(dir.path().join("out/a.txt")).unwrap(), "source");
    }

    #[test]
    fn test_sync_replaces_file_with_directory() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sound")).unwrap();
        fs::create_dir_all(dir.path().join("out")).unwrap();
        fs::write(dir.path().join("sound/beep.wav"), "beep").unwrap();
        fs::write(dir.path().join("out/sound"), "squatter").unwrap();

        let driver = ManifestDriver::new(
            dir.path(),
            config(&[("sound/", None)], &["out"], SyncOptions { sync: true, force: false }),
        );
        let report = driver.run(&mut SilentReporter).unwrap();

        assert_eq!(report.targets[0].entries[0].action, EntryAction::Copied);
        assert!(dir.path().join("out/sound/beep.wav").is_file());
    }

    #[test]
    fn test_filesystem_error_stops_the_run() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("out")).unwrap();
        for name in ["a.txt", "b.txt", "c.txt"] {
            fs::write(dir.path().join(name), name).unwrap();
        }
        // A plain file where the second entry needs a parent directory
        fs::write(dir.path().join("out/blocker"), "in the way").unwrap();

        let driver = ManifestDriver::new(
            dir.path(),
            config(
                &[("a.txt", None), ("b.txt", Some("blocker/b.txt")), ("c.txt", None)],
                &["out"],
                SyncOptions::default(),
            ),
        );
        let mut recorder = Recorder::default();
        let err = driver.run(&mut recorder).unwrap_err();

        assert!(matches!(err, SyncError::CreateDir { .. }));
        assert_eq!(recorder.lines, vec!["a.txt Copied".to_string()]);
        assert!(dir.path().join("out/a.txt").is_file());
        assert!(!dir.path().join("out/c.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_sync_replaces_linked_destination_directory() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sound")).unwrap();
        fs::create_dir_all(dir.path().join("out")).unwrap();
        fs::create_dir_all(dir.path().join("elsewhere")).unwrap();
        fs::write(dir.path().join("sound/beep.wav"), "beep").unwrap();
        fs::write(dir.path().join("elsewhere/keep.txt"), "keep").unwrap();
        symlink(dir.path().join("elsewhere"), dir.path().join("out/sound")).unwrap();

        let driver = ManifestDriver::new(
            dir.path(),
            config(&[("sound/", None)], &["out"], SyncOptions { sync: true, force: false }),
        );
        let report = driver.run(&mut SilentReporter).unwrap();

        assert_eq!(report.targets[0].entries[0].action, EntryAction::Copied);
        assert!(dir.path().join("elsewhere/keep.txt").is_file());
        assert!(!dir.path().join("elsewhere/beep.wav").exists());
        assert!(fs::symlink_metadata(dir.path().join("out/sound")).unwrap().is_dir());
        assert!(dir.path().join("out/sound/beep.wav").is_file());
    }
}
