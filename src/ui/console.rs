// Console Reporter
// Human-readable progress lines, one per action

use crossterm::style::ContentStyle;
use std::io::{self, IsTerminal, Stdout, Write};
use std::path::{Path, PathBuf};

use super::Styles;
use crate::core::SyncOptions;
use crate::operations::{EntryAction, EntryKind, EntryReport, RemovalKind, Reporter};
use crate::utilities::display_relative;

/// Prints driver progress to a writer
pub struct ConsoleReporter<W: Write> {
    out: W,
    /// Target roots are shown relative to this directory
    base: PathBuf,
    color: bool,
}

impl ConsoleReporter<Stdout> {
    /// Report to stdout, colored when it is a terminal
    pub fn stdout(base: impl Into<PathBuf>) -> Self {
        let color = io::stdout().is_terminal();
        Self::new(io::stdout(), base, color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, base: impl Into<PathBuf>, color: bool) -> Self {
        Self {
            out,
            base: base.into(),
            color,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, style: ContentStyle, text: &str) -> String {
        if self.color {
            style.apply(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn line(&mut self, text: String) {
        // Progress output is best-effort; a closed pipe must not abort a sync
        let _ = writeln!(self.out, "{}", text);
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn run_started(&mut self, options: &SyncOptions) {
        if options.sync {
            let tag = self.paint(Styles::banner(), "[*]");
            self.line(format!("{} Sync mode: will update changed files and remove orphans", tag));
        } else if options.force {
            let tag = self.paint(Styles::banner(), "[*]");
            self.line(format!("{} Force mode: existing entries will be overwritten", tag));
        }
    }

    fn target_skipped(&mut self, root: &Path) {
        let text = self.paint(
            Styles::notice(),
            &format!("Skipping target, not a directory: {}", display_relative(root, &self.base)),
        );
        self.line(text);
    }

    fn entry(&mut self, _root: &Path, report: &EntryReport) {
        let noun = match report.kind {
            EntryKind::Directory => "Directory",
            _ => "File",
        };
        let pair = format!("{} -> {}", report.source, report.target_name);

        let (style, tag, message) = match &report.action {
            EntryAction::Copied => (Styles::added(), "[+]", format!("{} copied: {}", noun, pair)),
            EntryAction::Overwritten => {
                (Styles::added(), "[+]", format!("{} overwritten: {}", noun, pair))
            }
            EntryAction::AlreadyExists => (
                Styles::skipped(),
                "[-]",
                format!("{} already exists, skipping: {}", noun, pair),
            ),
            EntryAction::Updated => {
                (Styles::modified(), "[~]", format!("{} updated: {}", noun, pair))
            }
            EntryAction::UpToDate => (Styles::unchanged(), "[=]", format!("Up to date: {}", pair)),
            EntryAction::Synced(stats) => {
                for removal in &stats.removals {
                    let what = match removal.kind {
                        RemovalKind::File => "file",
                        RemovalKind::Directory => "dir",
                    };
                    let tag = self.paint(Styles::removed(), "[-]");
                    self.line(format!(
                        "  {} Removed orphan {}: {}",
                        tag,
                        what,
                        removal.path.display()
                    ));
                }
                (
                    Styles::modified(),
                    "[~]",
                    format!(
                        "Synced: {} (+{} new, ~{} updated, -{} removed)",
                        pair, stats.copied, stats.updated, stats.removed
                    ),
                )
            }
            EntryAction::Unknown => (
                Styles::unknown(),
                "[?]",
                format!("Unknown entity to copy: {}", report.source),
            ),
        };

        let tag = self.paint(style, tag);
        self.line(format!("{} {}", tag, message));
    }

    fn target_done(&mut self, root: &Path) {
        let text = format!("Post compile build done: {}", display_relative(root, &self.base));
        self.line(text);
    }
}
