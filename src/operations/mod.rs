// Operations module
// Change detection, file/directory sync, and the manifest driver

pub mod detect;
pub mod driver;
pub mod sync;

pub use detect::needs_copy;
pub use driver::{
    EntryAction, EntryKind, EntryReport, ManifestDriver, Reporter, RunReport, SilentReporter,
    TargetReport,
};
pub use sync::{copy_tree, sync_directory, sync_file, DirSyncStats, FileOutcome, Removal, RemovalKind};
