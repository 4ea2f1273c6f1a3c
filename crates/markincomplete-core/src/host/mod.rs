//! Host collaborator surface.
//!
//! The transfer client owns jobs, their file layouts and event delivery; the
//! plugin core only talks to it through these traits so that it can run
//! against any client (or the in-memory host used in tests and replays).

mod error;
mod events;

pub use error::HostError;
pub use events::{EventHandler, EventSource, HostEvent};

/// Host-assigned, stable job identifier (e.g. a hex info-hash).
pub type JobId = String;

/// One `(file index, new path)` entry of a rename request.
pub type RenameEntry = (usize, String);

/// One file within a job's original or current layout.
///
/// `index` is stable across renames; `path` is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub index: usize,
    pub path: String,
    pub size: u64,
}

impl FileDescriptor {
    pub fn new(index: usize, path: impl Into<String>, size: u64) -> Self {
        Self {
            index,
            path: path.into(),
            size,
        }
    }
}

/// Handle to a single job managed by the host.
pub trait TransferJob {
    /// Layout as first known when metadata became available. Empty while a
    /// magnet-style job is still waiting for metadata.
    fn original_files(&self) -> Vec<FileDescriptor>;

    /// Layout reflecting renames applied so far.
    fn current_files(&self) -> Vec<FileDescriptor>;

    /// Per-file completion in `[0.0, 1.0]`, indexed by file index.
    fn file_progress(&self) -> Vec<f64>;

    /// Submit one rename request. Files not named in `batch` keep their name.
    fn rename_files(&self, batch: &[RenameEntry]) -> Result<(), HostError>;
}

/// Job registry of the host.
pub trait JobHost {
    type Job: TransferJob;

    fn get_job(&self, job_id: &str) -> Result<Self::Job, HostError>;
}
