use thiserror::Error;

/// Failures reported by the host. The plugin absorbs all of them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("job {0} not found")]
    UnknownJob(String),
    #[error("rename rejected for job {job_id}: {reason}")]
    RenameRejected { job_id: String, reason: String },
}
