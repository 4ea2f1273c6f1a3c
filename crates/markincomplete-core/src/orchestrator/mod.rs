//! Rename orchestration: add the suffix to unfinished files, strip it on completion.

use crate::eligibility::{self, EligibilityCache};
use crate::host::{FileDescriptor, JobHost, RenameEntry, TransferJob};
use crate::lookup::find_by_index;

/// Build the rename batch that marks every unfinished file of a job.
///
/// Files already at 100% are left alone: their completion event will not
/// fire again, so nothing would ever strip the suffix. A file with no
/// progress entry counts as unfinished.
pub fn plan_suffix_batch(
    orig_files: &[FileDescriptor],
    progress: &[f64],
    extension: &str,
) -> Vec<RenameEntry> {
    orig_files
        .iter()
        .filter(|f| progress.get(f.index).copied().unwrap_or(0.0) < 1.0)
        .map(|f| (f.index, format!("{}.{}", f.path, extension)))
        .collect()
}

/// Owns the eligibility cache and the configured extension, and issues
/// rename requests to the host.
#[derive(Debug)]
pub struct RenameOrchestrator<H: JobHost> {
    host: H,
    extension: String,
    cache: EligibilityCache,
}

impl<H: JobHost> RenameOrchestrator<H> {
    pub fn new(host: H, extension: impl Into<String>) -> Self {
        Self {
            host,
            extension: extension.into(),
            cache: EligibilityCache::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Change the suffix used from now on. Cached eligibility decisions are
    /// kept.
    pub fn set_extension(&mut self, extension: impl Into<String>) {
        let extension = extension.into();
        tracing::info!("extension changed from {} to {}", self.extension, extension);
        self.extension = extension;
    }

    pub fn cache(&self) -> &EligibilityCache {
        &self.cache
    }

    pub fn is_eligible(&mut self, job_id: &str) -> bool {
        eligibility::is_eligible(&self.host, &mut self.cache, job_id, &self.extension)
    }

    /// Append `.<extension>` to every unfinished file of `job_id`.
    ///
    /// Returns false when the job is not eligible (or vanished meanwhile),
    /// true once the rename has been submitted. A file may complete between
    /// the progress read and the rename; that race is accepted.
    pub fn append_extension_if_eligible(&mut self, job_id: &str) -> bool {
        if !self.is_eligible(job_id) {
            tracing::info!(job_id, "not eligible, skipping");
            return false;
        }

        let job = match self.host.get_job(job_id) {
            Ok(job) => job,
            Err(e) => {
                tracing::warn!(job_id, "{e}, skipping rename");
                return false;
            }
        };
        let orig_files = job.original_files();
        tracing::info!(
            job_id,
            files = orig_files.len(),
            "eligible, renaming unfinished files"
        );

        let batch = plan_suffix_batch(&orig_files, &job.file_progress(), &self.extension);
        if batch.is_empty() {
            tracing::debug!(job_id, "all files complete, submitting empty rename");
        }
        if let Err(e) = job.rename_files(&batch) {
            tracing::warn!(job_id, "rename request failed: {e}");
        }
        true
    }

    /// Restore the original name of file `index` if it carries the suffix.
    pub fn handle_file_completed(&mut self, job_id: &str, index: usize) {
        tracing::debug!(job_id, index, "file completed");

        if !self.is_eligible(job_id) {
            tracing::debug!(job_id, "not eligible, skipping rename back to original");
            return;
        }

        let job = match self.host.get_job(job_id) {
            Ok(job) => job,
            Err(e) => {
                tracing::warn!(job_id, "{e}, skipping rename back to original");
                return;
            }
        };

        let files = job.current_files();
        let Some(current) = find_by_index(&files, index) else {
            tracing::warn!(job_id, index, "no current file with this index");
            return;
        };
        if !current.path.ends_with(&self.extension) {
            tracing::info!(
                job_id,
                index,
                "file was never renamed, likely added while the plugin was inactive"
            );
            return;
        }

        let orig_files = job.original_files();
        let Some(original) = find_by_index(&orig_files, index) else {
            tracing::warn!(job_id, index, "no original file with this index");
            return;
        };
        tracing::info!(
            job_id,
            index,
            "renaming back to original path: {}",
            original.path
        );
        if let Err(e) = job.rename_files(&[(index, original.path.clone())]) {
            tracing::warn!(job_id, index, "restore rename failed: {e}");
        }
    }
}
