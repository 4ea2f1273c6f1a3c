//! In-memory host: a reference [`JobHost`] and [`EventSource`].
//!
//! Backs the unit tests and the CLI `replay` command. Jobs are shared through
//! `Rc<RefCell<..>>` the same way a real client hands out cheap job handles.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::host::{
    EventHandler, EventSource, FileDescriptor, HostError, HostEvent, JobHost, JobId, RenameEntry,
    TransferJob,
};

#[derive(Debug, Clone, Default)]
struct JobRecord {
    original: Vec<FileDescriptor>,
    current: Vec<FileDescriptor>,
    progress: Vec<f64>,
}

impl JobRecord {
    fn with_files(files: Vec<FileDescriptor>) -> Self {
        let progress = vec![0.0; files.len()];
        Self {
            original: files.clone(),
            current: files,
            progress,
        }
    }
}

#[derive(Debug, Default)]
struct HostState {
    jobs: BTreeMap<JobId, JobRecord>,
    lookups: usize,
    renames: Vec<(JobId, Vec<RenameEntry>)>,
    reject_renames: bool,
}

/// Shared in-memory job registry. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    state: Rc<RefCell<HostState>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job with the given original layout, all files at 0%.
    pub fn add_job(&self, job_id: &str, files: Vec<FileDescriptor>) {
        self.state
            .borrow_mut()
            .jobs
            .insert(job_id.to_string(), JobRecord::with_files(files));
    }

    /// Replace a job's layout as if metadata had just been received.
    /// Returns false if the job is unknown.
    pub fn set_metadata(&self, job_id: &str, files: Vec<FileDescriptor>) -> bool {
        match self.state.borrow_mut().jobs.get_mut(job_id) {
            Some(job) => {
                *job = JobRecord::with_files(files);
                true
            }
            None => false,
        }
    }

    /// Set the progress of one file. Returns false if job or file is unknown.
    pub fn set_progress(&self, job_id: &str, index: usize, progress: f64) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(job) = state.jobs.get_mut(job_id) else {
            return false;
        };
        match job.progress.get_mut(index) {
            Some(p) => {
                *p = progress.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    pub fn remove_job(&self, job_id: &str) -> bool {
        self.state.borrow_mut().jobs.remove(job_id).is_some()
    }

    /// Current path of every file of `job_id`, in layout order.
    pub fn current_paths(&self, job_id: &str) -> Option<Vec<String>> {
        self.state
            .borrow()
            .jobs
            .get(job_id)
            .map(|job| job.current.iter().map(|f| f.path.clone()).collect())
    }

    /// Job ids in sorted order.
    pub fn job_ids(&self) -> Vec<JobId> {
        self.state.borrow().jobs.keys().cloned().collect()
    }

    /// Number of `get_job` calls served so far.
    pub fn lookups(&self) -> usize {
        self.state.borrow().lookups
    }

    /// Every accepted rename request, in submission order.
    pub fn rename_log(&self) -> Vec<(JobId, Vec<RenameEntry>)> {
        self.state.borrow().renames.clone()
    }

    /// Make every following rename request fail.
    pub fn reject_renames(&self, reject: bool) {
        self.state.borrow_mut().reject_renames = reject;
    }

    /// Replace the stored current layout order (e.g. to simulate a client that
    /// does not keep file `i` at position `i`).
    pub fn reorder_current(&self, job_id: &str, order: &[usize]) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(job) = state.jobs.get_mut(job_id) else {
            return false;
        };
        let reordered: Option<Vec<FileDescriptor>> = order
            .iter()
            .map(|&pos| job.current.get(pos).cloned())
            .collect();
        match reordered {
            Some(files) if files.len() == job.current.len() => {
                job.current = files;
                true
            }
            _ => false,
        }
    }
}

impl JobHost for MemoryHost {
    type Job = MemoryJob;

    fn get_job(&self, job_id: &str) -> Result<MemoryJob, HostError> {
        let mut state = self.state.borrow_mut();
        state.lookups += 1;
        if !state.jobs.contains_key(job_id) {
            return Err(HostError::UnknownJob(job_id.to_string()));
        }
        Ok(MemoryJob {
            job_id: job_id.to_string(),
            state: Rc::clone(&self.state),
        })
    }
}

/// Handle to one job of a [`MemoryHost`].
#[derive(Debug, Clone)]
pub struct MemoryJob {
    job_id: JobId,
    state: Rc<RefCell<HostState>>,
}

impl MemoryJob {
    fn read<T>(&self, f: impl FnOnce(&JobRecord) -> T) -> Option<T> {
        self.state.borrow().jobs.get(&self.job_id).map(f)
    }
}

impl TransferJob for MemoryJob {
    fn original_files(&self) -> Vec<FileDescriptor> {
        self.read(|job| job.original.clone()).unwrap_or_default()
    }

    fn current_files(&self) -> Vec<FileDescriptor> {
        self.read(|job| job.current.clone()).unwrap_or_default()
    }

    fn file_progress(&self) -> Vec<f64> {
        self.read(|job| job.progress.clone()).unwrap_or_default()
    }

    fn rename_files(&self, batch: &[RenameEntry]) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        let rejected = |reason: String| HostError::RenameRejected {
            job_id: self.job_id.clone(),
            reason,
        };
        if state.reject_renames {
            return Err(rejected("renames disabled".to_string()));
        }
        let job = state
            .jobs
            .get_mut(&self.job_id)
            .ok_or_else(|| HostError::UnknownJob(self.job_id.clone()))?;

        // Validate the whole batch before touching anything.
        for (index, _) in batch {
            if !job.current.iter().any(|f| f.index == *index) {
                return Err(rejected(format!("no file at index {index}")));
            }
        }
        for (index, path) in batch {
            if let Some(f) = job.current.iter_mut().find(|f| f.index == *index) {
                f.path = path.clone();
            }
        }
        state.renames.push((self.job_id.clone(), batch.to_vec()));
        Ok(())
    }
}

/// Synchronous event bus: `emit` runs every subscribed handler in order.
#[derive(Default)]
pub struct MemoryEventBus {
    handlers: Vec<EventHandler>,
    completion_events_requested: bool,
}

impl MemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: &HostEvent) {
        for handler in self.handlers.iter_mut() {
            handler(event);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn completion_events_requested(&self) -> bool {
        self.completion_events_requested
    }
}

impl EventSource for MemoryEventBus {
    fn subscribe(&mut self, handler: EventHandler) {
        self.handlers.push(handler);
    }

    fn request_file_completion_events(&mut self) {
        self.completion_events_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_updates_current_but_not_original() {
        let host = MemoryHost::new();
        host.add_job("j", vec![FileDescriptor::new(0, "a.bin", 1)]);
        let job = host.get_job("j").unwrap();
        job.rename_files(&[(0, "a.bin.x".to_string())]).unwrap();

        assert_eq!(job.current_files()[0].path, "a.bin.x");
        assert_eq!(job.original_files()[0].path, "a.bin");
        assert_eq!(host.rename_log().len(), 1);
    }

    #[test]
    fn rename_with_unknown_index_is_rejected_whole() {
        let host = MemoryHost::new();
        host.add_job("j", vec![FileDescriptor::new(0, "a.bin", 1)]);
        let job = host.get_job("j").unwrap();
        let err = job
            .rename_files(&[(0, "a.bin.x".to_string()), (3, "nope".to_string())])
            .unwrap_err();

        assert!(matches!(err, HostError::RenameRejected { .. }));
        assert_eq!(host.current_paths("j").unwrap(), vec!["a.bin"]);
        assert!(host.rename_log().is_empty());
    }

    #[test]
    fn removed_job_handle_degrades_to_empty() {
        let host = MemoryHost::new();
        host.add_job("j", vec![FileDescriptor::new(0, "a.bin", 1)]);
        let job = host.get_job("j").unwrap();
        host.remove_job("j");

        assert!(job.original_files().is_empty());
        assert!(job.file_progress().is_empty());
        assert!(matches!(host.get_job("j"), Err(HostError::UnknownJob(_))));
    }

    #[test]
    fn bus_delivers_to_every_handler() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = MemoryEventBus::new();
        for _ in 0..2 {
            let seen = Rc::clone(&seen);
            bus.subscribe(Box::new(move |e| seen.borrow_mut().push(e.clone())));
        }
        bus.emit(&HostEvent::MetadataReceived { job_id: None });
        assert_eq!(seen.borrow().len(), 2);
    }
}
