//! Per-job eligibility decisions and their memo cache.

use std::collections::HashMap;

use crate::host::{JobHost, JobId, TransferJob};

/// Memoized eligibility decisions, keyed by job id.
///
/// Entries are never evicted: a job's original layout cannot change, so a
/// decision stays valid for the life of the process. Jobs that are unknown
/// or have no files yet are never stored.
#[derive(Debug, Default, Clone)]
pub struct EligibilityCache {
    decisions: HashMap<JobId, bool>,
}

impl EligibilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, job_id: &str) -> Option<bool> {
        self.decisions.get(job_id).copied()
    }

    pub fn insert(&mut self, job_id: &str, eligible: bool) {
        self.decisions.insert(job_id.to_string(), eligible);
    }

    pub fn contains(&self, job_id: &str) -> bool {
        self.decisions.contains_key(job_id)
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

/// Decide whether the plugin may rename files of `job_id`.
///
/// A job is eligible iff it has at least one original file and none of its
/// original paths already ends with `extension`.
pub fn is_eligible<H: JobHost>(
    host: &H,
    cache: &mut EligibilityCache,
    job_id: &str,
    extension: &str,
) -> bool {
    if let Some(eligible) = cache.get(job_id) {
        tracing::info!(job_id, eligible, "eligibility (cache hit)");
        return eligible;
    }

    let job = match host.get_job(job_id) {
        Ok(job) => job,
        Err(e) => {
            // Not cached: the host may learn about this id later.
            tracing::warn!(job_id, "{e}, returning not eligible");
            return false;
        }
    };

    let orig_files = job.original_files();
    if orig_files.is_empty() {
        // Not cached: metadata may still be pending.
        tracing::info!(job_id, "job has zero files, returning not eligible");
        return false;
    }

    let eligible = orig_files.iter().all(|f| !f.path.ends_with(extension));
    cache.insert(job_id, eligible);
    tracing::info!(job_id, eligible, "eligibility (cache miss)");
    eligible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FileDescriptor;
    use crate::memory_host::MemoryHost;

    const EXT: &str = "!incomplete";

    #[test]
    fn plain_job_is_eligible_and_cached() {
        let host = MemoryHost::new();
        host.add_job(
            "a",
            vec![
                FileDescriptor::new(0, "show/ep1.mkv", 100),
                FileDescriptor::new(1, "show/ep2.mkv", 100),
            ],
        );
        let mut cache = EligibilityCache::new();

        assert!(is_eligible(&host, &mut cache, "a", EXT));
        assert_eq!(host.lookups(), 1);
        assert!(is_eligible(&host, &mut cache, "a", EXT));
        assert!(is_eligible(&host, &mut cache, "a", EXT));
        assert_eq!(host.lookups(), 1, "later calls must be served from cache");
        assert_eq!(cache.get("a"), Some(true));
    }

    #[test]
    fn already_suffixed_job_is_ineligible_and_cached() {
        let host = MemoryHost::new();
        host.add_job(
            "b",
            vec![
                FileDescriptor::new(0, "a.bin", 1),
                FileDescriptor::new(1, "b.bin.!incomplete", 1),
            ],
        );
        let mut cache = EligibilityCache::new();

        assert!(!is_eligible(&host, &mut cache, "b", EXT));
        assert!(!is_eligible(&host, &mut cache, "b", EXT));
        assert_eq!(host.lookups(), 1);
        assert_eq!(cache.get("b"), Some(false));
    }

    #[test]
    fn job_without_files_is_never_cached() {
        let host = MemoryHost::new();
        host.add_job("magnet", Vec::new());
        let mut cache = EligibilityCache::new();

        assert!(!is_eligible(&host, &mut cache, "magnet", EXT));
        assert!(!is_eligible(&host, &mut cache, "magnet", EXT));
        assert_eq!(host.lookups(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn unknown_job_is_never_cached() {
        let host = MemoryHost::new();
        let mut cache = EligibilityCache::new();

        assert!(!is_eligible(&host, &mut cache, "missing", EXT));
        assert!(!is_eligible(&host, &mut cache, "missing", EXT));
        assert_eq!(host.lookups(), 2);
        assert!(!cache.contains("missing"));
    }

    #[test]
    fn metadata_arrival_makes_pending_job_eligible() {
        let host = MemoryHost::new();
        host.add_job("magnet", Vec::new());
        let mut cache = EligibilityCache::new();
        assert!(!is_eligible(&host, &mut cache, "magnet", EXT));

        host.set_metadata("magnet", vec![FileDescriptor::new(0, "iso/disk.iso", 4096)]);
        assert!(is_eligible(&host, &mut cache, "magnet", EXT));
        assert_eq!(cache.len(), 1);
    }
}
