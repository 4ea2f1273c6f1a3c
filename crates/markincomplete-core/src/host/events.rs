//! Events the host delivers to the plugin.

use super::JobId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A job entered the session. `from_state` is true when it was restored
    /// from persisted session state rather than freshly added.
    JobAdded { job_id: JobId, from_state: bool },
    /// The file at `index` finished transferring.
    FileCompleted { job_id: JobId, index: usize },
    /// Metadata arrived for a job that started with an unknown layout.
    /// `job_id` is `None` when the host handle could not be resolved.
    MetadataReceived { job_id: Option<JobId> },
}

pub type EventHandler = Box<dyn FnMut(&HostEvent)>;

/// Publish/subscribe capability of the host.
///
/// The host dispatches each physical event at most once per handler.
pub trait EventSource {
    fn subscribe(&mut self, handler: EventHandler);

    /// Ask the host to emit [`HostEvent::FileCompleted`]. Some clients only
    /// generate per-file completion notifications on request.
    fn request_file_completion_events(&mut self) {}
}
