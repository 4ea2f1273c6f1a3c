//! Host event → orchestrator adapters.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::deferred::Scheduler;
use crate::host::{HostEvent, JobHost};
use crate::orchestrator::RenameOrchestrator;

/// Delay between metadata arrival and the rename, so the host can finish its
/// own bookkeeping for the new layout first.
pub const METADATA_RENAME_DEFER: Duration = Duration::from_secs(2);

pub type SharedOrchestrator<H> = Rc<RefCell<RenameOrchestrator<H>>>;

/// Route one host event to the orchestrator.
pub fn dispatch<H: JobHost + 'static>(
    orchestrator: &SharedOrchestrator<H>,
    scheduler: &Rc<dyn Scheduler>,
    event: &HostEvent,
) {
    match event {
        HostEvent::JobAdded { job_id, from_state } => {
            on_job_added(orchestrator, job_id, *from_state)
        }
        HostEvent::FileCompleted { job_id, index } => {
            on_file_completed(orchestrator, job_id, *index)
        }
        HostEvent::MetadataReceived { job_id } => {
            on_metadata_received(orchestrator, scheduler, job_id.as_deref())
        }
    }
}

/// Fresh adds get renamed; jobs restored from session state were handled
/// when they were first added.
pub fn on_job_added<H: JobHost>(
    orchestrator: &SharedOrchestrator<H>,
    job_id: &str,
    from_state: bool,
) {
    if from_state {
        tracing::debug!(job_id, "added from state, skipping");
        return;
    }
    with_orchestrator(orchestrator, |o| {
        o.append_extension_if_eligible(job_id);
    });
}

pub fn on_file_completed<H: JobHost>(
    orchestrator: &SharedOrchestrator<H>,
    job_id: &str,
    index: usize,
) {
    with_orchestrator(orchestrator, |o| o.handle_file_completed(job_id, index));
}

pub fn on_metadata_received<H: JobHost + 'static>(
    orchestrator: &SharedOrchestrator<H>,
    scheduler: &Rc<dyn Scheduler>,
    job_id: Option<&str>,
) {
    let Some(job_id) = job_id else {
        return;
    };
    tracing::info!(job_id, "metadata received, scheduling rename");

    let orchestrator = Rc::clone(orchestrator);
    let job_id = job_id.to_string();
    scheduler.call_later(
        METADATA_RENAME_DEFER,
        Box::new(move || {
            with_orchestrator(&orchestrator, |o| {
                o.append_extension_if_eligible(&job_id);
            });
        }),
    );
}

/// Borrow the orchestrator for one event. A host that dispatches an event
/// from inside a rename call would re-enter here; that event is dropped.
fn with_orchestrator<H: JobHost>(
    orchestrator: &SharedOrchestrator<H>,
    f: impl FnOnce(&mut RenameOrchestrator<H>),
) {
    match orchestrator.try_borrow_mut() {
        Ok(mut o) => f(&mut o),
        Err(_) => tracing::warn!("re-entrant host event while a rename is in progress, dropped"),
    }
}
