//! Deferred callbacks on the host's cooperative scheduler.
//!
//! The plugin never spawns threads. Its only delayed work (renaming after
//! metadata arrives) goes through [`Scheduler::call_later`], which runs the
//! callback on the same logical thread once the delay has elapsed. There is
//! no cancellation: a scheduled callback always runs.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Work to run later on the same thread.
pub type Deferred = Box<dyn FnOnce() + 'static>;

pub trait Scheduler {
    fn call_later(&self, delay: Duration, callback: Deferred);
}

/// Runs callbacks as tokio local tasks.
///
/// Must be used from inside a [`tokio::task::LocalSet`]; callbacks are `!Send`
/// because they hold the single-threaded plugin state.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn call_later(&self, delay: Duration, callback: Deferred) {
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
    }
}

struct Pending {
    due: Duration,
    seq: u64,
    callback: Deferred,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

/// Virtual-clock scheduler: callbacks run only when [`ManualScheduler::advance`]
/// moves the clock past their due time. Clones share the same queue.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Move the clock forward by `by`, running every callback that becomes due
    /// in due-time order (ties in scheduling order). Returns how many ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state.borrow().now + by;
        let mut ran = 0;
        // Callbacks may schedule more work, so the borrow is released before each call.
        while let Some(next) = self.pop_due(target) {
            self.state.borrow_mut().now = next.due;
            (next.callback)();
            ran += 1;
        }
        self.state.borrow_mut().now = target;
        ran
    }

    fn pop_due(&self, target: Duration) -> Option<Pending> {
        let mut state = self.state.borrow_mut();
        let pos = state
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= target)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)?;
        Some(state.pending.remove(pos))
    }
}

impl Scheduler for ManualScheduler {
    fn call_later(&self, delay: Duration, callback: Deferred) {
        let mut state = self.state.borrow_mut();
        let due = state.now + delay;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.pending.push(Pending { due, seq, callback });
    }
}
