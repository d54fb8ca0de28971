//! # Futures hosted on a strand.
//!
//! ```text
//! Strand::spawn(fut)
//!   └─► Task { future, scheduled } ──schedule──► strand.post(poll)
//!
//! poll (work item, on the strand)
//!   ├─ Ready   ─► output sent to StrandTask, future dropped
//!   └─ Pending ─► future parked; its waker re-posts the next poll
//! ```
//!
//! ## Rules
//! - At most one poll is queued per task; wakeups while one is queued coalesce.
//! - Polls of one task never overlap: they are work items of a serial strand.
//! - A queued poll that is dropped unrun (strand shut down, or dropped) releases
//!   the future; the handle then reports [`StrandClosed`].
//! - A panic while polling drops the future; the handle reports [`StrandClosed`].

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::task::{Context, Poll, Wake, Waker};

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

use super::executor::Executor;
use super::strand::{Inner, Strand};

type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// The hosting strand stopped before the future produced its output.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("strand closed before the hosted future completed")]
pub struct StrandClosed;

impl StrandClosed {
    /// Stable label for logs.
    pub fn as_label(&self) -> &'static str {
        "strand_closed"
    }
}

pub(super) struct Task {
    future: Mutex<Option<BoxFuture>>,
    scheduled: AtomicBool,
    strand: Weak<Inner>,
}

impl Task {
    pub(super) fn spawn<F>(strand: &Strand, future: F) -> StrandTask<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let task = Arc::new(Task {
            future: Mutex::new(Some(Box::pin(async move {
                // The handle may already be gone; the output is then discarded.
                let _ = tx.send(future.await);
            }))),
            scheduled: AtomicBool::new(false),
            strand: strand.downgrade(),
        });
        task.schedule();
        StrandTask { receiver: rx }
    }

    fn schedule(self: &Arc<Self>) {
        if self.scheduled.swap(true, Ordering::AcqRel) {
            return;
        }
        let Some(inner) = self.strand.upgrade() else {
            self.release();
            return;
        };
        let queued = QueuedPoll(Some(Arc::clone(self)));
        Strand::from_inner(inner).post(Box::new(move || queued.run()));
    }

    fn poll(self: &Arc<Self>) {
        self.scheduled.store(false, Ordering::Release);

        // Taken out for the duration of the poll: a panic drops it.
        let Some(mut future) = self.future.lock().take() else {
            return;
        };
        let waker = Waker::from(Arc::clone(self));
        let mut cx = Context::from_waker(&waker);
        if future.as_mut().poll(&mut cx).is_ready() {
            return;
        }
        let open = self
            .strand
            .upgrade()
            .is_some_and(|inner| !Strand::from_inner(inner).is_closed());
        if open {
            *self.future.lock() = Some(future);
        } else {
            debug!("strand closed; parked future released");
        }
    }

    /// Drops the future, which may hold the only path back to this task's wakers.
    fn release(&self) {
        let future = self.future.lock().take();
        if future.is_some() {
            debug!("strand closed; hosted future released");
        }
        drop(future);
    }
}

/// One posted poll; releases the task's future if dropped without running.
struct QueuedPoll(Option<Arc<Task>>);

impl QueuedPoll {
    fn run(mut self) {
        if let Some(task) = self.0.take() {
            task.poll();
        }
    }
}

impl Drop for QueuedPoll {
    fn drop(&mut self) {
        if let Some(task) = self.0.take() {
            task.release();
        }
    }
}

impl Wake for Task {
    fn wake(self: Arc<Self>) {
        self.schedule();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.schedule();
    }
}

/// Handle to a future hosted by [`Strand::spawn`]; resolves with its output.
#[must_use = "dropping the handle does not cancel the hosted future"]
#[derive(Debug)]
pub struct StrandTask<T> {
    receiver: oneshot::Receiver<T>,
}

impl<T> Future for StrandTask<T> {
    type Output = Result<T, StrandClosed>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|res| res.map_err(|_| StrandClosed))
    }
}
