//! Execution contexts that accept posted work.

use std::sync::Arc;

use tokio::runtime::Handle;

use super::strand::Strand;

/// One unit of posted work.
pub type Work = Box<dyn FnOnce() + Send + 'static>;

/// Shared handle to an execution context.
pub type ExecutorRef = Arc<dyn Executor>;

/// An execution context onto which work items can be posted.
///
/// `post` enqueues and returns immediately: it must never run `work` inline on
/// the calling thread, and may be called from any thread (including threads not
/// owned by any async runtime). Items posted to one context run in FIFO order
/// relative to each other when the context is serial (for example a
/// [`Strand`](super::Strand)).
///
/// Posting a bridge delivery is what wakes the awaiting future. The awaiting
/// code itself continues wherever that future is polled: on a strand when it is
/// hosted there with [`Strand::spawn`](super::Strand::spawn), otherwise on the
/// tokio task that awaits it.
///
/// If the context is shut down, posted work may be dropped without running.
pub trait Executor: Send + Sync + 'static {
    /// Enqueues `work` for execution on this context.
    fn post(&self, work: Work);
}

/// Every posted item becomes a task spawned on the runtime behind the handle.
///
/// Multi-threaded runtimes give no ordering between posted items; use a
/// [`Strand`](super::Strand) when FIFO matters.
impl Executor for Handle {
    fn post(&self, work: Work) {
        drop(self.spawn(async move { work() }));
    }
}

impl<E: Executor + ?Sized> Executor for Arc<E> {
    fn post(&self, work: Work) {
        (**self).post(work);
    }
}

/// The caller's own execution context.
///
/// Inside work running on a [`Strand`](super::Strand) (including futures
/// hosted with [`Strand::spawn`](super::Strand::spawn)) this is that strand;
/// elsewhere it is the tokio runtime the caller is running on.
///
/// # Panics
/// Panics when called outside both a strand and a tokio runtime, like
/// [`tokio::spawn`].
pub fn current_executor() -> ExecutorRef {
    match Strand::current() {
        Some(strand) => strand.executor(),
        None => Arc::new(Handle::current()),
    }
}
