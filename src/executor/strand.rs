//! # Strand: a serial execution context on top of a tokio runtime.
//!
//! A [`Strand`] runs posted work items one at a time, in the order they were
//! posted, on a single worker task. It is the natural target for marshaling
//! callbacks that arrive on foreign threads back into one logical context.
//!
//! ## Architecture
//! ```text
//! foreign thread ─┐
//! foreign thread ─┼─ post(work) ──► [unbounded queue] ──► worker task ──► work()
//! runtime task  ──┘                                     (one at a time, FIFO)
//! ```
//!
//! ## Rules
//! - `post` never blocks and never runs work inline.
//! - A panic inside a work item is caught and logged; the strand keeps running.
//! - [`Strand::shutdown`] stops the worker: queued work is dropped unrun, later
//!   posts are discarded.
//! - Dropping every `Strand` clone lets the worker drain the queue and exit.
//!
//! ## Hosted futures
//! [`Strand::spawn`] runs a future *on* the strand: every poll is a posted work
//! item, so the code after each `.await` runs on the strand too, in the order
//! its wakeups were posted. Inside hosted code, [`current_executor`] resolves
//! to the hosting strand, so `bridge::run` resumes there without naming it.
//!
//! [`current_executor`]: super::current_executor

use std::any::Any;
use std::cell::RefCell;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use super::config::StrandConfig;
use super::executor::{Executor, ExecutorRef, Work};
use super::task::{StrandTask, Task};

thread_local! {
    static CURRENT_STRAND: RefCell<Option<Weak<Inner>>> = const { RefCell::new(None) };
}

/// State shared by the handles and the worker.
struct Shared {
    name: String,
    backlog: AtomicUsize,
}

pub(super) struct Inner {
    shared: Arc<Shared>,
    tx: mpsc::UnboundedSender<Work>,
    backlog_warn: Option<usize>,
    token: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
}

/// Serial FIFO execution context. Cheap to clone; clones share one queue.
#[derive(Clone)]
pub struct Strand {
    inner: Arc<Inner>,
}

impl Strand {
    /// Creates a strand whose worker runs on the current tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn new(config: StrandConfig) -> Self {
        Self::with_handle(config, &Handle::current())
    }

    /// Creates a strand whose worker runs on the runtime behind `handle`.
    pub fn with_handle(config: StrandConfig, handle: &Handle) -> Self {
        let shared = Arc::new(Shared {
            name: config.name.to_string(),
            backlog: AtomicUsize::new(0),
        });
        let (tx, rx) = mpsc::unbounded_channel::<Work>();
        let token = CancellationToken::new();

        let inner = Arc::new_cyclic(|this: &Weak<Inner>| {
            let worker = handle.spawn(drive(
                Arc::clone(&shared),
                Weak::clone(this),
                rx,
                token.clone(),
            ));
            Inner {
                shared,
                tx,
                backlog_warn: config.backlog_warn_threshold(),
                token,
                worker: Mutex::new(Some(worker)),
            }
        });
        Self { inner }
    }

    /// The strand running the calling work item, if any.
    pub fn current() -> Option<Strand> {
        CURRENT_STRAND
            .with(|current| current.borrow().as_ref().and_then(Weak::upgrade))
            .map(|inner| Strand { inner })
    }

    pub(super) fn from_inner(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    pub(super) fn downgrade(&self) -> Weak<Inner> {
        Arc::downgrade(&self.inner)
    }

    /// Label from the configuration.
    pub fn name(&self) -> &str {
        &self.inner.shared.name
    }

    /// Number of posted items not yet started.
    pub fn backlog(&self) -> usize {
        self.inner.shared.backlog.load(Ordering::Relaxed)
    }

    /// True once the strand no longer runs posted work.
    pub fn is_closed(&self) -> bool {
        self.inner.token.is_cancelled() || self.inner.tx.is_closed()
    }

    /// True if the calling code is a work item currently running on this strand.
    pub fn running_in_this_strand(&self) -> bool {
        CURRENT_STRAND.with(|current| {
            current
                .borrow()
                .as_ref()
                .is_some_and(|w| Weak::as_ptr(w) == Arc::as_ptr(&self.inner))
        })
    }

    /// Hosts `future` on this strand.
    ///
    /// Each poll runs as a work item on the strand, so the future's code,
    /// including everything after its `.await`s, runs serially with the other
    /// work posted here. The returned handle resolves with the output, or with
    /// [`StrandClosed`](super::StrandClosed) if the strand stops first or the
    /// future panics.
    ///
    /// # Example
    /// ```rust
    /// use callbridge::{bridge, Strand, StrandConfig};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let strand = Strand::new(StrandConfig::named("signaling"));
    /// let here = strand.clone();
    /// let resumed_here = strand.spawn(async move {
    ///     let offer = bridge::run::<u32, (), _>(|done| {
    ///         std::thread::spawn(move || done.succeed(1));
    ///     })
    ///     .await;
    ///     offer.is_ok() && here.running_in_this_strand()
    /// });
    /// assert_eq!(resumed_here.await, Ok(true));
    /// # }
    /// ```
    pub fn spawn<F>(&self, future: F) -> StrandTask<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        Task::spawn(self, future)
    }

    /// This strand as a shared [`ExecutorRef`].
    pub fn executor(&self) -> ExecutorRef {
        Arc::new(self.clone())
    }

    /// Stops the worker and waits for it to exit.
    ///
    /// The item currently running (if any) completes; queued items are dropped
    /// without running. Calling this more than once is harmless.
    pub async fn shutdown(&self) {
        self.inner.token.cancel();
        let worker = self.inner.worker.lock().take();
        if let Some(handle) = worker {
            if let Err(err) = handle.await {
                warn!(strand = %self.name(), error = %err, "strand worker ended abnormally");
            }
        }
    }
}

impl Executor for Strand {
    fn post(&self, work: Work) {
        let shared = &self.inner.shared;
        let depth = shared.backlog.fetch_add(1, Ordering::Relaxed) + 1;
        if self.inner.backlog_warn == Some(depth) {
            warn!(strand = %shared.name, backlog = depth, "strand backlog reached warning threshold");
        }
        if self.inner.tx.send(work).is_err() {
            shared.backlog.fetch_sub(1, Ordering::Relaxed);
            debug!(strand = %shared.name, "strand closed; posted work dropped");
        }
    }
}

impl std::fmt::Debug for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Strand")
            .field("name", &self.name())
            .field("backlog", &self.backlog())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Marks the current thread as running on a strand for the guard's lifetime.
struct EnterGuard {
    previous: Option<Weak<Inner>>,
}

impl EnterGuard {
    fn enter(strand: &Weak<Inner>) -> Self {
        let previous =
            CURRENT_STRAND.with(|current| current.replace(Some(Weak::clone(strand))));
        Self { previous }
    }
}

impl Drop for EnterGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_STRAND.with(|current| *current.borrow_mut() = previous);
    }
}

/// Worker loop: runs queued work one item at a time until cancelled or orphaned.
async fn drive(
    shared: Arc<Shared>,
    strand: Weak<Inner>,
    mut rx: mpsc::UnboundedReceiver<Work>,
    token: CancellationToken,
) {
    loop {
        let work = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            next = rx.recv() => match next {
                Some(work) => work,
                None => break,
            },
        };
        shared.backlog.fetch_sub(1, Ordering::Relaxed);

        let entered = EnterGuard::enter(&strand);
        let outcome = std::panic::catch_unwind(AssertUnwindSafe(work));
        drop(entered);
        if let Err(payload) = outcome {
            error!(
                strand = %shared.name,
                panic = panic_message(payload.as_ref()),
                "posted work panicked"
            );
        }
    }

    rx.close();
    let mut dropped = 0usize;
    while rx.try_recv().is_ok() {
        shared.backlog.fetch_sub(1, Ordering::Relaxed);
        dropped += 1;
    }
    trace!(strand = %shared.name, dropped, "strand worker stopped");
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use tokio::sync::oneshot;

    fn strand(name: &'static str) -> Strand {
        Strand::new(StrandConfig::named(name))
    }

    #[tokio::test]
    async fn test_runs_work_in_post_order() {
        let s = strand("fifo");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (tx, rx) = oneshot::channel();

        for i in 0..100 {
            let seen = Arc::clone(&seen);
            s.post(Box::new(move || seen.lock().push(i)));
        }
        s.post(Box::new(move || {
            let _ = tx.send(());
        }));
        rx.await.expect("strand ran the final item");

        assert_eq!(*seen.lock(), (0..100).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_running_in_this_strand() {
        let a = strand("a");
        let b = strand("b");
        assert!(!a.running_in_this_strand());

        let (tx, rx) = oneshot::channel();
        let (a2, b2) = (a.clone(), b.clone());
        a.post(Box::new(move || {
            let _ = tx.send((a2.running_in_this_strand(), b2.running_in_this_strand()));
        }));

        assert_eq!(rx.await.ok(), Some((true, false)));
    }

    #[tokio::test]
    async fn test_panicking_work_does_not_stop_strand() {
        let s = strand("panics");
        s.post(Box::new(|| panic!("boom")));

        let (tx, rx) = oneshot::channel();
        s.post(Box::new(move || {
            let _ = tx.send(1);
        }));
        assert_eq!(rx.await.ok(), Some(1));
        assert!(!s.is_closed());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_backlog_counts_queued_items() {
        let s = strand("backlog");
        let (tx, rx) = oneshot::channel();
        s.post(Box::new(|| {}));
        s.post(Box::new(|| {}));
        s.post(Box::new(move || {
            let _ = tx.send(());
        }));
        assert_eq!(s.backlog(), 3);

        rx.await.expect("items ran");
        assert_eq!(s.backlog(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_discards_later_posts() {
        let s = strand("closing");
        s.shutdown().await;
        assert!(s.is_closed());

        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        s.post(Box::new(move || flag.store(true, Ordering::SeqCst)));

        tokio::task::yield_now().await;
        assert!(!ran.load(Ordering::SeqCst));
        assert_eq!(s.backlog(), 0);

        // Second shutdown is a no-op.
        s.shutdown().await;
    }

    #[tokio::test]
    async fn test_post_from_foreign_thread() {
        let s = strand("foreign");
        let (tx, rx) = oneshot::channel();
        let exec = s.executor();
        let poster = std::thread::spawn(move || {
            exec.post(Box::new(move || {
                let _ = tx.send(std::thread::current().id());
            }));
            std::thread::current().id()
        })
        .join()
        .expect("poster thread");

        let ran_on = rx.await.expect("work ran");
        assert_ne!(ran_on, poster);
    }
}
