//! # Completion slot shared between a callback and its awaiter.
//!
//! [`completion_pair`] creates the two ends of one pending operation:
//!
//! ```text
//!   Completion (cloneable, handed to the external system)
//!        │ complete(result)         any thread, any time
//!        ▼
//!   take sender (first fire only) ──► executor.post(|| sender.send(result))
//!                                              │  runs on the target context
//!                                              ▼
//!                                   Pending woken ──► continuation polled where the
//!                                                     awaiting future is hosted
//! ```
//!
//! ## Rules
//! - The result is **posted**, never delivered inline, even when `complete` is
//!   called synchronously from inside the initiating call.
//! - **First fire wins**: later fires on any clone are discarded (debug log).
//! - If the awaiter is gone (timed out, dropped), the posted item still runs
//!   and discards the result.
//! - If every `Completion` is dropped without firing, or the target context
//!   drops the posted item, the `Pending` never resolves.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::executor::ExecutorRef;

struct Slot<T, E> {
    executor: ExecutorRef,
    sender: Mutex<Option<oneshot::Sender<Result<T, E>>>>,
}

/// Callback end of a pending operation.
///
/// Clones share one slot; the slot (and the target executor) stays alive for as
/// long as any clone does, independently of the frame that started the
/// operation.
pub struct Completion<T, E> {
    slot: Arc<Slot<T, E>>,
}

/// Awaiting end of a pending operation; resolves with the first completed result.
#[must_use = "futures do nothing unless polled"]
pub struct Pending<T, E> {
    receiver: oneshot::Receiver<Result<T, E>>,
    orphaned: bool,
}

/// Creates a connected [`Completion`] / [`Pending`] pair whose result is
/// delivered through `executor`.
///
/// # Example
/// ```rust
/// use callbridge::{completion_pair, current_executor, PeerConnectionError};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (done, pending) = completion_pair::<String, PeerConnectionError>(current_executor());
///
/// // Typically stored inside a vendor observer and fired from its thread.
/// std::thread::spawn(move || done.succeed("v=0".to_string()));
///
/// assert_eq!(pending.await, Ok("v=0".to_string()));
/// # }
/// ```
pub fn completion_pair<T, E>(executor: ExecutorRef) -> (Completion<T, E>, Pending<T, E>)
where
    T: Send + 'static,
    E: Send + 'static,
{
    let (sender, receiver) = oneshot::channel();
    let completion = Completion {
        slot: Arc::new(Slot {
            executor,
            sender: Mutex::new(Some(sender)),
        }),
    };
    let pending = Pending {
        receiver,
        orphaned: false,
    };
    (completion, pending)
}

impl<T, E> Completion<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Delivers `result` to the awaiter by posting it onto the target executor.
    ///
    /// Never blocks and never runs the awaiter inline. Only the first call across
    /// all clones has an effect.
    pub fn complete(&self, result: Result<T, E>) {
        let Some(sender) = self.slot.sender.lock().take() else {
            debug!("completion fired more than once; extra result discarded");
            return;
        };
        self.slot.executor.post(Box::new(move || {
            if sender.send(result).is_err() {
                debug!("awaiter gone; late completion discarded");
            }
        }));
    }

    /// Shorthand for `complete(Ok(value))`.
    pub fn succeed(&self, value: T) {
        self.complete(Ok(value));
    }

    /// Shorthand for `complete(Err(error))`.
    pub fn fail(&self, error: E) {
        self.complete(Err(error));
    }

    /// True once any clone has fired.
    pub fn is_fired(&self) -> bool {
        self.slot.sender.lock().is_none()
    }

    /// Converts the completion into a plain callback, for APIs that take closures.
    pub fn into_callback(self) -> impl Fn(Result<T, E>) + Send + Sync + 'static {
        move |result| self.complete(result)
    }
}

impl<T, E> Clone for Completion<T, E> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T, E> fmt::Debug for Completion<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("fired", &self.slot.sender.lock().is_none())
            .finish()
    }
}

impl<T, E> Pending<T, E> {
    /// True if the operation can no longer resolve (every completion was dropped
    /// unfired, or the posted delivery was discarded by its executor).
    pub fn is_orphaned(&self) -> bool {
        self.orphaned
    }
}

// No pinned projections: the receiver is polled through `Pin::new`.
impl<T, E> Unpin for Pending<T, E> {}

impl<T, E> Future for Pending<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.orphaned {
            return Poll::Pending;
        }
        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => {
                this.orphaned = true;
                warn!("completion dropped without firing; operation will never resume");
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T, E> fmt::Debug for Pending<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending")
            .field("orphaned", &self.orphaned)
            .finish()
    }
}
