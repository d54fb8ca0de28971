//! # Awaitable entry points.
//!
//! ```text
//! run_with(executor?, initiate)           (first poll)
//!   ├─► executor = explicit or current_executor() (caller's strand, else runtime)
//!   ├─► (completion, pending) = completion_pair(executor)
//!   ├─► initiate(completion)              starts the external operation, returns at once
//!   └─► pending.await                     the only suspension point
//! ```
//!
//! The delivery runs on the executor and wakes the awaiting future. Code after
//! the `.await` runs where that future is polled, so awaiting inside
//! [`Strand::spawn`](crate::Strand::spawn) resumes on the strand, in delivery
//! order.
//!
//! The bridge imposes no timeout. Callers that need one race the returned
//! future against a timer (e.g. `tokio::time::timeout`); a completion firing
//! after the race was lost is posted and discarded.

use crate::executor::{current_executor, ExecutorRef};

use super::completion::{completion_pair, Completion};

/// Runs a callback-style operation and resumes in the caller's own context.
///
/// Equivalent to [`run_with`] with no explicit executor: inside a strand the
/// result comes back through that strand, elsewhere through the runtime.
///
/// # Panics
/// Panics if first polled outside both a strand and a tokio runtime.
///
/// # Example
/// ```rust
/// use callbridge::{bridge, DataChannelError};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let sent = bridge::run::<usize, DataChannelError, _>(|done| {
///     // Stand-in for a vendor call that reports back on its own thread.
///     std::thread::spawn(move || done.succeed(128));
/// })
/// .await;
///
/// assert_eq!(sent, Ok(128));
/// # }
/// ```
pub async fn run<T, E, F>(initiate: F) -> Result<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnOnce(Completion<T, E>),
{
    run_with(None, initiate).await
}

/// Runs a callback-style operation whose result is delivered through `executor`.
///
/// The continuation resumes on `executor` when the awaiting code is hosted
/// there (see [`Strand::spawn`](crate::Strand::spawn)).
pub async fn run_on<T, E, F>(executor: ExecutorRef, initiate: F) -> Result<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnOnce(Completion<T, E>),
{
    run_with(Some(executor), initiate).await
}

/// Runs a callback-style operation, delivering through `executor` if given,
/// otherwise through [`current_executor`] as seen at first poll.
///
/// `initiate` is called once, on first poll, with the completion callback. It
/// must start the external operation and return without waiting for it. The
/// completion may be fired from any thread, synchronously or later; the result
/// is always delivered through the executor.
///
/// If the completion is never fired, the future never resolves.
///
/// # Panics
/// Panics if `executor` is `None` and the future is first polled outside both
/// a strand and a tokio runtime.
pub async fn run_with<T, E, F>(executor: Option<ExecutorRef>, initiate: F) -> Result<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnOnce(Completion<T, E>),
{
    let executor = executor.unwrap_or_else(current_executor);
    let (completion, pending) = completion_pair(executor);
    initiate(completion);
    pending.await
}
