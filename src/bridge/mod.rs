//! Callback-to-future bridge.
//!
//! Adapts an operation that reports completion through a callback (possibly on
//! a foreign thread, possibly synchronously) into a future that resolves with a
//! `Result<T, E>` delivered on a chosen execution context.
//!
//! The delivery is a work item posted to the context; it wakes the awaiting
//! future. To also run the continuation there, await inside a future hosted
//! on that context with [`Strand::spawn`](crate::Strand::spawn): the code after
//! the `.await` then runs on the strand, and several awaiters resume in the
//! order their results were delivered.
//!
//! ## Contents
//! - [`run`], [`run_on`], [`run_with`]: awaitable entry points
//! - [`completion_pair`]: the underlying handoff, for adapters that store the
//!   callback inside a vendor observer
//! - [`Completion`]: the callback end (cloneable, thread-safe, first fire wins)
//! - [`Pending`]: the awaiting end
//!
//! ## Failure modes
//! | Situation                           | Outcome                                     |
//! |-------------------------------------|---------------------------------------------|
//! | operation fails                     | `Err(e)` through the same channel as `Ok`   |
//! | callback fires twice                | second fire discarded                       |
//! | callback fires after caller timeout | delivery posted, result discarded           |
//! | callback never fires                | future stays pending (caller owns timeouts) |

mod completion;
mod run;

pub use completion::{completion_pair, Completion, Pending};
pub use run::{run, run_on, run_with};
