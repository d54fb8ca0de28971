//! # callbridge
//!
//! **callbridge** makes a callback-driven, multi-threaded native subsystem safe
//! to consume from async Rust.
//!
//! It provides two primitives and the error plumbing they share:
//! - a weak-tracked publish/subscribe **event** mechanism that never keeps
//!   observers alive and never calls them after they are gone;
//! - an **async bridge** that turns a one-shot completion callback, fired from
//!   any thread, into a future whose result is delivered exactly once on a
//!   chosen execution context.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   native engine threads (callbacks)
//!        │                        │
//!        │ state changes          │ operation finished
//!        ▼                        ▼
//! ┌──────────────────┐    ┌──────────────────────┐
//! │   EventSource    │    │  Completion<T, E>    │
//! │  emit(args)      │    │  complete(Result)    │
//! └───────┬──────────┘    └──────────┬───────────┘
//!         │ snapshot live            │ post (never inline)
//!         │ subscribers              ▼
//!         ▼                 ┌──────────────────┐
//!  handler(&ctx, &args)     │ Executor / Strand│
//!  (only if Weak upgrades)  └────────┬─────────┘
//!                                    ▼ wakes
//!                           Pending<T, E>.await ──► Result<T, E>
//!                           (continues on the strand when hosted
//!                            there with Strand::spawn)
//! ```
//!
//! ### Roles
//! - **Owner component** keeps an [`EventSource`] private and exposes `&Event<A>`.
//! - **Observers** subscribe with a `Weak` to themselves; dropping their last
//!   `Arc` ends the subscription.
//! - **Adapters** (vendor glue, outside this crate) call `emit` and
//!   [`Completion::complete`] from whatever thread the engine uses.
//!
//! ## Features
//! | Area                | Description                                             | Key types                                  |
//! |---------------------|---------------------------------------------------------|--------------------------------------------|
//! | **Events**          | Thread-safe, weak-tracked subscription registry.        | [`Event`], [`EventSource`], [`Tracker`]    |
//! | **Bridge**          | Callback → future with executor-posted delivery.        | [`bridge::run`], [`Completion`], [`Pending`] |
//! | **Executors**       | Contexts that accept posted work; serial strands that host futures. | [`Executor`], [`Strand`], [`StrandTask`] |
//! | **Results**         | Value-or-error accessors and cross-domain conversion.   | [`ResultExt`]                              |
//! | **Errors**          | Shared error space and domain enumerations.             | [`ErrorCode`], [`PeerConnectionError`], [`DataChannelError`] |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use callbridge::{bridge, EventSource, PeerConnectionError, Strand, StrandConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let signaling = Strand::new(StrandConfig::named("signaling"));
//!
//!     // Operation completed by a foreign thread; the hosted code resumes on the strand.
//!     let strand = signaling.clone();
//!     let offer = signaling
//!         .spawn(async move {
//!             let offer = bridge::run::<String, PeerConnectionError, _>(|done| {
//!                 std::thread::spawn(move || done.succeed("v=0".to_string()));
//!             })
//!             .await;
//!             assert!(strand.running_in_this_strand());
//!             offer
//!         })
//!         .await
//!         .expect("strand still running");
//!     assert_eq!(offer.as_deref(), Ok("v=0"));
//!
//!     // State changes fanned out to live observers only.
//!     let states: EventSource<&'static str> = EventSource::new();
//!     let observer = Arc::new(());
//!     states.subscribe(&Arc::downgrade(&observer), |_: &(), s: &&'static str| {
//!         println!("state: {s}");
//!     });
//!     states.emit("stable");
//!
//!     signaling.shutdown().await;
//! }
//! ```

pub mod bridge;
mod error;
mod events;
mod executor;
mod result;

// ---- Public re-exports ----

pub use bridge::{completion_pair, Completion, Pending};
pub use error::{
    DataChannelError, ErrorCategory, ErrorCode, ErrorDomain, Expected, PeerConnectionError,
};
pub use events::{Event, EventSource, SubscriptionId, Tracker};
pub use executor::{
    current_executor, Executor, ExecutorRef, Strand, StrandClosed, StrandConfig, StrandTask, Work,
};
pub use result::ResultExt;
