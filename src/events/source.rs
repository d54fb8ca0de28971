//! # Owner side of an event stream.
//!
//! [`EventSource`] owns an [`Event`] registry and is the only type that can
//! emit into it. The owning component keeps the source private and exposes
//! `&Event<A>` to observers.
//!
//! ## Emission
//! ```text
//! emit(args)
//!   ├─► lock; sweep: drop expired records, clone live handlers; unlock
//!   └─► for handler in snapshot (subscription order):
//!          upgrade tracker ── dead ──► skip
//!                         └─ alive ──► handler(&ctx, &args)
//! ```
//!
//! ## Rules
//! - **Synchronous**: handlers run on the emitting thread before `emit` returns.
//! - **Lock-free invocation**: no lock is held while handlers run, so a handler
//!   may subscribe, unsubscribe or emit (on this or another source).
//! - **Per-emission snapshot**: subscriptions added during an emission are seen by
//!   the next emission, not the current one.
//! - **No cross-emission order**: concurrent `emit` calls from different threads
//!   may interleave their handler invocations.
//! - **Panics propagate**: a panicking handler unwinds into the emitter; the
//!   registry stays consistent because the lock is not held.

use std::fmt;
use std::ops::Deref;

use tracing::trace;

use super::event::Event;

/// Emitting side of an event stream; derefs to its subscribe-only [`Event`].
pub struct EventSource<A> {
    event: Event<A>,
}

impl<A: 'static> EventSource<A> {
    /// Creates a source with no subscriptions.
    pub fn new() -> Self {
        Self {
            event: Event::new(),
        }
    }

    /// The subscribe-only view to hand out to observers.
    pub fn event(&self) -> &Event<A> {
        &self.event
    }

    /// Emits `args` to every live subscriber.
    ///
    /// Shorthand for [`EventSource::emit_ref`] when the caller owns the arguments.
    pub fn emit(&self, args: A) {
        self.emit_ref(&args);
    }

    /// Emits borrowed `args` to every live subscriber.
    pub fn emit_ref(&self, args: &A) {
        let (targets, pruned) = self.event.sweep();
        trace!(live = targets.len(), pruned, "emitting event");
        for handler in &targets {
            handler(args);
        }
    }
}

impl<A: 'static> Default for EventSource<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Deref for EventSource<A> {
    type Target = Event<A>;

    fn deref(&self) -> &Event<A> {
        &self.event
    }
}

impl<A> fmt::Debug for EventSource<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSource")
            .field("event", &self.event)
            .finish()
    }
}
