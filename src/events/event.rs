//! # Subscription registry and its subscribe-only view.
//!
//! [`Event`] stores subscriptions as `(tracker, handler)` records. It never owns
//! the subscribing object: the tracker is a [`Weak`] reference, and the stored
//! handler upgrades a second weak copy immediately before each invocation.
//!
//! ```text
//! subscribe(&weak, handler)
//!     └─► Subscription { id, tracker: weak, handler: |args| if let Some(ctx) = weak.upgrade() { handler(&ctx, args) } }
//!
//! sweep()   (under lock, one pass)
//!     ├─ tracker dead  ─► record removed (dropped after unlock)
//!     └─ tracker alive ─► handler cloned into snapshot
//! ```
//!
//! [`Event::subscribe_tracked`] accepts any other [`Tracker`]; its handler
//! re-checks that tracker instead of upgrading.
//!
//! The only way to run handlers is [`EventSource::emit`](super::EventSource::emit);
//! components hand out `&Event<A>` so observers can subscribe but not emit.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::tracker::Tracker;

/// Type-erased handler stored in the registry.
pub(crate) type Handler<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// Identity of one subscription inside one [`Event`].
///
/// Ids are unique per event and increase in subscription order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscription<A> {
    id: SubscriptionId,
    tracker: Box<dyn Tracker>,
    handler: Handler<A>,
}

/// Subscribe-only view of an event stream.
///
/// Obtained from an [`EventSource`](super::EventSource) (by `Deref` or
/// [`EventSource::event`](super::EventSource::event)). All methods are
/// thread-safe and may be called from inside a handler.
pub struct Event<A> {
    subscriptions: Mutex<Vec<Subscription<A>>>,
    next_id: AtomicU64,
}

impl<A: 'static> Event<A> {
    pub(crate) fn new() -> Self {
        Self {
            subscriptions: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Subscribes `handler`, guarded by the liveness of `tracker`.
    ///
    /// The handler receives the upgraded tracked object and the emitted
    /// arguments. It is never invoked once the tracked object is gone, and the
    /// registry never keeps the object alive.
    ///
    /// The returned id only matters for [`Event::unsubscribe`]; dropping the
    /// tracked object is the usual way to end a subscription.
    ///
    /// # Example
    /// ```rust
    /// use std::sync::Arc;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use callbridge::EventSource;
    ///
    /// struct Counter(AtomicUsize);
    ///
    /// let source: EventSource<u32> = EventSource::new();
    /// let counter = Arc::new(Counter(AtomicUsize::new(0)));
    /// source.subscribe(&Arc::downgrade(&counter), |c: &Counter, n: &u32| {
    ///     c.0.fetch_add(*n as usize, Ordering::SeqCst);
    /// });
    ///
    /// source.emit(2);
    /// source.emit(3);
    /// assert_eq!(counter.0.load(Ordering::SeqCst), 5);
    /// ```
    pub fn subscribe<T, F>(&self, tracker: &Weak<T>, handler: F) -> SubscriptionId
    where
        T: Send + Sync + 'static,
        F: Fn(&T, &A) + Send + Sync + 'static,
    {
        let context = Weak::clone(tracker);
        let guarded: Handler<A> = Arc::new(move |args: &A| {
            if let Some(ctx) = context.upgrade() {
                handler(&ctx, args);
            }
        });
        self.insert(Box::new(Weak::clone(tracker)), guarded)
    }

    /// Subscribes `handler`, guarded by any [`Tracker`].
    ///
    /// For lifetimes not expressed as a `Weak`, such as a session flag or a
    /// cancellation token. The tracker is checked during the sweep and again
    /// right before each invocation; unlike [`Event::subscribe`], nothing keeps
    /// the tracked state pinned while the handler runs.
    pub fn subscribe_tracked<K, F>(&self, tracker: K, handler: F) -> SubscriptionId
    where
        K: Tracker,
        F: Fn(&A) + Send + Sync + 'static,
    {
        let tracker = Arc::new(tracker);
        let guard = Arc::clone(&tracker);
        let guarded: Handler<A> = Arc::new(move |args: &A| {
            if guard.is_alive() {
                handler(args);
            }
        });
        self.insert(Box::new(tracker), guarded)
    }

    /// Removes a subscription by id.
    ///
    /// Returns `false` if the id is unknown (already removed or pruned). A
    /// snapshot taken by an emission in progress may still invoke the handler
    /// once more.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = {
            let mut subs = self.subscriptions.lock();
            subs.iter()
                .position(|s| s.id == id)
                .map(|idx| subs.remove(idx))
        };
        removed.is_some()
    }

    /// Number of stored records, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.subscriptions.lock().len()
    }

    /// True if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.lock().is_empty()
    }

    fn insert(&self, tracker: Box<dyn Tracker>, handler: Handler<A>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscriptions.lock().push(Subscription {
            id,
            tracker,
            handler,
        });
        id
    }

    /// Prunes expired records and returns the live handlers in subscription order,
    /// plus the number of pruned records.
    ///
    /// Pruned records are dropped after the lock is released, so captured state
    /// with re-entrant `Drop` impls cannot deadlock the registry.
    pub(crate) fn sweep(&self) -> (Vec<Handler<A>>, usize) {
        let (live, expired) = {
            let mut subs = self.subscriptions.lock();
            let (kept, expired): (Vec<_>, Vec<_>) = std::mem::take(&mut *subs)
                .into_iter()
                .partition(|s| s.tracker.is_alive());
            *subs = kept;
            let live: Vec<Handler<A>> = subs.iter().map(|s| Arc::clone(&s.handler)).collect();
            (live, expired)
        };
        let pruned = expired.len();
        drop(expired);
        (live, pruned)
    }
}

impl<A> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("subscriptions", &self.subscriptions.lock().len())
            .finish()
    }
}
