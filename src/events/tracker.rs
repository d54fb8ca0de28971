//! Lifetime trackers guarding subscriptions.

use std::sync::{Arc, Weak};

/// Liveness check for the object a subscription belongs to.
///
/// A tracker never owns the object it observes: holding one must not keep the
/// object alive.
///
/// `Weak<T>` is the usual tracker ([`Event::subscribe`](super::Event::subscribe)).
/// Other implementations plug in through
/// [`Event::subscribe_tracked`](super::Event::subscribe_tracked).
pub trait Tracker: Send + Sync + 'static {
    /// True while the tracked object is still owned by someone.
    fn is_alive(&self) -> bool;
}

impl<T> Tracker for Weak<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    #[inline]
    fn is_alive(&self) -> bool {
        self.strong_count() > 0
    }
}

/// A shared tracker reports the liveness of the tracker it points to.
impl<K> Tracker for Arc<K>
where
    K: Tracker + ?Sized,
{
    #[inline]
    fn is_alive(&self) -> bool {
        (**self).is_alive()
    }
}
