//! Weak-tracked publish/subscribe.
//!
//! This module groups the subscription **registry** and its owner:
//!
//! ## Contents
//! - [`Event`] subscribe-only view (what observers see)
//! - [`EventSource`] owning side, the only one that can `emit`
//! - [`Tracker`] liveness check guarding each subscription (`Weak<T>`)
//!
//! ## Quick reference
//! - **Publishers**: the component owning the observable state, usually from an
//!   adapter callback running on a foreign thread.
//! - **Consumers**: any object held in an `Arc`; its subscription ends when its
//!   last strong reference is dropped.
//!
//! ## Typical wiring
//! ```rust
//! use std::sync::Arc;
//! use callbridge::{Event, EventSource};
//!
//! #[derive(Clone, Copy, Debug, PartialEq)]
//! enum State { Connecting, Open }
//!
//! #[derive(Default)]
//! struct Channel { state_change: EventSource<State> }
//!
//! impl Channel {
//!     fn on_state_change(&self) -> &Event<State> { self.state_change.event() }
//!     fn engine_reported(&self, s: State) { self.state_change.emit(s) }
//! }
//!
//! struct Ui;
//!
//! let channel = Channel::default();
//! let ui = Arc::new(Ui);
//! channel.on_state_change().subscribe(&Arc::downgrade(&ui), |_ui: &Ui, s: &State| {
//!     assert_eq!(*s, State::Open);
//! });
//! channel.engine_reported(State::Open);
//! ```

mod event;
mod source;
mod tracker;

pub use event::{Event, SubscriptionId};
pub use source::EventSource;
pub use tracker::Tracker;
