//! # Strand configuration.
//!
//! Provides [`StrandConfig`], the settings of a serial execution context.
//!
//! ## Sentinel values
//! - `backlog_warn = 0` → no backlog warning

use std::borrow::Cow;

/// Configuration of a [`Strand`](super::Strand).
///
/// ## Field semantics
/// - `name`: label attached to every log line the strand emits
/// - `backlog_warn`: queued-item count at which a warning is logged (`0` = never)
#[derive(Clone, Debug)]
pub struct StrandConfig {
    /// Label used in logs.
    pub name: Cow<'static, str>,

    /// Backlog size that triggers a warning.
    ///
    /// The queue itself is unbounded (posting never blocks a foreign thread);
    /// the warning fires once each time the backlog climbs to this value.
    pub backlog_warn: usize,
}

impl StrandConfig {
    /// Creates a config with the given name and default thresholds.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the backlog warning threshold as an `Option`.
    ///
    /// - `None` → warning disabled
    /// - `Some(n)` → warn when `n` items are queued
    #[inline]
    pub fn backlog_warn_threshold(&self) -> Option<usize> {
        if self.backlog_warn == 0 {
            None
        } else {
            Some(self.backlog_warn)
        }
    }
}

impl Default for StrandConfig {
    /// Default configuration:
    ///
    /// - `name = "strand"`
    /// - `backlog_warn = 1024`
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("strand"),
            backlog_warn: 1024,
        }
    }
}
