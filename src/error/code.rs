//! # Shared error space.
//!
//! Domain-specific error enumerations ([`PeerConnectionError`](crate::PeerConnectionError),
//! [`DataChannelError`](crate::DataChannelError), or any user enum implementing
//! [`ErrorDomain`]) embed losslessly into a single [`ErrorCode`] type:
//!
//! ```text
//! PeerConnectionError::InvalidSdp ──► ErrorCode { category: "librtc_peer_connection", value: 2 }
//! DataChannelError::Closed        ──► ErrorCode { category: "librtc_datachannel",     value: 5 }
//! ```
//!
//! ## Rules
//! - Every domain provides a **total** mapping into the shared space (`value()`),
//!   and a partial inverse (`from_value()`), so codes can be narrowed back.
//! - Two codes are equal iff their category names and values are equal.
//! - `0` is never an error value; success is expressed as `Ok`, not as a code.
//!
//! ## Example
//! ```rust
//! use callbridge::{DataChannelError, ErrorCode, Expected};
//!
//! fn check(open: bool) -> Result<(), DataChannelError> {
//!     if open { Ok(()) } else { Err(DataChannelError::NotOpen) }
//! }
//!
//! fn send(open: bool) -> Expected<usize> {
//!     check(open)?;
//!     Ok(3)
//! }
//!
//! let err = send(false).unwrap_err();
//! assert!(err.is::<DataChannelError>());
//! assert_eq!(err.as_domain::<DataChannelError>(), Some(DataChannelError::NotOpen));
//! assert_eq!(err.to_string(), "librtc_datachannel: Data channel is not open");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

/// Static descriptor of one error domain.
///
/// One `static` instance exists per domain; [`ErrorCode`] keeps a reference to it
/// so the code can be rendered without knowing the concrete enum.
pub struct ErrorCategory {
    name: &'static str,
    describe: fn(i32) -> String,
}

impl ErrorCategory {
    /// Creates a category descriptor.
    ///
    /// `describe` must return a message for **every** `i32`, including values
    /// the domain does not define (conventionally `"Unknown error"`).
    pub const fn new(name: &'static str, describe: fn(i32) -> String) -> Self {
        Self { name, describe }
    }

    /// Stable category name (used for equality and rendering).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Human-readable message for `value` in this category.
    pub fn message(&self, value: i32) -> String {
        (self.describe)(value)
    }
}

impl fmt::Debug for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErrorCategory").field(&self.name).finish()
    }
}

/// A narrow error enumeration that embeds into [`ErrorCode`].
///
/// Implementations must be exhaustive in `value()` (no fallback arm), so that
/// adding a variant without a mapping fails to compile.
pub trait ErrorDomain: Copy + fmt::Debug + Send + Sync + 'static {
    /// Category descriptor shared by all values of this domain.
    fn category() -> &'static ErrorCategory;

    /// Numeric value of this error inside its category (never `0`).
    fn value(self) -> i32;

    /// Inverse of [`ErrorDomain::value`]; `None` for values the domain does not define.
    fn from_value(value: i32) -> Option<Self>;
}

/// Error value in the shared error space: a category plus a numeric value.
#[derive(Clone, Copy)]
pub struct ErrorCode {
    value: i32,
    category: &'static ErrorCategory,
}

impl ErrorCode {
    /// Creates a code from its raw parts.
    pub const fn new(value: i32, category: &'static ErrorCategory) -> Self {
        Self { value, category }
    }

    /// Numeric value inside the category.
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Category this code belongs to.
    pub fn category(&self) -> &'static ErrorCategory {
        self.category
    }

    /// Human-readable message, resolved through the category.
    pub fn message(&self) -> String {
        self.category.message(self.value)
    }

    /// True if this code belongs to domain `D`.
    pub fn is<D: ErrorDomain>(&self) -> bool {
        self.category.name == D::category().name
    }

    /// Narrows the code back into domain `D`.
    ///
    /// Returns `None` if the code belongs to another category or carries a
    /// value `D` does not define.
    pub fn as_domain<D: ErrorDomain>(&self) -> Option<D> {
        if self.is::<D>() {
            D::from_value(self.value)
        } else {
            None
        }
    }
}

impl<D: ErrorDomain> From<D> for ErrorCode {
    fn from(err: D) -> Self {
        Self::new(err.value(), D::category())
    }
}

impl PartialEq for ErrorCode {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.category.name == other.category.name
    }
}

impl Eq for ErrorCode {}

impl Hash for ErrorCode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.category.name.hash(state);
        self.value.hash(state);
    }
}

impl fmt::Debug for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorCode")
            .field("category", &self.category.name)
            .field("value", &self.value)
            .field("message", &self.message())
            .finish()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category.name, self.message())
    }
}

impl std::error::Error for ErrorCode {}

/// Result whose error side is the shared [`ErrorCode`] space.
pub type Expected<T> = Result<T, ErrorCode>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DataChannelError, PeerConnectionError};
    use std::collections::HashSet;

    #[test]
    fn test_domain_embeds_into_code() {
        let code = ErrorCode::from(PeerConnectionError::InvalidSdp);
        assert_eq!(code.value(), 2);
        assert_eq!(code.category().name(), "librtc_peer_connection");
        assert_eq!(code.message(), "Invalid SDP");
    }

    #[test]
    fn test_narrowing_respects_category() {
        let code: ErrorCode = DataChannelError::InvalidArgument.into();
        assert_eq!(
            code.as_domain::<DataChannelError>(),
            Some(DataChannelError::InvalidArgument)
        );
        // Same numeric value exists in the other domain, but the category differs.
        assert_eq!(code.as_domain::<PeerConnectionError>(), None);
        assert!(!code.is::<PeerConnectionError>());
    }

    #[test]
    fn test_equality_is_category_and_value() {
        let a: ErrorCode = DataChannelError::NotOpen.into();
        let b: ErrorCode = PeerConnectionError::InvalidArgument.into();
        assert_eq!(a.value(), b.value());
        assert_ne!(a, b);

        let set: HashSet<ErrorCode> = [a, a, b].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_unknown_value_renders_fallback_message() {
        let code = ErrorCode::new(999, PeerConnectionError::category());
        assert_eq!(code.message(), "Unknown error");
        assert_eq!(code.as_domain::<PeerConnectionError>(), None);
        assert_eq!(code.to_string(), "librtc_peer_connection: Unknown error");
    }

    #[test]
    fn test_question_mark_lifts_domain_error() {
        fn close() -> Result<(), DataChannelError> {
            Err(DataChannelError::Closed)
        }
        fn open() -> Expected<()> {
            close()?;
            Ok(())
        }
        let err = open().unwrap_err();
        assert_eq!(err, ErrorCode::from(DataChannelError::Closed));
    }
}
