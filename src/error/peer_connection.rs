//! Failures reported by session negotiation operations (offer/answer creation,
//! applying local/remote descriptions, candidate handling).

use thiserror::Error;

use super::code::{ErrorCategory, ErrorDomain};

static CATEGORY: ErrorCategory = ErrorCategory::new("librtc_peer_connection", describe);

fn describe(value: i32) -> String {
    PeerConnectionError::from_value(value)
        .map_or_else(|| "Unknown error".to_string(), |e| e.to_string())
}

/// # Errors produced by peer-connection operations.
///
/// Values start at `1`; success is never encoded as an error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum PeerConnectionError {
    /// A parameter was malformed or out of its accepted set.
    #[error("Invalid argument")]
    InvalidArgument = 1,
    /// A session description could not be parsed.
    #[error("Invalid SDP")]
    InvalidSdp = 2,
    /// The operation is not valid in the current signaling state.
    #[error("Invalid state")]
    InvalidState = 3,
    /// The underlying engine failed for an unspecified reason.
    #[error("Internal error")]
    InternalError = 4,
    /// The operation was cancelled before it completed.
    #[error("Operation canceled")]
    OperationCanceled = 5,
    /// The engine does not support the requested operation.
    #[error("Unsupported operation")]
    UnsupportedOperation = 6,
    /// The engine does not support a supplied parameter.
    #[error("Unsupported parameter")]
    UnsupportedParameter = 7,
    /// A numeric parameter fell outside its valid range.
    #[error("Invalid range")]
    InvalidRange = 8,
    /// A textual parameter was syntactically invalid.
    #[error("Syntax error")]
    SyntaxError = 9,
    /// An attempt was made to modify an immutable property.
    #[error("Invalid modification")]
    InvalidModification = 10,
    /// Transport-level failure.
    #[error("Network error")]
    NetworkError = 11,
    /// The engine ran out of a bounded resource.
    #[error("Resource exhausted")]
    ResourceExhausted = 12,
    /// Generic operation failure carrying engine-specific data.
    #[error("Operation error")]
    OperationError = 13,
}

impl PeerConnectionError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use callbridge::PeerConnectionError;
    ///
    /// assert_eq!(PeerConnectionError::InvalidSdp.as_label(), "pc_invalid_sdp");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "pc_invalid_argument",
            Self::InvalidSdp => "pc_invalid_sdp",
            Self::InvalidState => "pc_invalid_state",
            Self::InternalError => "pc_internal_error",
            Self::OperationCanceled => "pc_operation_canceled",
            Self::UnsupportedOperation => "pc_unsupported_operation",
            Self::UnsupportedParameter => "pc_unsupported_parameter",
            Self::InvalidRange => "pc_invalid_range",
            Self::SyntaxError => "pc_syntax_error",
            Self::InvalidModification => "pc_invalid_modification",
            Self::NetworkError => "pc_network_error",
            Self::ResourceExhausted => "pc_resource_exhausted",
            Self::OperationError => "pc_operation_error",
        }
    }
}

impl ErrorDomain for PeerConnectionError {
    fn category() -> &'static ErrorCategory {
        &CATEGORY
    }

    fn value(self) -> i32 {
        self as i32
    }

    fn from_value(value: i32) -> Option<Self> {
        Some(match value {
            1 => Self::InvalidArgument,
            2 => Self::InvalidSdp,
            3 => Self::InvalidState,
            4 => Self::InternalError,
            5 => Self::OperationCanceled,
            6 => Self::UnsupportedOperation,
            7 => Self::UnsupportedParameter,
            8 => Self::InvalidRange,
            9 => Self::SyntaxError,
            10 => Self::InvalidModification,
            11 => Self::NetworkError,
            12 => Self::ResourceExhausted,
            13 => Self::OperationError,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_are_dense_and_invertible() {
        for value in 1..=13 {
            let err = PeerConnectionError::from_value(value).expect("defined value");
            assert_eq!(err.value(), value);
        }
        assert_eq!(PeerConnectionError::from_value(0), None);
        assert_eq!(PeerConnectionError::from_value(14), None);
    }

    #[test]
    fn test_messages() {
        assert_eq!(PeerConnectionError::InvalidSdp.to_string(), "Invalid SDP");
        assert_eq!(
            PeerConnectionError::ResourceExhausted.to_string(),
            "Resource exhausted"
        );
        assert_eq!(PeerConnectionError::category().message(11), "Network error");
    }
}
