//! Failures reported by data-channel operations.

use thiserror::Error;

use super::code::{ErrorCategory, ErrorDomain};

static CATEGORY: ErrorCategory = ErrorCategory::new("librtc_datachannel", describe);

fn describe(value: i32) -> String {
    DataChannelError::from_value(value)
        .map_or_else(|| "Unknown error".to_string(), |e| e.to_string())
}

/// # Errors produced by data-channel operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum DataChannelError {
    /// The channel has not reached the open state yet.
    #[error("Data channel is not open")]
    NotOpen = 1,
    /// The outgoing buffer cannot accept more data right now.
    #[error("Send buffer is full")]
    BufferFull = 2,
    /// A parameter was malformed.
    #[error("Invalid argument")]
    InvalidArgument = 3,
    /// The payload could not be accepted by the transport.
    #[error("Invalid data")]
    InvalidData = 4,
    /// The channel was closed.
    #[error("Data channel is closed")]
    Closed = 5,
}

impl DataChannelError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::NotOpen => "dc_not_open",
            Self::BufferFull => "dc_buffer_full",
            Self::InvalidArgument => "dc_invalid_argument",
            Self::InvalidData => "dc_invalid_data",
            Self::Closed => "dc_closed",
        }
    }

    /// True if retrying the same send later may succeed.
    ///
    /// Only [`DataChannelError::BufferFull`] is transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::BufferFull)
    }
}

impl ErrorDomain for DataChannelError {
    fn category() -> &'static ErrorCategory {
        &CATEGORY
    }

    fn value(self) -> i32 {
        self as i32
    }

    fn from_value(value: i32) -> Option<Self> {
        Some(match value {
            1 => Self::NotOpen,
            2 => Self::BufferFull,
            3 => Self::InvalidArgument,
            4 => Self::InvalidData,
            5 => Self::Closed,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_buffer_full_is_retryable() {
        assert!(DataChannelError::BufferFull.is_retryable());
        assert!(!DataChannelError::Closed.is_retryable());
        assert!(!DataChannelError::NotOpen.is_retryable());
    }

    #[test]
    fn test_category_message_matches_display() {
        for value in 1..=5 {
            let err = DataChannelError::from_value(value).expect("defined value");
            assert_eq!(DataChannelError::category().message(value), err.to_string());
        }
        assert_eq!(DataChannelError::category().message(0), "Unknown error");
    }
}
