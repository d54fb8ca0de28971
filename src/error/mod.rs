//! Error types shared by every fallible operation in the crate.
//!
//! - [`ErrorCode`] / [`ErrorCategory`] / [`ErrorDomain`]: the shared error space
//!   and the contract narrow domains implement to embed into it.
//! - [`PeerConnectionError`]: session negotiation failures.
//! - [`DataChannelError`]: data transport failures.
//!
//! Failures are always values carried in a `Result`; nothing here panics.

mod code;
mod data_channel;
mod peer_connection;

pub use code::{ErrorCategory, ErrorCode, ErrorDomain, Expected};
pub use data_channel::DataChannelError;
pub use peer_connection::PeerConnectionError;
