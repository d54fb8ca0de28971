//! Result container helpers.
//!
//! See [`ResultExt`] for the accessor set layered over `std::result::Result`.

mod ext;

pub use ext::ResultExt;
