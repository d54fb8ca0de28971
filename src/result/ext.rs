//! # Value-or-error accessors on `std::result::Result`.
//!
//! `Result<T, E>` already is the closed two-case container: `Ok` XOR `Err`,
//! immutable, with short-circuiting `and_then` / `or_else`. [`ResultExt`] adds
//! the remaining accessors used at the seams of this crate:
//!
//! | Method                      | Behaviour                                              |
//! |-----------------------------|--------------------------------------------------------|
//! | [`ResultExt::has_value`]    | `true` for `Ok`                                        |
//! | [`ResultExt::has_error`]    | `true` for `Err` (always `!has_value()`)               |
//! | [`ResultExt::value`]        | payload; **panics** on `Err`                           |
//! | [`ResultExt::error`]        | error; **panics** on `Ok`                              |
//! | [`ResultExt::value_or`]     | payload or the supplied default (error is not inspected) |
//! | [`ResultExt::transform`]    | maps the payload, error untouched                      |
//! | [`ResultExt::convert`]      | moves the error into another domain via `Into`         |
//!
//! ## Cross-domain conversion
//! ```rust
//! use callbridge::{ErrorCode, PeerConnectionError, ResultExt};
//!
//! let narrow: Result<u16, PeerConnectionError> = Err(PeerConnectionError::InvalidState);
//! let wide: Result<u16, ErrorCode> = narrow.convert();
//! assert_eq!(wide.error().as_domain::<PeerConnectionError>(), Some(PeerConnectionError::InvalidState));
//! ```

use std::fmt;

/// Accessors and combinators that complete `Result` as a value-or-error container.
pub trait ResultExt<T, E>: Sized {
    /// True if the result holds a success payload.
    fn has_value(&self) -> bool;

    /// True if the result holds an error.
    fn has_error(&self) -> bool;

    /// Returns the success payload.
    ///
    /// # Panics
    /// Panics if the result holds an error. Reading the wrong case is a
    /// programmer error, never a recoverable condition.
    fn value(self) -> T
    where
        E: fmt::Debug;

    /// Returns the error.
    ///
    /// # Panics
    /// Panics if the result holds a success payload.
    fn error(self) -> E
    where
        T: fmt::Debug;

    /// Returns the payload, or `default` if the result holds an error.
    fn value_or(self, default: T) -> T;

    /// Maps the success payload through `f`; an error passes through unchanged.
    fn transform<U, F>(self, f: F) -> Result<U, E>
    where
        F: FnOnce(T) -> U;

    /// Converts the error into another domain, keeping the payload verbatim.
    ///
    /// The mapping is the `From` impl between the two domains, so it is total
    /// and pure; an `Ok` is passed through without calling it.
    fn convert<E2>(self) -> Result<T, E2>
    where
        E: Into<E2>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    #[inline]
    fn has_value(&self) -> bool {
        self.is_ok()
    }

    #[inline]
    fn has_error(&self) -> bool {
        self.is_err()
    }

    #[track_caller]
    fn value(self) -> T
    where
        E: fmt::Debug,
    {
        match self {
            Ok(v) => v,
            Err(e) => panic!("called `value()` on a result holding an error: {e:?}"),
        }
    }

    #[track_caller]
    fn error(self) -> E
    where
        T: fmt::Debug,
    {
        match self {
            Ok(v) => panic!("called `error()` on a result holding a value: {v:?}"),
            Err(e) => e,
        }
    }

    #[inline]
    fn value_or(self, default: T) -> T {
        self.unwrap_or(default)
    }

    #[inline]
    fn transform<U, F>(self, f: F) -> Result<U, E>
    where
        F: FnOnce(T) -> U,
    {
        self.map(f)
    }

    #[inline]
    fn convert<E2>(self) -> Result<T, E2>
    where
        E: Into<E2>,
    {
        self.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Narrow {
        A = 1,
        B = 2,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Wide {
        X = 10,
        Y = 20,
    }

    impl From<Narrow> for Wide {
        fn from(e: Narrow) -> Self {
            match e {
                Narrow::A => Wide::X,
                Narrow::B => Wide::Y,
            }
        }
    }

    #[test]
    fn test_has_value_and_has_error_are_complementary() {
        let ok: Result<i32, Narrow> = Ok(1);
        let err: Result<i32, Narrow> = Err(Narrow::A);
        assert!(ok.has_value() && !ok.has_error());
        assert!(err.has_error() && !err.has_value());
    }

    #[test]
    fn test_and_then_short_circuits_on_error() {
        let calls = Cell::new(0);
        let step = |v: i32| -> Result<i32, Narrow> {
            calls.set(calls.get() + 1);
            Ok(v + 1)
        };

        let start: Result<i32, Narrow> = Err(Narrow::B);
        let out = start.and_then(step).and_then(step).and_then(step);

        assert_eq!(out, Err(Narrow::B));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_and_then_chains_on_success() {
        let out: Result<i32, Narrow> = Ok::<i32, Narrow>(1)
            .and_then(|v| Ok(v * 10))
            .and_then(|v| if v > 5 { Err(Narrow::A) } else { Ok(v) })
            .and_then(|v| Ok(v + 1));
        assert_eq!(out, Err(Narrow::A));
    }

    #[test]
    fn test_or_else_on_success_is_passthrough() {
        let calls = Cell::new(0);
        let ok: Result<&str, Narrow> = Ok("kept");
        let out = ok.or_else(|_| -> Result<&str, Narrow> {
            calls.set(calls.get() + 1);
            Ok("recovered")
        });
        assert_eq!(out, Ok("kept"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_or_else_recovers_from_error() {
        let err: Result<u8, Narrow> = Err(Narrow::A);
        let out = err.or_else(|e| if e == Narrow::A { Ok(7) } else { Err(e) });
        assert_eq!(out, Ok(7));
    }

    #[test]
    fn test_value_or_and_transform() {
        let ok: Result<i32, Narrow> = Ok(4);
        let err: Result<i32, Narrow> = Err(Narrow::A);
        assert_eq!(ok.value_or(0), 4);
        assert_eq!(err.value_or(0), 0);

        assert_eq!(ok.transform(|v| v.to_string()), Ok("4".to_string()));
        assert_eq!(err.transform(|v| v.to_string()), Err(Narrow::A));
    }

    #[test]
    fn test_convert_maps_every_error_and_keeps_values() {
        let ok: Result<&str, Narrow> = Ok("payload");
        assert_eq!(ok.convert::<Wide>(), Ok("payload"));

        let a: Result<&str, Narrow> = Err(Narrow::A);
        let b: Result<&str, Narrow> = Err(Narrow::B);
        assert_eq!(a.convert::<Wide>(), Err(Wide::X));
        assert_eq!(b.convert::<Wide>(), Err(Wide::Y));
        assert_eq!(Wide::from(Narrow::A) as i32, 10);
        assert_eq!(Wide::from(Narrow::B) as i32, 20);
    }

    #[test]
    fn test_value_and_error_accessors() {
        assert_eq!(Ok::<_, Narrow>(3).value(), 3);
        assert_eq!(Err::<i32, _>(Narrow::B).error(), Narrow::B);
    }

    #[test]
    #[should_panic(expected = "holding an error")]
    fn test_value_on_error_panics() {
        let err: Result<i32, Narrow> = Err(Narrow::A);
        let _ = err.value();
    }

    #[test]
    #[should_panic(expected = "holding a value")]
    fn test_error_on_value_panics() {
        let ok: Result<i32, Narrow> = Ok(1);
        let _ = ok.error();
    }
}
