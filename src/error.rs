//! Error types for the memocache library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when cache configuration parameters are invalid
//!   (zero capacity, zero refresh threshold). Raised at construction time only;
//!   no cache operation fails after a cache has been built.
//! - [`InvariantError`]: Returned by `check_invariants` methods when internal
//!   bookkeeping has diverged. Seeing one means a bug in this crate.
//!
//! Errors produced by a memoized function are never wrapped: the
//! [`Memoizer`](crate::memoize::Memoizer) hands them back to the caller as-is.
//!
//! ## Example Usage
//!
//! ```
//! use memocache::error::ConfigError;
//! use memocache::policy::lfu::LfuCore;
//!
//! let cache: Result<LfuCore<String, i32>, ConfigError> = LfuCore::try_new(100, 5);
//! assert!(cache.is_ok());
//!
//! // A zero refresh threshold would turn every read into a modulus by zero.
//! let bad = LfuCore::<String, i32>::try_new(100, 0);
//! assert_eq!(bad.unwrap_err(), ConfigError::ZeroRefreshThreshold);
//! ```

use thiserror::Error;

/// Error returned when cache configuration parameters are invalid.
///
/// # Example
///
/// ```
/// use memocache::error::ConfigError;
/// use memocache::policy::lfu::LfuCore;
///
/// let err = LfuCore::<u64, u64>::try_new(0, 3).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("capacity must be greater than zero")]
    ZeroCapacity,

    #[error("refresh threshold must be greater than zero")]
    ZeroRefreshThreshold,
}

/// Error returned when internal cache invariants are violated.
///
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_display_names_the_parameter() {
        assert_eq!(
            ConfigError::ZeroCapacity.to_string(),
            "capacity must be greater than zero"
        );
        assert_eq!(
            ConfigError::ZeroRefreshThreshold.to_string(),
            "refresh threshold must be greater than zero"
        );
    }

    #[test]
    fn config_implements_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<ConfigError>();
    }

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("min_freq points at an empty bucket");
        assert_eq!(err.to_string(), "min_freq points at an empty bucket");
        assert_eq!(err.message(), "min_freq points at an empty bucket");
    }

    #[test]
    fn invariant_clone_and_eq() {
        let a = InvariantError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }
}
