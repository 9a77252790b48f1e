//! Error types for quantflow-rs.
//!
//! A single `thiserror`-derived enum covers the whole workspace. The
//! numerical core never retries: every failure is deterministic, so each
//! variant describes a caller mistake or a missing capability rather than a
//! transient condition.

use thiserror::Error;

/// The top-level error type used throughout quantflow-rs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// A parameter value falls outside its declared bounds, or a parameter
    /// collection is malformed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid transform or sampling setup, reported before any numeric work.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Postcondition violated.
    #[error("postcondition not satisfied: {0}")]
    Postcondition(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation has no closed form and no numerical fallback.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

/// Shorthand `Result` type used throughout quantflow-rs.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use qf_core::{ensure, errors::Error};
/// fn positive(x: f64) -> qf_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Configuration(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use qf_core::{ensure_config, errors::Error};
/// fn grid(n: usize) -> qf_core::errors::Result<usize> {
///     ensure_config!(n > 0, "sample count must be positive");
///     Ok(n)
/// }
/// assert!(matches!(grid(0), Err(Error::Configuration(_))));
/// ```
#[macro_export]
macro_rules! ensure_config {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Configuration(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Postcondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use qf_core::{ensure_post, errors::Error};
/// fn compute(x: f64) -> qf_core::errors::Result<f64> {
///     let result = x * 2.0;
///     ensure_post!(result > 0.0, "result must be positive, got {result}");
///     Ok(result)
/// }
/// assert!(compute(1.0).is_ok());
/// assert!(compute(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure_post {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Postcondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::NotImplemented(...))` immediately.
///
/// # Example
/// ```
/// use qf_core::{not_implemented, errors::Error};
/// fn sample() -> qf_core::errors::Result<()> {
///     not_implemented!("sampling is not available for {}", "Skellam");
/// }
/// assert!(matches!(sample(), Err(Error::NotImplemented(_))));
/// ```
#[macro_export]
macro_rules! not_implemented {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::NotImplemented(format!($($msg)*)))
    };
}

/// Returns `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use qf_core::{fail, errors::Error};
/// fn always_err() -> qf_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}
