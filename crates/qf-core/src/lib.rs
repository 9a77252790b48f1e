//! # qf-core
//!
//! Core types, error definitions, and bounded parameters for quantflow-rs.
//!
//! This crate provides the foundational building blocks shared across the
//! other crates in the workspace – type aliases, the error hierarchy with its
//! `ensure!`-style macros, and the immutable [`Parameter`] / [`Parameters`]
//! value types through which every process exposes its model inputs.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `ensure_config!` / `not_implemented!`
/// macros.
pub mod errors;

/// Bounded, named model parameters.
pub mod parameters;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for array sizes / indices.
pub type Size = usize;

/// An intensity or arrival rate.
pub type Rate = Real;

/// A volatility level expressed as a decimal.
pub type Volatility = Real;

/// A time measurement (horizon) in years.
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use parameters::{Bounds, Limit, Parameter, Parameters};
