//! Bounded, named model parameters.
//!
//! A [`Parameter`] is an immutable value type: it is validated against its
//! [`Bounds`] once, in [`Parameter::new`], and never mutated afterwards.
//! Processes collect their parameters, in declaration order, into a
//! [`Parameters`] collection that calibration layers iterate over.

use crate::errors::{Error, Result};
use crate::Real;
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// One end of a [`Bounds`] interval.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Limit {
    /// No limit on this side.
    Unbounded,
    /// The limit value itself is admissible.
    Inclusive(Real),
    /// The limit value itself is not admissible.
    Exclusive(Real),
}

/// Admissible interval for a parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Bounds {
    /// Lower limit.
    pub lower: Limit,
    /// Upper limit.
    pub upper: Limit,
}

impl Bounds {
    /// Create bounds from explicit limits.
    pub const fn new(lower: Limit, upper: Limit) -> Self {
        Self { lower, upper }
    }

    /// The whole real line.
    pub const fn unbounded() -> Self {
        Self::new(Limit::Unbounded, Limit::Unbounded)
    }

    /// `(0, ∞)`
    pub const fn positive() -> Self {
        Self::new(Limit::Exclusive(0.0), Limit::Unbounded)
    }

    /// `[0, ∞)`
    pub const fn non_negative() -> Self {
        Self::new(Limit::Inclusive(0.0), Limit::Unbounded)
    }

    /// `[lower, upper]`
    pub const fn closed(lower: Real, upper: Real) -> Self {
        Self::new(Limit::Inclusive(lower), Limit::Inclusive(upper))
    }

    /// Whether `value` lies inside the bounds. NaN is never admissible.
    pub fn contains(&self, value: Real) -> bool {
        if value.is_nan() {
            return false;
        }
        let above = match self.lower {
            Limit::Unbounded => true,
            Limit::Inclusive(l) => value >= l,
            Limit::Exclusive(l) => value > l,
        };
        let below = match self.upper {
            Limit::Unbounded => true,
            Limit::Inclusive(u) => value <= u,
            Limit::Exclusive(u) => value < u,
        };
        above && below
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lower {
            Limit::Unbounded => write!(f, "(-inf")?,
            Limit::Inclusive(l) => write!(f, "[{l}")?,
            Limit::Exclusive(l) => write!(f, "({l}")?,
        }
        match self.upper {
            Limit::Unbounded => write!(f, ", inf)"),
            Limit::Inclusive(u) => write!(f, ", {u}]"),
            Limit::Exclusive(u) => write!(f, ", {u})"),
        }
    }
}

/// A named, bounded model parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Parameter {
    name: &'static str,
    value: Real,
    bounds: Bounds,
    description: &'static str,
}

impl Parameter {
    /// Create a parameter, failing with [`Error::Validation`] when `value`
    /// lies outside `bounds`.
    ///
    /// # Example
    /// ```
    /// use qf_core::{Bounds, Parameter};
    /// let rate = Parameter::new("lambda", 2.0, Bounds::positive(), "intensity rate").unwrap();
    /// assert_eq!(rate.value(), 2.0);
    /// assert!(Parameter::new("lambda", 0.0, Bounds::positive(), "intensity rate").is_err());
    /// ```
    pub fn new(
        name: &'static str,
        value: Real,
        bounds: Bounds,
        description: &'static str,
    ) -> Result<Self> {
        if !bounds.contains(value) {
            return Err(Error::Validation(format!(
                "parameter {name} = {value} outside bounds {bounds}"
            )));
        }
        Ok(Self {
            name,
            value,
            bounds,
            description,
        })
    }

    /// The same value and bounds under another name.
    pub fn renamed(self, name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            ..self
        }
    }

    /// Parameter name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Parameter value.
    pub fn value(&self) -> Real {
        self.value
    }

    /// Admissible interval.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Free-text description.
    pub fn description(&self) -> &'static str {
        self.description
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Ordered collection of parameters, in declaration order, with unique names.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Parameters(Vec<Parameter>);

impl Parameters {
    /// Build a collection, failing with [`Error::Validation`] on duplicate
    /// names.
    pub fn new(params: Vec<Parameter>) -> Result<Self> {
        for (i, p) in params.iter().enumerate() {
            if params[..i].iter().any(|q| q.name == p.name) {
                return Err(Error::Validation(format!(
                    "duplicate parameter name {}",
                    p.name
                )));
            }
        }
        Ok(Self(params))
    }

    /// Build a collection from parameters whose names are fixed by the
    /// caller. A repeated name keeps its first occurrence.
    pub fn from_unique<I: IntoIterator<Item = Parameter>>(params: I) -> Self {
        let mut unique: Vec<Parameter> = Vec::new();
        for p in params {
            if !unique.iter().any(|q| q.name == p.name) {
                unique.push(p);
            }
        }
        Self(unique)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look a parameter up by name.
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.0.iter().find(|p| p.name == name)
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.0.iter()
    }

    /// Parameter names in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|p| p.name).collect()
    }

    /// Parameter values in declaration order.
    pub fn values(&self) -> Vec<Real> {
        self.0.iter().map(|p| p.value).collect()
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn positive_excludes_zero() {
        assert!(!Bounds::positive().contains(0.0));
        assert!(Bounds::positive().contains(1e-12));
        assert!(Bounds::non_negative().contains(0.0));
        assert!(!Bounds::non_negative().contains(-1e-12));
    }

    #[test]
    fn nan_is_rejected() {
        assert!(!Bounds::unbounded().contains(f64::NAN));
        let err = Parameter::new("sigma", f64::NAN, Bounds::unbounded(), "").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn out_of_bounds_is_validation_error() {
        let err = Parameter::new("rho", 1.5, Bounds::closed(-1.0, 1.0), "correlation").unwrap_err();
        assert_eq!(
            err,
            Error::Validation("parameter rho = 1.5 outside bounds [-1, 1]".into())
        );
    }

    #[test]
    fn collection_keeps_declaration_order() {
        let a = Parameter::new("kappa", 2.0, Bounds::positive(), "").unwrap();
        let b = Parameter::new("theta", 0.5, Bounds::non_negative(), "").unwrap();
        let params = Parameters::new(vec![a, b]).unwrap();
        assert_eq!(params.names(), vec!["kappa", "theta"]);
        assert_eq!(params.values(), vec![2.0, 0.5]);
        assert_eq!(params.get("theta").map(|p| p.value()), Some(0.5));
        assert_eq!(params.to_string(), "kappa=2, theta=0.5");
    }

    #[test]
    fn collection_rejects_duplicates() {
        let a = Parameter::new("lambda", 1.0, Bounds::positive(), "").unwrap();
        assert!(matches!(
            Parameters::new(vec![a, a]),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn renamed_keeps_value() {
        let a = Parameter::new("rate", 1.5, Bounds::positive(), "").unwrap();
        let b = a.renamed("rate_left", "first rate");
        assert_eq!((b.name(), b.value(), b.bounds()), ("rate_left", 1.5, Bounds::positive()));
        let params = Parameters::from_unique([a, b, a]);
        assert_eq!(params.names(), vec!["rate", "rate_left"]);
    }

    proptest! {
        #[test]
        fn closed_bounds_accept_interior(lo in -100.0..0.0f64, width in 0.0..100.0f64, frac in 0.0..=1.0f64) {
            let hi = lo + width;
            let bounds = Bounds::closed(lo, hi);
            prop_assert!(bounds.contains(lo + frac * width));
            prop_assert!(!bounds.contains(hi + 1.0));
        }
    }
}
