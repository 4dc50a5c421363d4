//! Dimension vectors
//!
//! A dimension vector maps fundamental dimension names (length, mass, time, ...)
//! to rational exponents. Units, quantities and the scaling tables are all keyed
//! by these vectors, so equality here is exact and structural.

use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedMul, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Mapping from dimension name to a non-zero rational exponent
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "BTreeMap<String, f64>", try_from = "BTreeMap<String, f64>")]
pub struct Dimensions(BTreeMap<String, Rational64>);

impl Dimensions {
    /// Create an empty (dimensionless) vector
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Create a vector with a single dimension raised to the first power
    ///
    /// # Examples
    ///
    /// ```
    /// use scaled_params::units::Dimensions;
    ///
    /// let length = Dimensions::single("length");
    /// assert!(length.is_single("length"));
    /// ```
    pub fn single(dimension: &str) -> Self {
        Self::new().with(dimension, 1)
    }

    /// Builder-style insertion of an integer exponent
    ///
    /// # Examples
    ///
    /// ```
    /// use scaled_params::units::Dimensions;
    ///
    /// let acceleration = Dimensions::new().with("length", 1).with("time", -2);
    /// assert_eq!(acceleration.len(), 2);
    /// ```
    pub fn with(mut self, dimension: &str, exponent: i64) -> Self {
        self.insert(dimension, Rational64::from_integer(exponent));
        self
    }

    /// Set the exponent of a dimension. A zero exponent removes the entry.
    pub fn insert(&mut self, dimension: &str, exponent: Rational64) {
        if exponent.is_zero() {
            self.0.remove(dimension);
        } else {
            self.0.insert(dimension.to_string(), exponent);
        }
    }

    /// Exponent of a dimension (zero when absent)
    pub fn get(&self, dimension: &str) -> Rational64 {
        self.0.get(dimension).copied().unwrap_or_else(Rational64::zero)
    }

    /// Accumulate `other * power` into this vector
    ///
    /// # Panics
    ///
    /// On exponent overflow; see [`Dimensions::checked_accumulate`].
    pub fn accumulate(&mut self, other: &Dimensions, power: Rational64) {
        for (dimension, exponent) in &other.0 {
            let combined = self.get(dimension) + *exponent * power;
            self.insert(dimension, combined);
        }
    }

    /// Accumulate `other * power`, leaving the vector untouched on overflow
    pub fn checked_accumulate(&mut self, other: &Dimensions, power: Rational64) -> Option<()> {
        let mut combined = self.clone();
        for (dimension, exponent) in &other.0 {
            let term = exponent.checked_mul(&power)?;
            combined.insert(dimension, combined.get(dimension).checked_add(&term)?);
        }
        *self = combined;
        Some(())
    }

    /// Whether this vector is exactly `{dimension: 1}`
    pub fn is_single(&self, dimension: &str) -> bool {
        self.0.len() == 1 && self.get(dimension) == Rational64::from_integer(1)
    }

    pub fn is_dimensionless(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over (dimension, exponent) pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Rational64)> {
        self.0.iter().map(|(name, exponent)| (name.as_str(), *exponent))
    }
}

/// Convert a rational exponent to a float for use with `powf`
pub(crate) fn ratio_to_f64(ratio: Rational64) -> f64 {
    ratio.to_f64().unwrap_or(f64::NAN)
}

/// Convert a float exponent to the closest small rational
pub(crate) fn ratio_from_f64(value: f64) -> Option<Rational64> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        return Some(Rational64::from_integer(value as i64));
    }
    Rational64::approximate_float(value)
}

impl<S: AsRef<str>> FromIterator<(S, i64)> for Dimensions {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        let mut dimensions = Dimensions::new();
        for (name, exponent) in iter {
            dimensions.insert(name.as_ref(), Rational64::from_integer(exponent));
        }
        dimensions
    }
}

impl From<Dimensions> for BTreeMap<String, f64> {
    fn from(dimensions: Dimensions) -> Self {
        dimensions
            .0
            .into_iter()
            .map(|(name, exponent)| (name, ratio_to_f64(exponent)))
            .collect()
    }
}

impl TryFrom<BTreeMap<String, f64>> for Dimensions {
    type Error = String;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut dimensions = Dimensions::new();
        for (name, exponent) in map {
            let ratio = ratio_from_f64(exponent)
                .ok_or_else(|| format!("invalid exponent {} for dimension '{}'", exponent, name))?;
            dimensions.insert(&name, ratio);
        }
        Ok(dimensions)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "dimensionless");
        }
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(name, exponent)| {
                if *exponent == Rational64::from_integer(1) {
                    name.clone()
                } else {
                    format!("{}^{}", name, exponent)
                }
            })
            .collect();
        write!(f, "{}", parts.join("*"))
    }
}
