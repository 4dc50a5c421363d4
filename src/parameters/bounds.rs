//! Parameter bounds
//!
//! Bounds restrict the *scaled* value of a parameter. A parameter may carry
//! several intervals; a value is acceptable when it lies in at least one.

use serde::{Deserialize, Serialize};
use std::f64::{INFINITY, NEG_INFINITY};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when working with parameter bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundsError {
    #[error("Invalid bounds: min ({min}) must be less than max ({max})")]
    InvalidBounds { min: f64, max: f64 },

    #[error("Parameter value {value} is outside bounds: {intervals}")]
    ValueOutsideBounds { value: f64, intervals: String },
}

/// A closed interval `[min, max]` on the scaled value of a parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum allowed value
    pub min: f64,

    /// Maximum allowed value
    pub max: f64,
}

impl Serialize for Bounds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeTuple;

        // Infinite ends are written as null
        let mut state = serializer.serialize_tuple(2)?;
        state.serialize_element(&Some(self.min).filter(|min| min.is_finite()))?;
        state.serialize_element(&Some(self.max).filter(|max| max.is_finite()))?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Bounds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (min, max) = <(Option<f64>, Option<f64>)>::deserialize(deserializer)?;
        Bounds::new(min.unwrap_or(NEG_INFINITY), max.unwrap_or(INFINITY))
            .map_err(serde::de::Error::custom)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: NEG_INFINITY,
            max: INFINITY,
        }
    }
}

impl Bounds {
    /// Create a new interval
    ///
    /// # Arguments
    ///
    /// * `min` - Minimum allowed scaled value
    /// * `max` - Maximum allowed scaled value
    ///
    /// # Returns
    ///
    /// A new `Bounds` object if min <= max, or an error otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use scaled_params::parameters::Bounds;
    ///
    /// let bounds = Bounds::new(0.0, 10.0).unwrap();
    /// assert!(bounds.contains(10.0));
    /// assert!(!bounds.contains(10.5));
    /// assert!(Bounds::new(1.0, 0.0).is_err());
    /// ```
    pub fn new(min: f64, max: f64) -> Result<Self, BoundsError> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(BoundsError::InvalidBounds { min, max });
        }

        Ok(Self { min, max })
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn min_only(min: f64) -> Self {
        Self { min, max: INFINITY }
    }

    pub fn max_only(max: f64) -> Self {
        Self {
            min: NEG_INFINITY,
            max,
        }
    }

    /// Check if a value is within the interval
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Check a value against a set of intervals
///
/// An empty set accepts everything.
pub fn check(intervals: &[Bounds], value: f64) -> Result<(), BoundsError> {
    if intervals.is_empty() || intervals.iter().any(|bounds| bounds.contains(value)) {
        return Ok(());
    }
    Err(BoundsError::ValueOutsideBounds {
        value,
        intervals: intervals
            .iter()
            .map(Bounds::to_string)
            .collect::<Vec<_>>()
            .join(" or "),
    })
}
