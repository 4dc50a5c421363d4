//! Registered unit atoms
//!
//! A [`UnitSpec`] is the registration record handed to a
//! [`UnitDispenser`](super::UnitDispenser); once registered it is shared as a
//! cheap, reference-counted [`Unit`].

use super::dimensions::Dimensions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when registering, parsing or converting units
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    #[error("Unknown unit: '{name}'")]
    UnknownUnit { name: String },

    #[error("Invalid conversion from '{from}' to '{to}': units do not match")]
    IncompatibleUnits { from: String, to: String },

    #[error("Invalid unit exponent '{text}'")]
    InvalidExponent { text: String },

    #[error("Unit '{unit}' is not a valid basis for dimension '{dimension}'")]
    InvalidBasis { dimension: String, unit: String },

    #[error("Unknown dimension: '{dimension}'")]
    UnknownDimension { dimension: String },

    #[error("Invalid unit definition: {message}")]
    InvalidDefinition { message: String },

    #[error("Exponent overflow in units of '{unit}'")]
    ExponentOverflow { unit: String },
}

/// Registration record for a unit
///
/// The field names follow the keys accepted by custom unit declarations in
/// parameter profiles, so a `UnitSpec` round-trips through JSON unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    /// Primary name followed by any aliases
    pub names: Vec<String>,

    /// Abbreviation used when printing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbr: Option<String>,

    /// Size of this unit relative to the dispenser's reference units
    #[serde(default = "default_rel")]
    pub rel: f64,

    /// Dimension vector of this unit
    #[serde(default)]
    pub dimensions: Dimensions,

    /// Whether prefixed variants (kilo-, milli-, ...) are generated
    #[serde(default = "default_prefixable")]
    pub prefixable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
}

fn default_rel() -> f64 {
    1.0
}

fn default_prefixable() -> bool {
    true
}

impl UnitSpec {
    /// Create a prefixable, dimensionless unit specification
    ///
    /// # Arguments
    ///
    /// * `name` - Primary name of the unit
    /// * `abbr` - Abbreviation used for lookup and printing
    /// * `rel` - Relative size of the unit
    ///
    /// # Examples
    ///
    /// ```
    /// use scaled_params::units::UnitSpec;
    ///
    /// let foot = UnitSpec::new("foot", "ft", 0.3048)
    ///     .dimension("length", 1)
    ///     .plural("feet");
    /// assert_eq!(foot.names, vec!["foot".to_string()]);
    /// assert!(foot.prefixable);
    /// ```
    pub fn new(name: &str, abbr: &str, rel: f64) -> Self {
        Self {
            names: vec![name.to_string()],
            abbr: if abbr.is_empty() && !name.is_empty() {
                None
            } else {
                Some(abbr.to_string())
            },
            rel,
            dimensions: Dimensions::new(),
            prefixable: true,
            plural: None,
        }
    }

    pub fn alias(mut self, name: &str) -> Self {
        self.names.push(name.to_string());
        self
    }

    pub fn dimension(mut self, dimension: &str, exponent: i64) -> Self {
        self.dimensions = self.dimensions.with(dimension, exponent);
        self
    }

    pub fn plural(mut self, plural: &str) -> Self {
        self.plural = Some(plural.to_string());
        self
    }

    pub fn not_prefixable(mut self) -> Self {
        self.prefixable = false;
        self
    }

    /// Primary name, or an empty string for a malformed spec
    pub fn name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or("")
    }
}

/// A registered unit
///
/// Units are compared and hashed by primary name; two registrations with the
/// same primary name are the same unit as far as compound units are concerned.
#[derive(Debug, Clone)]
pub struct Unit(Arc<UnitSpec>);

impl Unit {
    pub(crate) fn new(spec: UnitSpec) -> Self {
        Self(Arc::new(spec))
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// Abbreviation if one is registered, otherwise the primary name
    pub fn symbol(&self) -> &str {
        self.0.abbr.as_deref().unwrap_or_else(|| self.0.name())
    }

    pub fn rel(&self) -> f64 {
        self.0.rel
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.0.dimensions
    }

    pub fn spec(&self) -> &UnitSpec {
        &self.0
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
