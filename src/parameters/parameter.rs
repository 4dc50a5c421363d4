//! Parameter definitions and assignment values
//!
//! A stored parameter is either a concrete [`Quantity`] or a
//! [`ParamFunction`] computing it from other parameters. Values handed to the
//! engine for assignment or override are described by [`ParamValue`].

use super::bounds::BoundsError;
use super::expression::ExpressionError;
use super::function::{ParamFunction, Value, View};
use crate::scaling::ScalingError;
use crate::units::{Quantity, UnitError};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors raised while defining, propagating or querying parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Attempt to set invalid parameters: {}. Parameters must match ^[_A-Za-z][_A-Za-z0-9]*$", names.join(", "))]
    InvalidIdentifier { names: Vec<String> },

    #[error("There is no parameter, and no interpretation, of '{name}'")]
    NotFound { name: String },

    #[error("Configuration requires inverting the non-invertible map for '{name}'")]
    NotInvertible { name: String },

    #[error("Adding function for '{name}' would result in recursion through '{through}'")]
    RecursiveDefinition { name: String, through: String },

    #[error("Parameter '{name}' overspecified, with contradictory values {first} and {second}")]
    Overspecified {
        name: String,
        first: String,
        second: String,
    },

    #[error("Inverse function for '{name}' must return {expected} values, got {found}")]
    InverseArity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Function for '{name}' must return a single value, got {found}")]
    ForwardArity { name: String, found: usize },

    #[error("Argument '{name}' is not available as a {expected} value")]
    ArgumentView { name: String, expected: View },

    #[error("Function has no value for argument '{name}'")]
    MissingArgument { name: String },

    #[error("Malformed quantity for '{name}': {message}")]
    MalformedQuantity { name: String, message: String },

    #[error("Value of '{name}' is out of bounds: {source}")]
    OutsideBounds { name: String, source: BoundsError },

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Bounds(#[from] BoundsError),

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error(transparent)]
    Scaling(#[from] ScalingError),
}

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[_A-Za-z][_A-Za-z0-9]*$").expect("identifier pattern is valid")
});

/// Whether `name` is a legal parameter identifier
pub fn is_valid_name(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Parameter a name refers to, without its view prefix
pub(crate) fn base_name(name: &str) -> &str {
    name.strip_prefix('_').unwrap_or(name)
}

/// Reject every illegal name in one error
///
/// `_x` names a view of `x`, so a name must still be a plain identifier once
/// one `_` is stripped.
pub(crate) fn validate_names<'a, I>(names: I) -> Result<(), ParameterError>
where
    I: IntoIterator<Item = &'a str>,
{
    let invalid: Vec<String> = names
        .into_iter()
        .filter(|name| {
            let base = base_name(name);
            !is_valid_name(name) || !is_valid_name(base) || base.starts_with('_')
        })
        .map(str::to_string)
        .collect();
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(ParameterError::InvalidIdentifier { names: invalid })
    }
}

/// A stored parameter definition
#[derive(Debug, Clone)]
pub enum Parameter {
    Concrete(Quantity),
    Function(ParamFunction),
}

impl Parameter {
    pub fn is_function(&self) -> bool {
        matches!(self, Parameter::Function(_))
    }

    pub fn as_quantity(&self) -> Option<&Quantity> {
        match self {
            Parameter::Concrete(quantity) => Some(quantity),
            Parameter::Function(_) => None,
        }
    }

    pub fn as_function(&self) -> Option<&ParamFunction> {
        match self {
            Parameter::Concrete(_) => None,
            Parameter::Function(function) => Some(function),
        }
    }
}

/// A value supplied for assignment, override or conversion
///
/// Bare numbers are scaled values interpreted under the target parameter's
/// unit spec. Functions and expressions may carry the unit their result is
/// expressed in.
#[derive(Debug, Clone)]
pub enum ParamValue {
    Scaled(f64),
    Literal(f64, String),
    Quantity(Quantity),
    Function(ParamFunction, Option<String>),
    Expression(String, Option<String>),
}

impl ParamValue {
    pub fn is_function(&self) -> bool {
        matches!(self, ParamValue::Function(..) | ParamValue::Expression(..))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Scaled(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Scaled(f64::from(value))
    }
}

impl From<(f64, &str)> for ParamValue {
    fn from((value, units): (f64, &str)) -> Self {
        ParamValue::Literal(value, units.to_string())
    }
}

impl From<(i32, &str)> for ParamValue {
    fn from((value, units): (i32, &str)) -> Self {
        ParamValue::Literal(f64::from(value), units.to_string())
    }
}

impl From<(f64, String)> for ParamValue {
    fn from((value, units): (f64, String)) -> Self {
        ParamValue::Literal(value, units)
    }
}

impl From<Quantity> for ParamValue {
    fn from(quantity: Quantity) -> Self {
        ParamValue::Quantity(quantity)
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Scaled(value) => ParamValue::Scaled(value),
            Value::Quantity(quantity) => ParamValue::Quantity(quantity),
        }
    }
}

impl From<ParamFunction> for ParamValue {
    fn from(function: ParamFunction) -> Self {
        ParamValue::Function(function, None)
    }
}

impl From<(ParamFunction, &str)> for ParamValue {
    fn from((function, units): (ParamFunction, &str)) -> Self {
        ParamValue::Function(function, Some(units.to_string()))
    }
}

impl From<&str> for ParamValue {
    fn from(expression: &str) -> Self {
        ParamValue::Expression(expression.to_string(), None)
    }
}

impl From<String> for ParamValue {
    fn from(expression: String) -> Self {
        ParamValue::Expression(expression, None)
    }
}

impl From<(&str, &str)> for ParamValue {
    fn from((expression, units): (&str, &str)) -> Self {
        ParamValue::Expression(expression.to_string(), Some(units.to_string()))
    }
}
