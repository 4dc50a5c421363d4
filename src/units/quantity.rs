//! Dimensioned quantities

use super::compound::Units;
use super::dimensions::{ratio_to_f64, Dimensions};
use super::unit::UnitError;
use num_rational::Rational64;
use std::fmt;
use std::ops::{Div, Mul, Neg};

/// Relative tolerance used when comparing quantities
pub const QUANTITY_TOLERANCE: f64 = 1e-10;

/// A magnitude paired with units
#[derive(Debug, Clone)]
pub struct Quantity {
    value: f64,
    units: Units,
}

impl Quantity {
    pub fn new(value: f64, units: Units) -> Self {
        Self { value, units }
    }

    /// A bare number without units
    pub fn dimensionless(value: f64) -> Self {
        Self::new(value, Units::dimensionless())
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn units(&self) -> &Units {
        &self.units
    }

    pub fn dimensions(&self) -> Dimensions {
        self.units.dimensions()
    }

    /// Convert to other units of the same dimension
    ///
    /// # Examples
    ///
    /// ```
    /// use scaled_params::units::UnitDispenser;
    ///
    /// let si = UnitDispenser::si();
    /// let q = si.quantity(1.0, "km").unwrap();
    /// let m = q.to(&si.get("m").unwrap()).unwrap();
    /// assert!((m.value() - 1000.0).abs() < 1e-9);
    /// ```
    pub fn to(&self, units: &Units) -> Result<Quantity, UnitError> {
        Ok(Quantity::new(self.value_in(units)?, units.clone()))
    }

    /// Magnitude of this quantity expressed in `units`
    pub fn value_in(&self, units: &Units) -> Result<f64, UnitError> {
        Ok(self.value * self.units.scale(units)?)
    }

    /// Keep the magnitude, replace the units
    pub fn relabel(&self, units: Units) -> Quantity {
        Quantity::new(self.value, units)
    }

    /// Sum in the units of `self`
    pub fn checked_add(&self, other: &Quantity) -> Result<Quantity, UnitError> {
        Ok(Quantity::new(
            self.value + other.value_in(&self.units)?,
            self.units.clone(),
        ))
    }

    /// Difference in the units of `self`
    pub fn checked_sub(&self, other: &Quantity) -> Result<Quantity, UnitError> {
        Ok(Quantity::new(
            self.value - other.value_in(&self.units)?,
            self.units.clone(),
        ))
    }

    pub fn powi(&self, power: i32) -> Result<Quantity, UnitError> {
        Ok(Quantity::new(
            self.value.powi(power),
            self.units.powi(i64::from(power))?,
        ))
    }

    pub fn pow(&self, power: Rational64) -> Result<Quantity, UnitError> {
        Ok(Quantity::new(
            self.value.powf(ratio_to_f64(power)),
            self.units.pow(power)?,
        ))
    }

    /// Equality after conversion, within [`QUANTITY_TOLERANCE`]
    ///
    /// Quantities of different dimensions are never equal.
    pub fn approx_eq(&self, other: &Quantity) -> bool {
        match other.value_in(&self.units) {
            Ok(converted) => relative_eq(self.value, converted, QUANTITY_TOLERANCE),
            Err(_) => false,
        }
    }
}

pub(crate) fn relative_eq(a: f64, b: f64, tolerance: f64) -> bool {
    if a == b {
        return true;
    }
    let scale = a.abs().max(b.abs());
    (a - b).abs() <= tolerance * scale
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.units.is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.units)
        }
    }
}

impl Mul for &Quantity {
    type Output = Quantity;

    fn mul(self, rhs: &Quantity) -> Quantity {
        Quantity::new(self.value * rhs.value, &self.units * &rhs.units)
    }
}

impl Mul for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: Quantity) -> Quantity {
        &self * &rhs
    }
}

impl Div for &Quantity {
    type Output = Quantity;

    fn div(self, rhs: &Quantity) -> Quantity {
        Quantity::new(self.value / rhs.value, &self.units / &rhs.units)
    }
}

impl Div for Quantity {
    type Output = Quantity;

    fn div(self, rhs: Quantity) -> Quantity {
        &self / &rhs
    }
}

impl Mul<f64> for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        Quantity::new(self.value * rhs, self.units)
    }
}

impl Mul<f64> for &Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        Quantity::new(self.value * rhs, self.units.clone())
    }
}

impl Div<f64> for Quantity {
    type Output = Quantity;

    fn div(self, rhs: f64) -> Quantity {
        Quantity::new(self.value / rhs, self.units)
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        Quantity::new(-self.value, self.units)
    }
}
