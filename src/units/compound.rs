//! Compound units
//!
//! [`Units`] is a product of registered [`Unit`]s raised to rational powers,
//! e.g. `kg*m/s^2`. It reports its aggregate dimension vector and relative
//! size, and converts between arrangements sharing a dimension vector.

use super::dimensions::{ratio_to_f64, Dimensions};
use super::unit::{Unit, UnitError};
use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedMul, One, Signed, Zero};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Div, Mul};

/// A product of units raised to rational powers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Units {
    /// Keyed by the unit's primary name so iteration order is stable
    atoms: BTreeMap<String, (Unit, Rational64)>,
}

impl Units {
    /// The empty product
    pub fn dimensionless() -> Self {
        Self::default()
    }

    pub fn from_unit(unit: Unit) -> Self {
        let mut units = Self::dimensionless();
        units.set_atom(unit, Rational64::one());
        units
    }

    fn set_atom(&mut self, unit: Unit, power: Rational64) {
        let key = unit.name().to_string();
        if power.is_zero() {
            self.atoms.remove(&key);
        } else {
            self.atoms.insert(key, (unit, power));
        }
    }

    fn power_of(&self, unit: &Unit) -> Rational64 {
        self.atoms
            .get(unit.name())
            .map(|(_, power)| *power)
            .unwrap_or_else(Rational64::zero)
    }

    /// Multiply in `unit^power`, dropping atoms whose power cancels to zero
    ///
    /// Fails without changing `self` when an atom or dimension exponent
    /// would overflow.
    pub fn multiply_unit(&mut self, unit: Unit, power: Rational64) -> Result<(), UnitError> {
        let overflow = UnitError::ExponentOverflow {
            unit: unit.name().to_string(),
        };
        let combined = match self.power_of(&unit).checked_add(&power) {
            Some(combined) => combined,
            None => return Err(overflow),
        };

        let mut next = self.clone();
        next.set_atom(unit, combined);
        if next.checked_dimensions().is_none() {
            return Err(overflow);
        }
        *self = next;
        Ok(())
    }

    fn checked_dimensions(&self) -> Option<Dimensions> {
        let mut dimensions = Dimensions::new();
        for (unit, power) in self.atoms.values() {
            dimensions.checked_accumulate(unit.dimensions(), *power)?;
        }
        Some(dimensions)
    }

    /// Aggregate dimension vector
    ///
    /// # Examples
    ///
    /// ```
    /// use scaled_params::units::{Dimensions, UnitDispenser};
    ///
    /// let si = UnitDispenser::si();
    /// let newton = si.get("kg*m/s^2").unwrap();
    /// let expected = Dimensions::new().with("mass", 1).with("length", 1).with("time", -2);
    /// assert_eq!(newton.dimensions(), expected);
    /// ```
    pub fn dimensions(&self) -> Dimensions {
        let mut dimensions = Dimensions::new();
        for (unit, power) in self.atoms.values() {
            dimensions.accumulate(unit.dimensions(), *power);
        }
        dimensions
    }

    /// Relative size of this arrangement
    pub fn rel(&self) -> f64 {
        self.atoms
            .values()
            .map(|(unit, power)| unit.rel().powf(ratio_to_f64(*power)))
            .product()
    }

    /// Factor converting a magnitude in `self` to a magnitude in `other`
    ///
    /// # Returns
    ///
    /// `self.rel() / other.rel()`, or [`UnitError::IncompatibleUnits`] when the
    /// dimension vectors differ
    pub fn scale(&self, other: &Units) -> Result<f64, UnitError> {
        if self.dimensions() != other.dimensions() {
            return Err(UnitError::IncompatibleUnits {
                from: self.to_string(),
                to: other.to_string(),
            });
        }
        Ok(self.rel() / other.rel())
    }

    /// Raise every atom to `power`
    pub fn pow(&self, power: Rational64) -> Result<Units, UnitError> {
        let mut result = Units::dimensionless();
        for (unit, existing) in self.atoms.values() {
            let raised = existing
                .checked_mul(&power)
                .ok_or_else(|| UnitError::ExponentOverflow {
                    unit: unit.name().to_string(),
                })?;
            result.multiply_unit(unit.clone(), raised)?;
        }
        Ok(result)
    }

    pub fn powi(&self, power: i64) -> Result<Units, UnitError> {
        self.pow(Rational64::from_integer(power))
    }

    /// True when there are no atoms at all
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimensions().is_dimensionless()
    }

    /// Identity key used for caching, built from primary names
    pub fn key(&self) -> String {
        self.atoms
            .iter()
            .map(|(name, (_, power))| format!("{}^{}", name, power))
            .collect::<Vec<_>>()
            .join("*")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Unit, Rational64)> {
        self.atoms.values().map(|(unit, power)| (unit, *power))
    }
}

fn format_power(power: Rational64) -> String {
    if power.is_integer() {
        power.to_integer().to_string()
    } else {
        ratio_to_f64(power).to_string()
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numerator: Vec<String> = self
            .atoms
            .values()
            .filter(|(_, power)| power.is_positive())
            .map(|(unit, power)| {
                if power.is_one() {
                    unit.symbol().to_string()
                } else {
                    format!("{}^{}", unit.symbol(), format_power(*power))
                }
            })
            .collect();
        let denominator: Vec<String> = self
            .atoms
            .values()
            .filter(|(_, power)| power.is_negative())
            .map(|(unit, power)| {
                let power = power.abs();
                if power.is_one() {
                    format!("/{}", unit.symbol())
                } else {
                    format!("/{}^{}", unit.symbol(), format_power(power))
                }
            })
            .collect();

        if numerator.is_empty() && !denominator.is_empty() {
            write!(f, "1")?;
        }
        write!(f, "{}{}", numerator.join("*"), denominator.concat())
    }
}

/// Panics on exponent overflow, like integer multiplication
impl Mul for &Units {
    type Output = Units;

    fn mul(self, rhs: &Units) -> Units {
        let mut result = self.clone();
        for (unit, power) in rhs.atoms.values() {
            let combined = result.power_of(unit) + *power;
            result.set_atom(unit.clone(), combined);
        }
        result
    }
}

/// Panics on exponent overflow, like integer division
impl Div for &Units {
    type Output = Units;

    fn div(self, rhs: &Units) -> Units {
        let mut result = self.clone();
        for (unit, power) in rhs.atoms.values() {
            let combined = result.power_of(unit) - *power;
            result.set_atom(unit.clone(), combined);
        }
        result
    }
}

impl From<Unit> for Units {
    fn from(unit: Unit) -> Self {
        Units::from_unit(unit)
    }
}
