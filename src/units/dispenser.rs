//! Unit registry
//!
//! The [`UnitDispenser`] owns every registered unit, hands out [`Units`] parsed
//! from text, and keeps the basis unit for each known dimension.

use super::compound::Units;
use super::dimensions::{ratio_from_f64, Dimensions};
use super::quantity::Quantity;
use super::unit::{Unit, UnitError, UnitSpec};
use num_rational::Rational64;
use num_traits::CheckedMul;
use std::collections::{BTreeMap, HashMap};

/// A decimal prefix applied to prefixable units
#[derive(Debug, Clone, PartialEq)]
pub struct Prefix {
    pub name: String,
    pub abbr: String,
    pub factor: f64,
}

impl Prefix {
    pub fn new(name: &str, abbr: &str, factor: f64) -> Self {
        Self {
            name: name.to_string(),
            abbr: abbr.to_string(),
            factor,
        }
    }
}

/// Registry of units keyed by name, abbreviation and plural
#[derive(Debug, Clone, Default)]
pub struct UnitDispenser {
    units: HashMap<String, Unit>,
    basis: BTreeMap<String, Unit>,
    prefixes: Vec<Prefix>,
    si: bool,
}

impl UnitDispenser {
    /// Create an empty dispenser without prefixes
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty dispenser that generates prefixed variants
    pub fn with_prefixes(prefixes: Vec<Prefix>) -> Self {
        Self {
            prefixes,
            ..Self::default()
        }
    }

    pub(crate) fn mark_si(&mut self) {
        self.si = true;
    }

    /// Whether this dispenser carries the standard SI catalogue
    pub fn is_si(&self) -> bool {
        self.si
    }

    /// Register a unit and, when prefixable, its prefixed variants
    ///
    /// The first unit registered for a dimension becomes that dimension's
    /// basis unit. Later registrations under an existing name replace it.
    ///
    /// # Examples
    ///
    /// ```
    /// use scaled_params::units::{UnitDispenser, UnitSpec};
    ///
    /// let mut dispenser = UnitDispenser::si();
    /// dispenser
    ///     .add(UnitSpec::new("furlong", "fur", 201.168).dimension("length", 1).not_prefixable())
    ///     .unwrap();
    /// let furlong = dispenser.get("fur").unwrap();
    /// let metre = dispenser.get("m").unwrap();
    /// assert!((furlong.scale(&metre).unwrap() - 201.168).abs() < 1e-9);
    /// ```
    pub fn add(&mut self, spec: UnitSpec) -> Result<(), UnitError> {
        if spec.name().is_empty() {
            return Err(UnitError::InvalidDefinition {
                message: "a unit needs at least one name".to_string(),
            });
        }
        if !(spec.rel.is_finite() && spec.rel > 0.0) {
            return Err(UnitError::InvalidDefinition {
                message: format!("relative scale of '{}' must be positive", spec.name()),
            });
        }

        let prefixed: Vec<UnitSpec> = if spec.prefixable {
            self.prefixes
                .iter()
                .map(|prefix| UnitSpec {
                    names: vec![format!("{}{}", prefix.name, spec.name())],
                    abbr: spec
                        .abbr
                        .as_ref()
                        .map(|abbr| format!("{}{}", prefix.abbr, abbr)),
                    rel: spec.rel * prefix.factor,
                    dimensions: spec.dimensions.clone(),
                    prefixable: false,
                    plural: spec
                        .plural
                        .as_ref()
                        .map(|plural| format!("{}{}", prefix.name, plural)),
                })
                .collect()
        } else {
            Vec::new()
        };

        let unit = Unit::new(spec);
        self.register(unit);

        for spec in prefixed {
            self.register(Unit::new(spec));
        }
        Ok(())
    }

    fn register(&mut self, unit: Unit) {
        let spec = unit.spec();
        let keys = spec
            .names
            .iter()
            .chain(spec.abbr.iter())
            .chain(spec.plural.iter())
            .filter(|key| !key.is_empty())
            .cloned()
            .collect::<Vec<_>>();
        for key in keys {
            self.units.insert(key, unit.clone());
        }
        for (dimension, _) in unit.dimensions().iter() {
            self.basis
                .entry(dimension.to_string())
                .or_insert_with(|| unit.clone());
        }
    }

    pub fn has(&self, identifier: &str) -> bool {
        self.units.contains_key(identifier)
    }

    /// Look up a single registered unit by name, abbreviation or plural
    pub fn unit(&self, identifier: &str) -> Result<Unit, UnitError> {
        self.units
            .get(identifier)
            .cloned()
            .ok_or_else(|| UnitError::UnknownUnit {
                name: identifier.to_string(),
            })
    }

    /// Parse a unit expression such as `kg*m/s^2`, `1/s` or `m^0.5`
    ///
    /// `""` and `"1"` denote the dimensionless product.
    pub fn get(&self, text: &str) -> Result<Units, UnitError> {
        let text = text.trim();
        let mut units = Units::dimensionless();
        if text.is_empty() {
            return Ok(units);
        }

        for (index, segment) in text.split('/').enumerate() {
            let sign = if index == 0 { 1 } else { -1 };
            for item in segment.split('*') {
                let item = item.trim();
                if item.is_empty() || item == "1" {
                    continue;
                }
                let (name, power) = match item.split_once('^') {
                    Some((name, exponent)) => (name.trim(), parse_exponent(exponent)?),
                    None => (item, Rational64::from_integer(1)),
                };
                let unit = self.unit(name)?;
                let power = power
                    .checked_mul(&Rational64::from_integer(sign))
                    .ok_or_else(|| UnitError::ExponentOverflow {
                        unit: name.to_string(),
                    })?;
                units.multiply_unit(unit, power)?;
            }
        }
        Ok(units)
    }

    /// Build a quantity from a magnitude and a unit expression
    pub fn quantity(&self, value: f64, text: &str) -> Result<Quantity, UnitError> {
        Ok(Quantity::new(value, self.get(text)?))
    }

    /// Basis unit for each known dimension
    pub fn basis(&self) -> &BTreeMap<String, Unit> {
        &self.basis
    }

    pub fn basis_unit(&self, dimension: &str) -> Result<&Unit, UnitError> {
        self.basis
            .get(dimension)
            .ok_or_else(|| UnitError::UnknownDimension {
                dimension: dimension.to_string(),
            })
    }

    /// Units made of the basis units matching a dimension vector
    pub fn basis_units(&self, dimensions: &Dimensions) -> Result<Units, UnitError> {
        let mut units = Units::dimensionless();
        for (dimension, power) in dimensions.iter() {
            units.multiply_unit(self.basis_unit(dimension)?.clone(), power)?;
        }
        Ok(units)
    }

    /// Replace the basis unit of a dimension
    ///
    /// The unit's dimension vector must be exactly `{dimension: 1}`.
    pub fn set_basis(&mut self, dimension: &str, identifier: &str) -> Result<(), UnitError> {
        let unit = self.unit(identifier)?;
        if !unit.dimensions().is_single(dimension) {
            return Err(UnitError::InvalidBasis {
                dimension: dimension.to_string(),
                unit: identifier.to_string(),
            });
        }
        self.basis.insert(dimension.to_string(), unit);
        Ok(())
    }

    pub fn has_dimension(&self, dimension: &str) -> bool {
        self.basis.contains_key(dimension)
    }

    pub fn dimensions(&self) -> impl Iterator<Item = &str> {
        self.basis.keys().map(String::as_str)
    }

    /// Every identifier the dispenser resolves, sorted
    pub fn identifiers(&self) -> Vec<&str> {
        let mut identifiers: Vec<&str> = self.units.keys().map(String::as_str).collect();
        identifiers.sort_unstable();
        identifiers
    }
}

fn parse_exponent(text: &str) -> Result<Rational64, UnitError> {
    let text = text.trim();
    let invalid = || UnitError::InvalidExponent {
        text: text.to_string(),
    };
    if let Some((numerator, denominator)) = text.split_once(':') {
        let numerator: i64 = numerator.trim().parse().map_err(|_| invalid())?;
        let denominator: i64 = denominator.trim().parse().map_err(|_| invalid())?;
        if denominator == 0 || numerator == i64::MIN || denominator == i64::MIN {
            return Err(invalid());
        }
        return Ok(Rational64::new(numerator, denominator));
    }
    let value: f64 = text.parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    ratio_from_f64(value).ok_or_else(invalid)
}
