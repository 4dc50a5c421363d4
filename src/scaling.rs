//! Dimensional scaling
//!
//! The [`ScalingEngine`] relates any unit to the internal dimensionless basis.
//! Each dimension has a reference quantity (its basis scaling); the factor of
//! a compound unit is the product of those references raised to the unit's
//! exponents, converted into the unit itself and divided by any override
//! registered for the unit's exact dimension vector:
//!
//! ```text
//! unit_scaling(u) = basis_scale(u).value * basis_scale(u).units.scale(u) / override(u.dimensions)
//! scaled value    = magnitude in u / unit_scaling(u)
//! ```
//!
//! Factors are memoized per unit. Any change to the basis scalings or the
//! override table drops the whole cache.

use crate::units::{Dimensions, Quantity, UnitDispenser, UnitError, Units};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Errors that can occur when changing or applying scalings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScalingError {
    #[error("Invalid scaling dimension: '{dimension}'")]
    UnknownDimension { dimension: String },

    #[error("Dimension of scaling is wrong for '{dimension}': '{units}' is not a pure {dimension} unit")]
    InvalidBasis { dimension: String, units: String },

    #[error("Invalid scaling factor {factor} for {dimensions}")]
    InvalidFactor { dimensions: Dimensions, factor: f64 },

    #[error(transparent)]
    Unit(#[from] UnitError),
}

/// A multiplicative factor applied to one exact dimension combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitScaling {
    pub dimensions: Dimensions,
    pub factor: f64,
}

/// Basis scalings, dimension-combination overrides and the factor cache
#[derive(Debug, Clone, Default)]
pub struct ScalingEngine {
    scalings: BTreeMap<String, Quantity>,
    unit_scalings: Vec<UnitScaling>,
    cache: RefCell<HashMap<String, f64>>,
}

impl ScalingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reference quantity for one dimension
    ///
    /// # Arguments
    ///
    /// * `dimension` - A dimension known to `dispenser`
    /// * `scale` - Quantity whose dimension vector is exactly `{dimension: 1}`
    /// * `dispenser` - Registry the dimension is checked against
    ///
    /// # Returns
    ///
    /// `Ok(())` if the scaling was stored. On error the engine is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use scaled_params::scaling::ScalingEngine;
    /// use scaled_params::units::UnitDispenser;
    ///
    /// let si = UnitDispenser::si();
    /// let mut engine = ScalingEngine::new();
    /// engine.set_basis("length", si.quantity(2.0, "m").unwrap(), &si).unwrap();
    ///
    /// let factor = engine.unit_scaling(&si.get("m").unwrap(), &si).unwrap();
    /// assert!((factor - 2.0).abs() < 1e-12);
    /// ```
    pub fn set_basis(
        &mut self,
        dimension: &str,
        scale: Quantity,
        dispenser: &UnitDispenser,
    ) -> Result<(), ScalingError> {
        if !dispenser.has_dimension(dimension) {
            return Err(ScalingError::UnknownDimension {
                dimension: dimension.to_string(),
            });
        }
        if !scale.dimensions().is_single(dimension) {
            return Err(ScalingError::InvalidBasis {
                dimension: dimension.to_string(),
                units: scale.units().to_string(),
            });
        }
        self.scalings.insert(dimension.to_string(), scale);
        self.clear_cache();
        Ok(())
    }

    /// The explicitly configured reference quantity for a dimension
    pub fn basis(&self, dimension: &str) -> Option<&Quantity> {
        self.scalings.get(dimension)
    }

    pub fn scalings(&self) -> &BTreeMap<String, Quantity> {
        &self.scalings
    }

    /// Reference quantity for a dimension, defaulting to one basis unit
    pub fn scaling(
        &self,
        dimension: &str,
        dispenser: &UnitDispenser,
    ) -> Result<Quantity, ScalingError> {
        if let Some(scale) = self.scalings.get(dimension) {
            return Ok(scale.clone());
        }
        let unit = dispenser.basis_unit(dimension)?;
        Ok(Quantity::new(1.0, Units::from(unit.clone())))
    }

    /// Register a factor for an exact dimension combination
    ///
    /// An existing entry for the same combination is replaced in place, so the
    /// table holds at most one factor per combination.
    pub fn add_unit_scaling(
        &mut self,
        dimensions: Dimensions,
        factor: f64,
    ) -> Result<(), ScalingError> {
        if !factor.is_finite() || factor == 0.0 {
            return Err(ScalingError::InvalidFactor { dimensions, factor });
        }
        match self
            .unit_scalings
            .iter_mut()
            .find(|scaling| scaling.dimensions == dimensions)
        {
            Some(existing) => existing.factor = factor,
            None => self.unit_scalings.push(UnitScaling { dimensions, factor }),
        }
        self.clear_cache();
        Ok(())
    }

    pub fn unit_scalings(&self) -> &[UnitScaling] {
        &self.unit_scalings
    }

    /// Override factor for a dimension vector (first match, default 1)
    pub fn unit_scale(&self, dimensions: &Dimensions) -> f64 {
        self.unit_scalings
            .iter()
            .find(|scaling| &scaling.dimensions == dimensions)
            .map(|scaling| scaling.factor)
            .unwrap_or(1.0)
    }

    /// Product of the basis scalings raised to the exponents of `units`
    pub fn basis_scale(
        &self,
        units: &Units,
        dispenser: &UnitDispenser,
    ) -> Result<Quantity, ScalingError> {
        let mut scale = Quantity::dimensionless(1.0);
        for (dimension, power) in units.dimensions().iter() {
            scale = &scale * &self.scaling(dimension, dispenser)?.pow(power)?;
        }
        Ok(scale)
    }

    /// Factor relating a magnitude in `units` to its scaled value
    pub fn unit_scaling(
        &self,
        units: &Units,
        dispenser: &UnitDispenser,
    ) -> Result<f64, ScalingError> {
        let key = units.key();
        if let Some(factor) = self.cache.borrow().get(&key) {
            return Ok(*factor);
        }

        let scale = self.basis_scale(units, dispenser)?;
        let factor =
            scale.value() * scale.units().scale(units)? / self.unit_scale(&units.dimensions());

        log::trace!("caching scaling factor {} for '{}'", factor, units);
        self.cache.borrow_mut().insert(key, factor);
        Ok(factor)
    }

    /// Scaled value of a quantity
    pub fn to_scaled(
        &self,
        quantity: &Quantity,
        dispenser: &UnitDispenser,
    ) -> Result<f64, ScalingError> {
        Ok(quantity.value() / self.unit_scaling(quantity.units(), dispenser)?)
    }

    /// Quantity in `units` corresponding to a scaled value
    pub fn from_scaled(
        &self,
        value: f64,
        units: &Units,
        dispenser: &UnitDispenser,
    ) -> Result<Quantity, ScalingError> {
        Ok(Quantity::new(
            value * self.unit_scaling(units, dispenser)?,
            units.clone(),
        ))
    }

    /// Drop every cached factor
    pub fn clear_cache(&self) {
        let mut cache = self.cache.borrow_mut();
        if !cache.is_empty() {
            log::debug!("invalidating {} cached scaling factors", cache.len());
        }
        cache.clear();
    }

    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}
