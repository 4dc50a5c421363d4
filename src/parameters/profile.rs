//! JSON persistence
//!
//! A [`Profile`] captures everything needed to rebuild a [`Parameters`]
//! instance: custom units, dimension scalings, unit scalings, parameter
//! values, unit specs and bounds. Functions compiled from expressions are
//! saved as their source text; closures cannot be saved and are skipped.

use super::bounds::Bounds;
use super::config::ParametersConfig;
use super::parameter::{ParamValue, Parameter, ParameterError};
use super::parameters::Parameters;
use crate::scaling::UnitScaling;
use crate::units::UnitSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Error that can occur during serialization/deserialization
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

/// One saved parameter value
///
/// * a bare number is a scaled value
/// * `[magnitude, "unit"]` is a quantity
/// * `{"expression": ..., "unit": ...}` or a plain string is an expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueRecord {
    Scaled(f64),
    Quantity(Vec<serde_json::Value>),
    Expression {
        expression: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
    Text(String),
}

impl ValueRecord {
    pub fn quantity(value: f64, units: &str) -> Self {
        ValueRecord::Quantity(vec![value.into(), units.into()])
    }

    /// Interpret the record as an assignment for `name`
    pub fn into_value(self, name: &str) -> Result<ParamValue, ParameterError> {
        match self {
            ValueRecord::Scaled(value) => Ok(ParamValue::Scaled(value)),
            ValueRecord::Quantity(items) => match items.as_slice() {
                [serde_json::Value::Number(value), serde_json::Value::String(units)] => {
                    let value = value.as_f64().ok_or_else(|| ParameterError::MalformedQuantity {
                        name: name.to_string(),
                        message: format!("magnitude {} is not representable", value),
                    })?;
                    Ok(ParamValue::Literal(value, units.clone()))
                }
                _ => Err(ParameterError::MalformedQuantity {
                    name: name.to_string(),
                    message: format!(
                        "expected [magnitude, \"unit\"], got {}",
                        serde_json::Value::Array(items.clone())
                    ),
                }),
            },
            ValueRecord::Expression { expression, unit } => {
                Ok(ParamValue::Expression(expression, unit))
            }
            ValueRecord::Text(expression) => Ok(ParamValue::Expression(expression, None)),
        }
    }
}

/// Serializable snapshot of a parameter collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub config: ParametersConfig,
    pub units_custom: Vec<UnitSpec>,
    pub dimension_scalings: BTreeMap<String, (f64, String)>,
    pub unit_scalings: Vec<UnitScaling>,
    pub parameters: BTreeMap<String, ValueRecord>,
    pub units: BTreeMap<String, String>,
    pub bounds: BTreeMap<String, Vec<Bounds>>,
}

impl Parameters {
    /// Snapshot the collection
    pub fn to_profile(&self) -> Profile {
        let mut parameters = BTreeMap::new();
        for (name, parameter) in self.iter() {
            let record = match parameter {
                Parameter::Concrete(quantity) => {
                    ValueRecord::quantity(quantity.value(), &quantity.units().to_string())
                }
                Parameter::Function(function) => match function.source() {
                    Some(source) => ValueRecord::Expression {
                        expression: source.to_string(),
                        unit: self
                            .unit_spec(name)
                            .filter(|units| !units.is_empty())
                            .map(|units| units.to_string()),
                    },
                    None => {
                        log::warn!("'{}' is defined by a closure and cannot be saved", name);
                        continue;
                    }
                },
            };
            parameters.insert(name.to_string(), record);
        }

        Profile {
            config: *self.config(),
            units_custom: self.custom_units().to_vec(),
            dimension_scalings: self
                .scalings()
                .iter()
                .map(|(dimension, scale)| {
                    (dimension.clone(), (scale.value(), scale.units().to_string()))
                })
                .collect(),
            unit_scalings: self.unit_scalings().to_vec(),
            parameters,
            units: self
                .declared_units()
                .map(|(name, units)| (name.to_string(), units.to_string()))
                .collect(),
            bounds: self
                .names()
                .into_iter()
                .chain(self.declared_units().map(|(name, _)| name))
                .filter(|name| !self.bounds(name).is_empty())
                .map(|name| (name.to_string(), self.bounds(name).to_vec()))
                .collect(),
        }
    }

    /// Rebuild a collection from a snapshot
    ///
    /// Units are registered first, then scalings, unit specs, values and
    /// bounds. Dimension scalings the engine rejects are skipped with a
    /// warning.
    pub fn from_profile(profile: Profile) -> Result<Self, ParameterError> {
        let mut params = Parameters::with_config(profile.config)?;

        for spec in profile.units_custom {
            params.unit_add(spec)?;
        }

        params.scale_dimensions(
            profile
                .dimension_scalings
                .into_iter()
                .map(|(dimension, (value, units))| (dimension, ParamValue::Literal(value, units))),
        )?;

        for scaling in profile.unit_scalings {
            params.add_unit_scaling(scaling.dimensions, scaling.factor)?;
        }

        for (name, units) in &profile.units {
            params.bind_unit(name, units)?;
        }

        let values = profile
            .parameters
            .into_iter()
            .map(|(name, record)| {
                let value = record.into_value(&name)?;
                Ok((name, value))
            })
            .collect::<Result<Vec<_>, ParameterError>>()?;
        params.define(values)?;

        for (name, intervals) in profile.bounds {
            params.set_bounds(&name, intervals)?;
        }

        Ok(params)
    }

    /// Save parameters to a JSON file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file to save the parameters to
    ///
    /// # Returns
    ///
    /// `Ok(())` if the parameters were saved successfully, or an error if the save failed
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), SerializationError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, &self.to_profile())?;
        Ok(())
    }

    /// Save parameters to a JSON string
    ///
    /// # Examples
    ///
    /// ```
    /// use scaled_params::parameters::Parameters;
    ///
    /// let mut params = Parameters::new();
    /// params.define([("x", (2.0, "nm"))]).unwrap();
    ///
    /// let json = params.to_json().unwrap();
    /// let restored = Parameters::from_json(&json).unwrap();
    /// assert_eq!(restored.quantity("x").unwrap(), params.quantity("x").unwrap());
    /// ```
    pub fn to_json(&self) -> Result<String, SerializationError> {
        let json = serde_json::to_string_pretty(&self.to_profile())?;
        Ok(json)
    }

    /// Load parameters from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, SerializationError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_json(&contents)
    }

    /// Load parameters from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SerializationError> {
        let profile: Profile = serde_json::from_str(json)?;
        Ok(Self::from_profile(profile)?)
    }
}
