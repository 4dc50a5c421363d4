//! Forward and inverse evaluation of parameter functions
//!
//! Reads go through an override map first, then the stored definitions. A
//! function-valued parameter is computed on demand from its arguments, each
//! presented in the view its token selects.

use super::bounds;
use super::function::{Argument, Arguments, Evaluated, ParamFunction, Value, View};
use super::parameter::{ParamValue, Parameter, ParameterError};
use super::store::Store;
use crate::scaling::ScalingEngine;
use crate::units::{Quantity, UnitDispenser, Units};
use std::collections::BTreeMap;

/// Values pinned for the duration of one query or update
pub(crate) type Overrides = BTreeMap<String, Quantity>;

pub(crate) struct Evaluator<'a> {
    store: &'a Store,
    dispenser: &'a UnitDispenser,
    scaling: &'a ScalingEngine,
    default_scaled: bool,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        store: &'a Store,
        dispenser: &'a UnitDispenser,
        scaling: &'a ScalingEngine,
        default_scaled: bool,
    ) -> Self {
        Self {
            store,
            dispenser,
            scaling,
            default_scaled,
        }
    }

    pub fn store(&self) -> &Store {
        self.store
    }

    pub fn dispenser(&self) -> &UnitDispenser {
        self.dispenser
    }

    pub fn spec(&self, name: &str) -> Units {
        self.store.spec(name)
    }

    pub fn to_scaled(&self, quantity: &Quantity) -> Result<f64, ParameterError> {
        Ok(self.scaling.to_scaled(quantity, self.dispenser)?)
    }

    pub fn from_scaled(&self, value: f64, units: &Units) -> Result<Quantity, ParameterError> {
        Ok(self.scaling.from_scaled(value, units, self.dispenser)?)
    }

    /// Present a quantity in the requested view
    pub fn view(&self, quantity: Quantity, view: View) -> Result<Value, ParameterError> {
        match view {
            View::Scaled => Ok(Value::Scaled(self.to_scaled(&quantity)?)),
            View::Quantity => Ok(Value::Quantity(quantity)),
        }
    }

    /// Attach units to a function result destined for `name`
    pub fn tag(&self, name: &str, value: Value) -> Result<Quantity, ParameterError> {
        match value {
            Value::Scaled(value) => self.from_scaled(value, &self.spec(name)),
            Value::Quantity(quantity) => Ok(quantity),
        }
    }

    /// Quantity for a non-function assignment value, `None` for functions
    pub fn literal(&self, name: &str, value: &ParamValue) -> Result<Option<Quantity>, ParameterError> {
        match value {
            ParamValue::Scaled(value) => Ok(Some(self.from_scaled(*value, &self.spec(name))?)),
            ParamValue::Literal(value, units) => Ok(Some(self.dispenser.quantity(*value, units)?)),
            ParamValue::Quantity(quantity) => Ok(Some(quantity.clone())),
            ParamValue::Function(..) | ParamValue::Expression(..) => Ok(None),
        }
    }

    /// Reject a value whose scaled form lies outside the bounds of `name`
    pub fn check_bounds(&self, name: &str, quantity: &Quantity) -> Result<(), ParameterError> {
        let intervals = self.store.bounds(name);
        if intervals.is_empty() {
            return Ok(());
        }
        let scaled = self.to_scaled(quantity)?;
        bounds::check(intervals, scaled).map_err(|source| ParameterError::OutsideBounds {
            name: name.to_string(),
            source,
        })
    }

    /// Resolve `name` against overrides, then stored values and functions
    pub fn quantity(&self, name: &str, overrides: &Overrides) -> Result<Quantity, ParameterError> {
        let quantity = if let Some(pinned) = overrides.get(name) {
            pinned.clone()
        } else {
            match self.store.definitions.get(name) {
                Some(Parameter::Concrete(quantity)) => quantity.clone(),
                Some(Parameter::Function(function)) => self.evaluate(name, function, overrides)?,
                None => {
                    return Err(ParameterError::NotFound {
                        name: name.to_string(),
                    })
                }
            }
        };
        self.check_bounds(name, &quantity)?;
        Ok(quantity)
    }

    /// Resolve one argument in its view
    pub fn value(&self, argument: &Argument, overrides: &Overrides) -> Result<Value, ParameterError> {
        let quantity = self.quantity(argument.name(), overrides)?;
        self.view(quantity, argument.view(self.default_scaled))
    }

    fn bind(
        &self,
        function: &ParamFunction,
        target: Option<(&str, &Quantity)>,
        overrides: &Overrides,
    ) -> Result<Arguments, ParameterError> {
        let mut slots = Vec::with_capacity(function.arguments().len());
        let mut target_slot = None;
        for argument in function.arguments() {
            let value = match target {
                Some((name, pinned)) if argument.name() == name => {
                    if target_slot.is_none() {
                        target_slot = Some(slots.len());
                    }
                    Some(self.view(pinned.clone(), argument.view(self.default_scaled))?)
                }
                _ => Some(self.value(argument, overrides)?),
            };
            slots.push((argument.clone(), value));
        }
        Ok(Arguments::new(slots, target_slot))
    }

    /// Call a function with every argument resolved
    pub fn call(&self, function: &ParamFunction, overrides: &Overrides) -> Result<Evaluated, ParameterError> {
        let arguments = self.bind(function, None, overrides)?;
        function.call(&arguments)
    }

    /// Forward evaluation of the function stored under `name`
    ///
    /// Arguments naming `name` itself are left unbound.
    pub fn evaluate(
        &self,
        name: &str,
        function: &ParamFunction,
        overrides: &Overrides,
    ) -> Result<Quantity, ParameterError> {
        let mut slots = Vec::with_capacity(function.arguments().len());
        for argument in function.arguments() {
            let value = if argument.name() == name {
                None
            } else {
                Some(self.value(argument, overrides)?)
            };
            slots.push((argument.clone(), value));
        }

        let result = function.call(&Arguments::new(slots, None))?;
        let found = result.len();
        match result.into_single() {
            Some(value) => self.tag(name, value),
            None => Err(ParameterError::ForwardArity {
                name: name.to_string(),
                found,
            }),
        }
    }

    /// Inverse evaluation: values for the other arguments given `name`'s pinned value
    ///
    /// Results are tagged with each argument's unit spec and returned in
    /// declaration order.
    pub fn invert(
        &self,
        name: &str,
        function: &ParamFunction,
        overrides: &Overrides,
    ) -> Result<Vec<(String, Quantity)>, ParameterError> {
        if !function.declares(name) {
            return Err(ParameterError::NotInvertible {
                name: name.to_string(),
            });
        }
        let pinned = overrides.get(name).ok_or_else(|| ParameterError::NotFound {
            name: name.to_string(),
        })?;

        let expected: Vec<&Argument> = function
            .arguments()
            .iter()
            .filter(|argument| argument.name() != name)
            .collect();

        let arguments = self.bind(function, Some((name, pinned)), overrides)?;
        let values = match function.call(&arguments)? {
            Evaluated::Single(value) if expected.len() == 1 => vec![value],
            Evaluated::Multiple(values) if values.len() == expected.len() => values,
            other => {
                return Err(ParameterError::InverseArity {
                    name: name.to_string(),
                    expected: expected.len(),
                    found: other.len(),
                })
            }
        };

        expected
            .into_iter()
            .zip(values)
            .map(|(argument, value)| {
                let quantity = self.tag(argument.name(), value)?;
                Ok((argument.name().to_string(), quantity))
            })
            .collect()
    }
}
