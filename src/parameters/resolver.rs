//! Override propagation
//!
//! Turns a batch of requested assignments into a consistent set of concrete
//! overrides. Function-valued requests are evaluated first, in dependency
//! order. Every override that pins a function-valued parameter is then
//! inverted to derive its arguments, and derived values are inverted in turn
//! until nothing new appears. Two derivations of the same parameter must agree.

use super::evaluator::{Evaluator, Overrides};
use super::function::{ParamFunction, Value};
use super::parameter::{ParamValue, ParameterError};
use crate::units::quantity::{relative_eq, QUANTITY_TOLERANCE};
use crate::units::Quantity;
use std::borrow::Cow;
use std::collections::BTreeMap;

pub(crate) struct Resolver<'e, 'a> {
    evaluator: &'e Evaluator<'a>,
}

struct Pending<'v> {
    name: String,
    function: Cow<'v, ParamFunction>,
    units: Option<&'v str>,
}

impl<'e, 'a> Resolver<'e, 'a> {
    pub fn new(evaluator: &'e Evaluator<'a>) -> Self {
        Self { evaluator }
    }

    /// Resolve requested values into the full set of implied overrides
    pub fn propagate(&self, requested: &BTreeMap<String, ParamValue>) -> Result<Overrides, ParameterError> {
        let normalized = self.normalize(requested)?;
        self.expand(normalized)
    }

    /// Concrete quantities for every requested value
    fn normalize(&self, requested: &BTreeMap<String, ParamValue>) -> Result<Overrides, ParameterError> {
        let mut resolved = Overrides::new();
        let mut pending = Vec::new();

        for (name, value) in requested {
            match value {
                ParamValue::Function(function, units) => pending.push(Pending {
                    name: name.clone(),
                    function: Cow::Borrowed(function),
                    units: units.as_deref(),
                }),
                ParamValue::Expression(source, units) => pending.push(Pending {
                    name: name.clone(),
                    function: Cow::Owned(ParamFunction::from_expression(source)?),
                    units: units.as_deref(),
                }),
                literal => {
                    if let Some(quantity) = self.evaluator.literal(name, literal)? {
                        resolved.insert(name.clone(), quantity);
                    }
                }
            }
        }

        // A function override reading another function override waits for it
        while !pending.is_empty() {
            let waiting_on: Vec<String> = pending.iter().map(|entry| entry.name.clone()).collect();
            let before = pending.len();
            let mut blocked = Vec::new();

            for entry in pending {
                let dependency = entry
                    .function
                    .dependencies(&entry.name)
                    .into_iter()
                    .find(|dependency| waiting_on.contains(dependency));
                if let Some(dependency) = dependency {
                    blocked.push((entry, dependency));
                    continue;
                }

                let value = self.evaluator.call(&entry.function, &resolved)?;
                let found = value.len();
                let value = value.into_single().ok_or_else(|| ParameterError::ForwardArity {
                    name: entry.name.clone(),
                    found,
                })?;
                let quantity = self.concretize(&entry.name, value, entry.units)?;
                resolved.insert(entry.name, quantity);
            }

            if blocked.len() == before {
                let (entry, dependency) = blocked.swap_remove(0);
                return Err(ParameterError::RecursiveDefinition {
                    name: entry.name,
                    through: dependency,
                });
            }
            pending = blocked.into_iter().map(|(entry, _)| entry).collect();
        }

        Ok(resolved)
    }

    /// Give a function-override result its units
    fn concretize(&self, name: &str, value: Value, units: Option<&str>) -> Result<Quantity, ParameterError> {
        let units = units
            .map(|text| self.evaluator.dispenser().get(text))
            .transpose()?;
        match (value, units) {
            (Value::Scaled(value), Some(units)) => self.evaluator.from_scaled(value, &units),
            (Value::Scaled(value), None) => self.evaluator.from_scaled(value, &self.evaluator.spec(name)),
            (Value::Quantity(quantity), Some(units)) => Ok(quantity.to(&units)?),
            (Value::Quantity(quantity), None) => Ok(quantity),
        }
    }

    /// Invert pinned functions until no new parameters are derived
    fn expand(&self, mut resolved: Overrides) -> Result<Overrides, ParameterError> {
        let mut frontier: Vec<String> = resolved.keys().cloned().collect();
        let mut pass = 0;

        while !frontier.is_empty() {
            pass += 1;
            log::trace!("propagation pass {} over {:?}", pass, frontier);

            let mut derived = Overrides::new();
            for name in &frontier {
                let Some(function) = self.evaluator.store().function(name) else {
                    continue;
                };
                for (key, quantity) in self.evaluator.invert(name, function, &resolved)? {
                    let existing = resolved.get(&key).or_else(|| derived.get(&key)).cloned();
                    match existing {
                        Some(existing) => self.agree(&key, &existing, &quantity)?,
                        None => {
                            derived.insert(key, quantity);
                        }
                    }
                }
            }

            frontier = derived.keys().cloned().collect();
            resolved.extend(derived);
        }

        Ok(resolved)
    }

    /// Two values for one parameter must match in scaled magnitude
    fn agree(&self, name: &str, first: &Quantity, second: &Quantity) -> Result<(), ParameterError> {
        let consistent = first.dimensions() == second.dimensions()
            && relative_eq(
                self.evaluator.to_scaled(first)?,
                self.evaluator.to_scaled(second)?,
                QUANTITY_TOLERANCE,
            );
        if consistent {
            Ok(())
        } else {
            Err(ParameterError::Overspecified {
                name: name.to_string(),
                first: first.to_string(),
                second: second.to_string(),
            })
        }
    }
}
