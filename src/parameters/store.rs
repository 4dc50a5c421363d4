//! Parameter storage
//!
//! Three maps keyed by parameter name: definitions, unit specs and bounds.
//! A name may have a unit spec without a definition.

use super::bounds::Bounds;
use super::function::ParamFunction;
use super::parameter::Parameter;
use crate::units::{Quantity, Units};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub(crate) struct Store {
    pub definitions: BTreeMap<String, Parameter>,
    pub specs: BTreeMap<String, Units>,
    pub bounds: BTreeMap<String, Vec<Bounds>>,
}

impl Store {
    /// Unit spec of `name`, dimensionless when none was recorded
    pub fn spec(&self, name: &str) -> Units {
        self.specs.get(name).cloned().unwrap_or_default()
    }

    pub fn function(&self, name: &str) -> Option<&ParamFunction> {
        self.definitions.get(name).and_then(Parameter::as_function)
    }

    pub fn is_function(&self, name: &str) -> bool {
        self.function(name).is_some()
    }

    pub fn bounds(&self, name: &str) -> &[Bounds] {
        self.bounds.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Store a concrete value; its units become the spec
    pub fn set_concrete(&mut self, name: &str, quantity: Quantity) {
        self.specs.insert(name.to_string(), quantity.units().clone());
        self.definitions
            .insert(name.to_string(), Parameter::Concrete(quantity));
    }

    pub fn set_function(&mut self, name: &str, function: ParamFunction, spec: Units) {
        self.specs.insert(name.to_string(), spec);
        self.definitions
            .insert(name.to_string(), Parameter::Function(function));
    }

    /// Drop value, spec and bounds of `name`
    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        self.specs.remove(name);
        self.bounds.remove(name);
        self.definitions.remove(name)
    }
}
