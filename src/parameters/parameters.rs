//! Parameters collection
//!
//! [`Parameters`] owns the parameter store, the unit registry and the scaling
//! engine. Reads may carry overrides, which are propagated through invertible
//! functions before the query is answered and then discarded; updates
//! propagate the same way and commit the derived concrete values.

use super::bounds::{self, Bounds};
use super::config::ParametersConfig;
use super::constants::PHYSICAL_CONSTANTS;
use super::cycle::CycleGuard;
use super::evaluator::{Evaluator, Overrides};
use super::function::{Argument, Evaluated, ParamFunction, Value};
use super::parameter::{
    base_name, is_valid_name, validate_names, ParamValue, Parameter, ParameterError,
};
use super::resolver::Resolver;
use super::store::Store;
use crate::scaling::{ScalingEngine, ScalingError, UnitScaling};
use crate::units::{Dimensions, Quantity, UnitDispenser, UnitSpec, Units};
use std::collections::BTreeMap;

/// A collection of dimensioned parameters with dependency resolution
///
/// # Examples
///
/// ```
/// use scaled_params::parameters::{ParamFunction, Parameters};
///
/// let mut p = Parameters::new();
/// p.define([("x", (2.0, "m"))]).unwrap();
///
/// // y = x^2, or x = sqrt(y) when y is pinned
/// let square = ParamFunction::new(&["x", "y"], |args| {
///     Ok(match args.target() {
///         None => args.scaled("x")?.powi(2).into(),
///         Some(_) => args.scaled("y")?.sqrt().into(),
///     })
/// });
/// p.define([("y", (square, "m^2"))]).unwrap();
/// assert_eq!(p.scaled("y").unwrap(), 4.0);
///
/// p.set("y", 9.0).unwrap();
/// assert!((p.scaled("x").unwrap() - 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Parameters {
    store: Store,
    dispenser: UnitDispenser,
    scaling: ScalingEngine,
    units_custom: Vec<UnitSpec>,
    config: ParametersConfig,
}

impl Default for Parameters {
    fn default() -> Self {
        Self::new()
    }
}

impl Parameters {
    /// Create an empty collection over the SI registry with default options
    ///
    /// # Examples
    ///
    /// ```
    /// use scaled_params::parameters::Parameters;
    ///
    /// let params = Parameters::new();
    /// assert!(params.is_empty());
    /// assert!(params.config().default_scaled);
    /// ```
    pub fn new() -> Self {
        Self::build(UnitDispenser::si(), ParametersConfig::default())
    }

    /// Create a collection over the SI registry
    ///
    /// Loads [`PHYSICAL_CONSTANTS`] when `config.constants` is set.
    pub fn with_config(config: ParametersConfig) -> Result<Self, ParameterError> {
        Self::with_dispenser(UnitDispenser::si(), config)
    }

    /// Create a collection over a custom unit registry
    ///
    /// Constants are only loaded for SI registries.
    pub fn with_dispenser(
        dispenser: UnitDispenser,
        config: ParametersConfig,
    ) -> Result<Self, ParameterError> {
        let mut parameters = Self::build(dispenser, config);
        if config.constants {
            if parameters.dispenser.is_si() {
                parameters.define(PHYSICAL_CONSTANTS.iter().map(|(name, value, units)| {
                    (*name, ParamValue::Literal(*value, units.to_string()))
                }))?;
            } else {
                log::warn!("physical constants require the SI unit registry, none loaded");
            }
        }
        Ok(parameters)
    }

    fn build(dispenser: UnitDispenser, config: ParametersConfig) -> Self {
        Self {
            store: Store::default(),
            dispenser,
            scaling: ScalingEngine::new(),
            units_custom: Vec::new(),
            config,
        }
    }

    fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(
            &self.store,
            &self.dispenser,
            &self.scaling,
            self.config.default_scaled,
        )
    }

    /// Key assignments by parameter name
    ///
    /// `_x` assigns to `x`; values carry their own form, so the view prefix
    /// does not change how they are read. Naming one parameter twice in a
    /// batch is rejected.
    fn collect<I, K, V>(assignments: I) -> Result<BTreeMap<String, ParamValue>, ParameterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        let assignments: Vec<(String, ParamValue)> = assignments
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        let mut tokens: Vec<&str> = assignments.iter().map(|(token, _)| token.as_str()).collect();
        tokens.sort_unstable();
        validate_names(tokens)?;

        let mut requested: BTreeMap<String, (String, ParamValue)> = BTreeMap::new();
        for (token, value) in assignments {
            let name = base_name(&token).to_string();
            if let Some((first, _)) = requested.get(&name) {
                return Err(ParameterError::Overspecified {
                    first: first.clone(),
                    second: token,
                    name,
                });
            }
            requested.insert(name, (token, value));
        }
        Ok(requested
            .into_iter()
            .map(|(name, (_, value))| (name, value))
            .collect())
    }

    fn propagate<I, K, V>(&self, assignments: I) -> Result<Overrides, ParameterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        let requested = Self::collect(assignments)?;
        if requested.is_empty() {
            return Ok(Overrides::new());
        }
        let evaluator = self.evaluator();
        Resolver::new(&evaluator).propagate(&requested)
    }

    fn lookup(&self, query: &str, overrides: &Overrides) -> Result<Value, ParameterError> {
        let evaluator = self.evaluator();
        let query = query.trim();
        if is_valid_name(query) {
            return evaluator.value(&Argument::parse(query), overrides);
        }

        let function = ParamFunction::from_expression(query)?;
        let result = evaluator.call(&function, overrides)?;
        let found = result.len();
        result
            .into_single()
            .ok_or_else(|| ParameterError::ForwardArity {
                name: query.to_string(),
                found,
            })
    }

    /// Value of a parameter or symbolic expression
    ///
    /// A bare name yields the default view, `_name` the other one. Anything
    /// that is not an identifier is compiled as an expression over scaled
    /// values.
    ///
    /// # Examples
    ///
    /// ```
    /// use scaled_params::parameters::{Parameters, Value};
    ///
    /// let mut p = Parameters::new();
    /// p.define([("x", 1.0), ("y", 2.0)]).unwrap();
    /// assert_eq!(p.get("x^2 + y^2").unwrap(), Value::Scaled(5.0));
    /// assert!(p.get("_x").unwrap().as_quantity().is_some());
    /// ```
    pub fn get(&self, query: &str) -> Result<Value, ParameterError> {
        self.lookup(query, &Overrides::new())
    }

    /// Value of a query under temporary overrides
    ///
    /// Overrides are propagated exactly as an update would, but nothing is
    /// stored.
    pub fn get_with<I, K, V>(&self, query: &str, overrides: I) -> Result<Value, ParameterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        let overrides = self.propagate(overrides)?;
        self.lookup(query, &overrides)
    }

    /// Values of several queries sharing one set of overrides
    ///
    /// Identifier queries are keyed by the parameter name without its `_`
    /// prefix; expressions are keyed by their text.
    pub fn get_many<I, K, V>(
        &self,
        queries: &[&str],
        overrides: I,
    ) -> Result<BTreeMap<String, Value>, ParameterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        let overrides = self.propagate(overrides)?;
        queries
            .iter()
            .map(|query| {
                let key = if is_valid_name(query) {
                    Argument::parse(query).name().to_string()
                } else {
                    query.to_string()
                };
                Ok((key, self.lookup(query, &overrides)?))
            })
            .collect()
    }

    /// Scaled value of a parameter, whatever the default view
    pub fn scaled(&self, name: &str) -> Result<f64, ParameterError> {
        let evaluator = self.evaluator();
        let quantity = evaluator.quantity(Argument::parse(name).name(), &Overrides::new())?;
        evaluator.to_scaled(&quantity)
    }

    /// Unit-aware value of a parameter, whatever the default view
    pub fn quantity(&self, name: &str) -> Result<Quantity, ParameterError> {
        self.evaluator()
            .quantity(Argument::parse(name).name(), &Overrides::new())
    }

    /// Call an anonymous function against the current state
    pub fn evaluate<I, K, V>(
        &self,
        function: &ParamFunction,
        overrides: I,
    ) -> Result<Evaluated, ParameterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        let overrides = self.propagate(overrides)?;
        self.evaluator().call(function, &overrides)
    }

    /// Evaluate `query` once per value of `name`
    ///
    /// # Examples
    ///
    /// ```
    /// use scaled_params::parameters::{Parameters, Value};
    ///
    /// let mut p = Parameters::new();
    /// p.define([("x", 0.0)]).unwrap();
    /// let sweep = p.range("2 * x", "x", [1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(sweep, vec![Value::Scaled(2.0), Value::Scaled(4.0), Value::Scaled(6.0)]);
    /// ```
    pub fn range<I, V>(&self, query: &str, name: &str, values: I) -> Result<Vec<Value>, ParameterError>
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        values
            .into_iter()
            .map(|value| {
                let value: ParamValue = value.into();
                self.get_with(query, [(name, value)])
            })
            .collect()
    }

    /// Assign values, propagating through invertible functions
    ///
    /// Either every derived concrete value is stored or, on error, nothing is.
    /// Parameters defined by functions keep their functions.
    ///
    /// # Arguments
    ///
    /// * `assignments` - Pairs of parameter name and value
    ///
    /// # Returns
    ///
    /// `Ok(())` when the assignment is consistent and within bounds
    pub fn update<I, K, V>(&mut self, assignments: I) -> Result<(), ParameterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        let resolved = self.propagate(assignments)?;

        let evaluator = self.evaluator();
        let mut changes = Vec::with_capacity(resolved.len());
        for (name, quantity) in resolved {
            if self.store.is_function(&name) {
                continue;
            }
            evaluator.check_bounds(&name, &quantity)?;
            changes.push((name, quantity));
        }

        for (name, quantity) in changes {
            log::trace!("storing {} = {}", name, quantity);
            self.store.set_concrete(&name, quantity);
        }
        Ok(())
    }

    /// Assign a single value
    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) -> Result<(), ParameterError> {
        let value: ParamValue = value.into();
        self.update([(name, value)])
    }

    /// Install definitions without propagation
    ///
    /// Functions and expressions are stored as functions; everything else is
    /// stored as a concrete value. Function definitions are checked for
    /// recursion against the definitions staged so far. On error nothing is
    /// installed.
    pub fn define<I, K, V>(&mut self, definitions: I) -> Result<(), ParameterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        let requested = Self::collect(definitions)?;
        let mut staged = self.store.clone();

        for (name, value) in requested {
            match value {
                ParamValue::Function(function, units) => {
                    self.install(&mut staged, &name, function, units.as_deref())?
                }
                ParamValue::Expression(source, units) => {
                    let function = ParamFunction::from_expression(&source)?;
                    self.install(&mut staged, &name, function, units.as_deref())?
                }
                literal => {
                    let evaluator = Evaluator::new(
                        &staged,
                        &self.dispenser,
                        &self.scaling,
                        self.config.default_scaled,
                    );
                    if let Some(quantity) = evaluator.literal(&name, &literal)? {
                        evaluator.check_bounds(&name, &quantity)?;
                        staged.set_concrete(&name, quantity);
                    }
                }
            }
        }

        self.store = staged;
        Ok(())
    }

    fn install(
        &self,
        staged: &mut Store,
        name: &str,
        function: ParamFunction,
        units: Option<&str>,
    ) -> Result<(), ParameterError> {
        CycleGuard::new(&staged.definitions).check(name, &function)?;
        let spec = match units {
            Some(text) => self.dispenser.get(text)?,
            None => Units::dimensionless(),
        };
        log::debug!("defining {}{} in {}", name, function, spec);
        staged.set_function(name, function, spec);
        Ok(())
    }

    /// Set the unit spec of a parameter
    ///
    /// A stored concrete value is relabelled with the new units and keeps its
    /// magnitude. The name need not be defined yet.
    pub fn bind_unit(&mut self, name: &str, units: &str) -> Result<(), ParameterError> {
        validate_names([name])?;
        let name = base_name(name);
        let units = self.dispenser.get(units)?;
        if let Some(Parameter::Concrete(quantity)) = self.store.definitions.get_mut(name) {
            *quantity = quantity.relabel(units.clone());
        }
        self.store.specs.insert(name.to_string(), units);
        Ok(())
    }

    /// Remove a parameter with its unit spec and bounds
    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        self.store.remove(base_name(name))
    }

    /// Restrict the scaled value of a parameter to a union of intervals
    ///
    /// A stored concrete value must already satisfy the new bounds. An empty
    /// set removes the restriction.
    pub fn set_bounds<I>(&mut self, name: &str, intervals: I) -> Result<(), ParameterError>
    where
        I: IntoIterator<Item = Bounds>,
    {
        validate_names([name])?;
        let name = base_name(name);
        let intervals: Vec<Bounds> = intervals.into_iter().collect();

        if let Some(Parameter::Concrete(quantity)) = self.store.definitions.get(name) {
            let scaled = self.evaluator().to_scaled(quantity)?;
            bounds::check(&intervals, scaled).map_err(|source| ParameterError::OutsideBounds {
                name: name.to_string(),
                source,
            })?;
        }

        if intervals.is_empty() {
            self.store.bounds.remove(name);
        } else {
            self.store.bounds.insert(name.to_string(), intervals);
        }
        Ok(())
    }

    pub fn clear_bounds(&mut self, name: &str) -> Vec<Bounds> {
        self.store.bounds.remove(base_name(name)).unwrap_or_default()
    }

    pub fn bounds(&self, name: &str) -> &[Bounds] {
        self.store.bounds(base_name(name))
    }

    fn basis_quantity(&self, dimension: &str, value: ParamValue) -> Result<Quantity, ParameterError> {
        match value {
            ParamValue::Scaled(value) => Ok(Quantity::dimensionless(value)),
            ParamValue::Literal(value, units) => Ok(self.dispenser.quantity(value, &units)?),
            ParamValue::Quantity(quantity) => Ok(quantity),
            ParamValue::Function(..) | ParamValue::Expression(..) => {
                Err(ParameterError::MalformedQuantity {
                    name: dimension.to_string(),
                    message: "a dimension scaling must be a quantity".to_string(),
                })
            }
        }
    }

    /// Set the reference quantity for one dimension
    ///
    /// # Examples
    ///
    /// ```
    /// use scaled_params::parameters::Parameters;
    ///
    /// let mut p = Parameters::new();
    /// p.define([("x", (1.0, "m"))]).unwrap();
    /// p.scale_dimension("length", (2.0, "m")).unwrap();
    /// assert_eq!(p.scaled("x").unwrap(), 0.5);
    /// ```
    pub fn scale_dimension(
        &mut self,
        dimension: &str,
        scale: impl Into<ParamValue>,
    ) -> Result<(), ParameterError> {
        let quantity = self.basis_quantity(dimension, scale.into())?;
        self.scaling.set_basis(dimension, quantity, &self.dispenser)?;
        Ok(())
    }

    /// Set several reference quantities at once
    ///
    /// Every value must be a quantity. Entries rejected by the scaling engine
    /// are skipped with a warning and returned; the others are applied.
    pub fn scale_dimensions<I, K, V>(&mut self, scales: I) -> Result<Vec<ScalingError>, ParameterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        let scales = scales
            .into_iter()
            .map(|(dimension, value)| {
                let dimension: String = dimension.into();
                let quantity = self.basis_quantity(&dimension, value.into())?;
                Ok((dimension, quantity))
            })
            .collect::<Result<Vec<_>, ParameterError>>()?;

        let mut skipped = Vec::new();
        for (dimension, quantity) in scales {
            if let Err(err) = self.scaling.set_basis(&dimension, quantity, &self.dispenser) {
                log::warn!("skipping scaling for '{}': {}", dimension, err);
                skipped.push(err);
            }
        }
        Ok(skipped)
    }

    /// Reference quantity of a dimension, one basis unit by default
    pub fn scaling(&self, dimension: &str) -> Result<Quantity, ParameterError> {
        Ok(self.scaling.scaling(dimension, &self.dispenser)?)
    }

    pub fn scalings(&self) -> &BTreeMap<String, Quantity> {
        self.scaling.scalings()
    }

    /// Register a factor applied to one exact dimension combination
    pub fn add_unit_scaling(&mut self, dimensions: Dimensions, factor: f64) -> Result<(), ParameterError> {
        self.scaling.add_unit_scaling(dimensions, factor)?;
        Ok(())
    }

    pub fn unit_scalings(&self) -> &[UnitScaling] {
        self.scaling.unit_scalings()
    }

    /// Factor between a magnitude in `units` and its scaled value
    pub fn unit_scaling(&self, units: &str) -> Result<f64, ParameterError> {
        let units = self.dispenser.get(units)?;
        Ok(self.scaling.unit_scaling(&units, &self.dispenser)?)
    }

    /// Register a custom unit
    pub fn unit_add(&mut self, spec: UnitSpec) -> Result<(), ParameterError> {
        self.dispenser.add(spec.clone())?;
        self.units_custom.push(spec);
        self.scaling.clear_cache();
        Ok(())
    }

    pub fn units(&self) -> &UnitDispenser {
        &self.dispenser
    }

    pub fn custom_units(&self) -> &[UnitSpec] {
        &self.units_custom
    }

    /// Convert between scaled values and quantities
    ///
    /// A bare number is read in `input` units when given, otherwise as a
    /// scaled value. The result is a quantity in `output` units when given,
    /// otherwise a scaled value.
    ///
    /// # Examples
    ///
    /// ```
    /// use scaled_params::parameters::{Parameters, Value};
    ///
    /// let p = Parameters::new();
    /// let scaled = p.convert(1.0, Some("mT"), None).unwrap();
    /// assert!((scaled.as_scaled().unwrap() - 1e-3).abs() < 1e-15);
    /// ```
    pub fn convert(
        &self,
        value: impl Into<ParamValue>,
        input: Option<&str>,
        output: Option<&str>,
    ) -> Result<Value, ParameterError> {
        let evaluator = self.evaluator();
        let output = output.map(|text| self.dispenser.get(text)).transpose()?;

        let quantity = match (value.into(), input) {
            (ParamValue::Scaled(value), Some(units)) => self.dispenser.quantity(value, units)?,
            (ParamValue::Scaled(value), None) => {
                return match output {
                    Some(units) => Ok(Value::Quantity(evaluator.from_scaled(value, &units)?)),
                    None => Ok(Value::Scaled(value)),
                }
            }
            (ParamValue::Literal(value, units), _) => self.dispenser.quantity(value, &units)?,
            (ParamValue::Quantity(quantity), _) => quantity,
            (ParamValue::Function(..) | ParamValue::Expression(..), _) => {
                return Err(ParameterError::MalformedQuantity {
                    name: "value".to_string(),
                    message: "only numbers and quantities can be converted".to_string(),
                })
            }
        };

        match output {
            Some(units) => Ok(Value::Quantity(quantity.to(&units)?)),
            None => Ok(Value::Scaled(evaluator.to_scaled(&quantity)?)),
        }
    }

    pub fn config(&self) -> &ParametersConfig {
        &self.config
    }

    /// Names of all defined parameters, sorted
    pub fn names(&self) -> Vec<&str> {
        self.store.definitions.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Parameter)> {
        self.store
            .definitions
            .iter()
            .map(|(name, parameter)| (name.as_str(), parameter))
    }

    /// Unit specs recorded for names that have no definition
    pub fn declared_units(&self) -> impl Iterator<Item = (&str, &Units)> {
        self.store
            .specs
            .iter()
            .filter(|(name, _)| !self.store.definitions.contains_key(*name))
            .map(|(name, units)| (name.as_str(), units))
    }

    pub fn len(&self) -> usize {
        self.store.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.definitions.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store.definitions.contains_key(name)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.store.definitions.get(name)
    }

    pub fn unit_spec(&self, name: &str) -> Option<&Units> {
        self.store.specs.get(name)
    }

    /// Parameters read by the function defining `name`
    pub fn dependencies(&self, name: &str) -> Vec<String> {
        self.store
            .function(name)
            .map(|function| function.dependencies(name))
            .unwrap_or_default()
    }
}
