//! Parameter functions
//!
//! A [`ParamFunction`] is an ordered list of [`Argument`] descriptors plus a
//! callable. Each argument names a parameter and selects one of its two
//! views: the scaled number or the unit-aware [`Quantity`]. Which view the
//! bare name means depends on the engine's `default_scaled` flag; a leading
//! `_` on the name selects the other view.
//!
//! A function that lists its own target parameter among its arguments is
//! invertible: when the target is pinned, the callable receives the target
//! value in that slot (see [`Arguments::target`]) and must return one value
//! per remaining argument, in declaration order.

use super::expression::{EvaluationContext, Expression, ExpressionError};
use super::parameter::ParameterError;
use crate::units::Quantity;
use std::fmt;
use std::sync::Arc;

/// Which representation of a parameter a function argument receives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Dimensionless number in the engine's internal basis
    Scaled,
    /// Magnitude with units
    Quantity,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Scaled => write!(f, "scaled"),
            View::Quantity => write!(f, "unit-aware"),
        }
    }
}

/// A function argument: parameter name plus view selector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Argument {
    name: String,
    alternate: bool,
}

impl Argument {
    /// Parse an argument token; a leading `_` selects the alternate view
    ///
    /// # Examples
    ///
    /// ```
    /// use scaled_params::parameters::{Argument, View};
    ///
    /// let arg = Argument::parse("_x");
    /// assert_eq!(arg.name(), "x");
    /// assert_eq!(arg.view(true), View::Quantity);
    /// assert_eq!(arg.view(false), View::Scaled);
    /// assert_eq!(arg.token(), "_x");
    /// ```
    pub fn parse(token: &str) -> Self {
        match token.strip_prefix('_') {
            Some(name) => Self {
                name: name.to_string(),
                alternate: true,
            },
            None => Self {
                name: token.to_string(),
                alternate: false,
            },
        }
    }

    pub fn new(name: &str, view: View, default_scaled: bool) -> Self {
        Self {
            name: name.to_string(),
            alternate: (view == View::Scaled) != default_scaled,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_alternate(&self) -> bool {
        self.alternate
    }

    /// View this argument receives under the given default
    pub fn view(&self, default_scaled: bool) -> View {
        if default_scaled != self.alternate {
            View::Scaled
        } else {
            View::Quantity
        }
    }

    /// The token as written, with its `_` prefix restored
    pub fn token(&self) -> String {
        if self.alternate {
            format!("_{}", self.name)
        } else {
            self.name.clone()
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// A parameter value in one of its two views
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scaled(f64),
    Quantity(Quantity),
}

impl Value {
    pub fn as_scaled(&self) -> Option<f64> {
        match self {
            Value::Scaled(value) => Some(*value),
            Value::Quantity(_) => None,
        }
    }

    pub fn as_quantity(&self) -> Option<&Quantity> {
        match self {
            Value::Scaled(_) => None,
            Value::Quantity(quantity) => Some(quantity),
        }
    }

    pub fn view(&self) -> View {
        match self {
            Value::Scaled(_) => View::Scaled,
            Value::Quantity(_) => View::Quantity,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scaled(value) => write!(f, "{}", value),
            Value::Quantity(quantity) => write!(f, "{}", quantity),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Scaled(value)
    }
}

impl From<Quantity> for Value {
    fn from(quantity: Quantity) -> Self {
        Value::Quantity(quantity)
    }
}

/// What a parameter function returns
///
/// Forward evaluation expects a single value. Inverse evaluation expects one
/// value per non-target argument; a single value is accepted only when exactly
/// one is expected.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluated {
    Single(Value),
    Multiple(Vec<Value>),
}

impl Evaluated {
    pub fn len(&self) -> usize {
        match self {
            Evaluated::Single(_) => 1,
            Evaluated::Multiple(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value of a single-valued result
    pub fn into_single(self) -> Option<Value> {
        match self {
            Evaluated::Single(value) => Some(value),
            Evaluated::Multiple(mut values) if values.len() == 1 => values.pop(),
            Evaluated::Multiple(_) => None,
        }
    }
}

impl From<f64> for Evaluated {
    fn from(value: f64) -> Self {
        Evaluated::Single(Value::Scaled(value))
    }
}

impl From<Quantity> for Evaluated {
    fn from(quantity: Quantity) -> Self {
        Evaluated::Single(Value::Quantity(quantity))
    }
}

impl From<Value> for Evaluated {
    fn from(value: Value) -> Self {
        Evaluated::Single(value)
    }
}

impl From<Vec<Value>> for Evaluated {
    fn from(values: Vec<Value>) -> Self {
        Evaluated::Multiple(values)
    }
}

impl From<Vec<f64>> for Evaluated {
    fn from(values: Vec<f64>) -> Self {
        Evaluated::Multiple(values.into_iter().map(Value::Scaled).collect())
    }
}

impl From<Vec<Quantity>> for Evaluated {
    fn from(values: Vec<Quantity>) -> Self {
        Evaluated::Multiple(values.into_iter().map(Value::Quantity).collect())
    }
}

/// Resolved argument values handed to a function call
#[derive(Debug, Clone)]
pub struct Arguments {
    slots: Vec<(Argument, Option<Value>)>,
    target: Option<usize>,
}

impl Arguments {
    pub(crate) fn new(slots: Vec<(Argument, Option<Value>)>, target: Option<usize>) -> Self {
        Self { slots, target }
    }

    fn slot(&self, token: &str) -> Option<&(Argument, Option<Value>)> {
        self.slots
            .iter()
            .find(|(argument, _)| argument.token() == token)
            .or_else(|| self.slots.iter().find(|(argument, _)| argument.name() == token))
    }

    /// Value bound to an argument, looked up by token (`"_x"`) or bare name
    pub fn get(&self, token: &str) -> Result<&Value, ParameterError> {
        self.slot(token)
            .and_then(|(_, value)| value.as_ref())
            .ok_or_else(|| ParameterError::MissingArgument {
                name: token.to_string(),
            })
    }

    /// Scaled value bound to an argument
    pub fn scaled(&self, token: &str) -> Result<f64, ParameterError> {
        match self.get(token)? {
            Value::Scaled(value) => Ok(*value),
            Value::Quantity(_) => Err(ParameterError::ArgumentView {
                name: token.to_string(),
                expected: View::Scaled,
            }),
        }
    }

    /// Quantity bound to an argument
    pub fn quantity(&self, token: &str) -> Result<&Quantity, ParameterError> {
        match self.get(token)? {
            Value::Quantity(quantity) => Ok(quantity),
            Value::Scaled(_) => Err(ParameterError::ArgumentView {
                name: token.to_string(),
                expected: View::Quantity,
            }),
        }
    }

    /// Value in declaration position `index`
    pub fn at(&self, index: usize) -> Result<&Value, ParameterError> {
        self.slots
            .get(index)
            .and_then(|(_, value)| value.as_ref())
            .ok_or_else(|| ParameterError::MissingArgument {
                name: format!("#{}", index),
            })
    }

    /// The pinned target value when the function is being inverted
    pub fn target(&self) -> Option<&Value> {
        self.target
            .and_then(|index| self.slots.get(index))
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn is_inverse(&self) -> bool {
        self.target.is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl EvaluationContext for Arguments {
    fn get_variable(&self, name: &str) -> Result<f64, ExpressionError> {
        match self.get(name) {
            Ok(Value::Scaled(value)) => Ok(*value),
            Ok(Value::Quantity(_)) => Err(ExpressionError::InvalidOperation {
                message: format!(
                    "symbolic expressions can only be evaluated with scaled parameters, '{}' is unit-aware",
                    name
                ),
            }),
            Err(_) => Err(ExpressionError::UndefinedVariable {
                name: name.to_string(),
            }),
        }
    }

    fn has_variable(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    fn variable_names(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|(_, value)| value.is_some())
            .map(|(argument, _)| argument.token())
            .collect()
    }
}

type Callable = dyn Fn(&Arguments) -> Result<Evaluated, ParameterError> + Send + Sync;

/// A callable parameter definition with declared arguments
#[derive(Clone)]
pub struct ParamFunction {
    arguments: Vec<Argument>,
    callable: Arc<Callable>,
    source: Option<String>,
}

impl ParamFunction {
    /// Wrap a closure taking the listed argument tokens
    ///
    /// # Arguments
    ///
    /// * `arguments` - Argument tokens in declaration order; `_` prefixes select the alternate view
    /// * `callable` - The function body
    ///
    /// # Examples
    ///
    /// ```
    /// use scaled_params::parameters::ParamFunction;
    ///
    /// // y = x^2, or x = sqrt(y) when y is pinned
    /// let f = ParamFunction::new(&["x", "y"], |args| {
    ///     Ok(match args.target() {
    ///         None => args.scaled("x")?.powi(2).into(),
    ///         Some(_) => args.scaled("y")?.sqrt().into(),
    ///     })
    /// });
    /// assert!(f.declares("y"));
    /// assert_eq!(f.dependencies("y"), vec!["x".to_string()]);
    /// ```
    pub fn new<F>(arguments: &[&str], callable: F) -> Self
    where
        F: Fn(&Arguments) -> Result<Evaluated, ParameterError> + Send + Sync + 'static,
    {
        Self::with_arguments(
            arguments.iter().map(|token| Argument::parse(token)).collect(),
            callable,
        )
    }

    pub fn with_arguments<F>(arguments: Vec<Argument>, callable: F) -> Self
    where
        F: Fn(&Arguments) -> Result<Evaluated, ParameterError> + Send + Sync + 'static,
    {
        Self {
            arguments,
            callable: Arc::new(callable),
            source: None,
        }
    }

    /// Compile a symbolic expression; its free symbols become the arguments
    pub fn from_expression(source: &str) -> Result<Self, ExpressionError> {
        let expression = Expression::parse(source)?;
        let arguments = expression
            .variables()
            .iter()
            .map(|token| Argument::parse(token))
            .collect();
        let mut function = Self::with_arguments(arguments, move |args| {
            Ok(Evaluated::from(expression.evaluate(args)?))
        });
        function.source = Some(source.trim().to_string());
        Ok(function)
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Expression text for functions compiled from a string
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Whether `name` appears among the arguments, in either view
    pub fn declares(&self, name: &str) -> bool {
        self.arguments.iter().any(|argument| argument.name() == name)
    }

    /// Parameter names this function reads, excluding `target`
    pub fn dependencies(&self, target: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for argument in &self.arguments {
            if argument.name() != target && !names.iter().any(|name| name == argument.name()) {
                names.push(argument.name().to_string());
            }
        }
        names
    }

    pub fn call(&self, arguments: &Arguments) -> Result<Evaluated, ParameterError> {
        (self.callable)(arguments)
    }
}

impl fmt::Debug for ParamFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamFunction")
            .field("arguments", &self.arguments)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ParamFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<String> = self.arguments.iter().map(Argument::token).collect();
        write!(f, "({})", tokens.join(","))
    }
}
