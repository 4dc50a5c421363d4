//! # Parameter System
//!
//! Named, dimensioned parameters that may be defined as functions of one
//! another. Functions that list their own target among their arguments can be
//! inverted, so assigning a derived parameter propagates back to the
//! parameters it depends on.
//!
//! ## Key Features
//!
//! - **Two views**: every parameter is available as a unit-aware quantity and as a scaled number
//! - **Dimensional scaling**: choose the reference quantity of each dimension
//! - **Invertible functions**: assignments flow backwards through function definitions
//! - **Symbolic queries**: evaluate expressions such as `"x^2 + y^2"` over scaled values
//! - **Serialization Support**: save and load parameter collections as JSON profiles
//!
//! ## Core Components
//!
//! - [`Parameters`]: the collection, with queries, updates and scaling control
//! - [`ParamFunction`]: a callable over [`Arguments`], possibly compiled from an [`Expression`]
//! - [`ParamValue`]: anything that can be assigned or used as an override
//! - [`Bounds`]: intervals restricting a parameter's scaled value
//!
//! ## Example Usage
//!
//! ```rust
//! use scaled_params::parameters::{ParamFunction, Parameters, ParametersConfig};
//!
//! let config = ParametersConfig::new().with_default_scaled(false);
//! let mut p = Parameters::with_config(config).unwrap();
//! p.define([("x", (2.0, "m")), ("y", (2.0, "m"))]).unwrap();
//!
//! // Bare names receive quantities, `_` names receive scaled values
//! let area = ParamFunction::new(&["x", "y"], |args| {
//!     Ok((args.quantity("x")? * args.quantity("y")?).into())
//! });
//! p.define([("area", area)]).unwrap();
//!
//! let area = p.get_with("area", [("x", 1.0), ("y", 3.0)]).unwrap();
//! assert_eq!(area.to_string(), "3 m^2");
//! ```

pub mod bounds;
pub mod config;
pub mod constants;
mod cycle;
mod evaluator;
pub mod expression;
pub mod function;
pub mod parameter;
pub mod parameters;
pub mod profile;
mod resolver;
mod store;
mod table;

// Re-export key types
pub use bounds::{Bounds, BoundsError};
pub use config::ParametersConfig;
pub use constants::PHYSICAL_CONSTANTS;
pub use expression::{EvaluationContext, Expression, ExpressionError};
pub use function::{Argument, Arguments, Evaluated, ParamFunction, Value, View};
pub use parameter::{is_valid_name, ParamValue, Parameter, ParameterError};
pub use parameters::Parameters;
pub use profile::{Profile, SerializationError, ValueRecord};
