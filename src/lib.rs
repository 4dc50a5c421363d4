//! # scaled-params
//!
//! `scaled-params` manages named physical parameters for numerical models.
//! Each parameter carries units and is also available as a dimensionless
//! number in a user-chosen basis, so model code can work with well-conditioned
//! values while callers keep talking in physical units.
//!
//! The library provides:
//! - A unit registry with SI units, prefixes and custom units
//! - A scaling engine mapping any unit to the internal dimensionless basis
//! - Parameters defined as invertible functions of other parameters
//! - Symbolic expression queries and JSON persistence
//!
//! ## Basic Usage
//!
//! ```
//! use scaled_params::Parameters;
//!
//! let mut p = Parameters::new();
//! p.define([("x", (2.0, "nm"))]).unwrap();
//! p.scale_dimension("length", (1.0, "nm")).unwrap();
//! assert!((p.scaled("x").unwrap() - 2.0).abs() < 1e-12);
//! ```

// Public modules
pub mod error;

// Parameter system
pub mod parameters;

pub mod scaling;
pub mod units;

// Re-exports for convenience
pub use error::{Result, ScaledParamsError};
pub use parameters::{
    ParamFunction, ParamValue, Parameter, ParameterError, Parameters, ParametersConfig, Value,
};
pub use scaling::{ScalingEngine, ScalingError};
pub use units::{Quantity, UnitDispenser, UnitError, UnitSpec, Units};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
