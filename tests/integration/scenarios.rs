//! End-to-end scenarios

use approx::assert_relative_eq;
use scaled_params::parameters::{Parameters, ParametersConfig, Value};
use scaled_params::{ParameterError, ScaledParamsError};

#[test]
fn test_scaled_basis_scenario() {
    let mut p = Parameters::new();
    assert!(p.config().default_scaled);

    p.scale_dimension("length", (2.0, "m")).unwrap();
    p.set("x", (1.0, "m")).unwrap();

    assert_relative_eq!(p.scaled("x").unwrap(), 0.5);
    assert_eq!(p.get("x").unwrap(), Value::Scaled(0.5));
    assert_eq!(
        p.get("_x").unwrap(),
        Value::Quantity(p.units().quantity(1.0, "m").unwrap())
    );

    // A bare number is read in the scaled basis of the declared unit
    p.set("x", 2.0).unwrap();
    assert_eq!(p.quantity("x").unwrap(), p.units().quantity(4.0, "m").unwrap());
}

#[test]
fn test_dependent_parameter_scenario() {
    let mut p = Parameters::new();
    p.define([("x", 1.0)]).unwrap();
    p.define([("y", "x**2")]).unwrap();

    p.set("x", 3.0).unwrap();
    assert_relative_eq!(p.scaled("y").unwrap(), 9.0);
    assert_eq!(p.get_with("y", [("x", 4.0)]).unwrap(), Value::Scaled(16.0));
    assert_relative_eq!(p.scaled("y").unwrap(), 9.0);
    assert_eq!(p.dependencies("y"), vec!["x".to_string()]);
}

#[test]
fn test_invalid_name_scenario() {
    let mut p = Parameters::new();
    let err = p.set("asd%WAD", 1.0).unwrap_err();
    assert!(err.to_string().contains("asd%WAD"));
    assert!(p.is_empty());

    // The crate-level error wraps every layer
    let wrapped: ScaledParamsError = err.into();
    assert!(matches!(
        wrapped,
        ScaledParamsError::Parameter(ParameterError::InvalidIdentifier { .. })
    ));
}

#[test]
fn test_magnetic_field_conversion() {
    let mut p = Parameters::new();
    p.scale_dimension("mass", (1.0, "g")).unwrap();

    // 1 mT = 1e-3 kg/(A s^2); with a gram mass basis that is 1 scaled unit
    let scaled = p.convert(1.0, Some("mT"), None).unwrap();
    assert_relative_eq!(scaled.as_scaled().unwrap(), 1.0, max_relative = 1e-12);

    let field = p.convert(1.0, None, Some("mT")).unwrap();
    assert_relative_eq!(field.as_quantity().unwrap().value(), 1.0, max_relative = 1e-12);

    let tesla = p.convert((500.0, "mT"), None, Some("T")).unwrap();
    assert_relative_eq!(tesla.as_quantity().unwrap().value(), 0.5, max_relative = 1e-12);

    assert!(p.convert((1.0, "mT"), None, Some("m")).is_err());
}

#[test]
fn test_constants_scenario() {
    let mut p = Parameters::with_config(ParametersConfig::new().with_constants(true)).unwrap();
    p.define([("B", (1.0, "T"))]).unwrap();
    p.define([("zeeman", ("mu_B * B", "J"))]).unwrap();

    let energy = p.quantity("zeeman").unwrap();
    assert_relative_eq!(energy.value(), 9.274e-24, max_relative = 1e-9);
    assert!(p.contains("hbar"));
    assert!(p.contains("pi"));
}

#[test]
fn test_table_scenario() {
    let mut p = Parameters::new();
    assert_eq!(p.to_string(), "No parameters have been specified.");

    p.define([("x", (2.0, "m")), ("y", (3.0, "m"))]).unwrap();
    p.define([("area", ("x * y", "m^2"))]).unwrap();
    let table = p.to_string();
    assert!(table.contains("area(x,y)"));
    assert!(table.contains("6 m^2"));
    assert!(table.contains("2 m"));
}
