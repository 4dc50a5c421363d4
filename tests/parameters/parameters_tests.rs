//! Integration tests for the Parameters collection
//!
//! These tests verify that the Parameters collection behaves correctly in various scenarios.

use approx::assert_relative_eq;
use scaled_params::parameters::{
    Bounds, ParamValue, Parameter, ParameterError, Parameters, ParametersConfig, Value,
};
use scaled_params::units::{Dimensions, UnitSpec};

#[test]
fn test_parameters_basic_operations() {
    let mut params = Parameters::new();
    assert_eq!(params.len(), 0);
    assert!(params.is_empty());

    params.define([("amplitude", (10.0, "V"))]).unwrap();
    params.set("center", (5.0, "ms")).unwrap();

    assert_eq!(params.len(), 2);
    assert!(params.contains("amplitude"));
    assert_eq!(params.names(), vec!["amplitude", "center"]);
    assert!(matches!(
        params.parameter("center"),
        Some(Parameter::Concrete(_))
    ));

    let removed = params.remove("amplitude").unwrap();
    assert_eq!(
        removed.as_quantity().unwrap(),
        &params.units().quantity(10.0, "V").unwrap()
    );
    assert_eq!(params.len(), 1);
    assert!(params.remove("amplitude").is_none());
}

#[test]
fn test_round_trip_through_unit_spec() {
    let mut p = Parameters::new();
    p.set("x", (2.5, "ms")).unwrap();

    let quantity = p.quantity("x").unwrap();
    assert_relative_eq!(quantity.value(), 2.5);
    assert_eq!(quantity.units().to_string(), "ms");

    let scaled = p.scaled("x").unwrap();
    let back = p.convert(scaled, None, Some("ms")).unwrap();
    assert_relative_eq!(back.as_quantity().unwrap().value(), 2.5, max_relative = 1e-12);
}

#[test]
fn test_views_follow_default_flag() {
    let mut scaled = Parameters::new();
    scaled.define([("x", (3.0, "km"))]).unwrap();
    assert_relative_eq!(scaled.get("x").unwrap().as_scaled().unwrap(), 3000.0, max_relative = 1e-12);
    assert_eq!(
        scaled.get("_x").unwrap(),
        Value::Quantity(scaled.units().quantity(3.0, "km").unwrap())
    );

    let config = ParametersConfig::new().with_default_scaled(false);
    let mut unscaled = Parameters::with_config(config).unwrap();
    unscaled.define([("x", (3.0, "km"))]).unwrap();
    assert!(unscaled.get("x").unwrap().as_quantity().is_some());
    assert_relative_eq!(unscaled.get("_x").unwrap().as_scaled().unwrap(), 3000.0, max_relative = 1e-12);
}

#[test]
fn test_get_many_shares_overrides() {
    let mut p = Parameters::new();
    p.define([("x", 1.0), ("y", 2.0)]).unwrap();
    p.define([("s", "x + y")]).unwrap();

    let values = p.get_many(&["x", "_y", "s", "s * 2"], [("x", 5.0)]).unwrap();
    assert_eq!(values["x"], Value::Scaled(5.0));
    assert!(values["y"].as_quantity().is_some());
    assert_eq!(values["s"], Value::Scaled(7.0));
    assert_eq!(values["s * 2"], Value::Scaled(14.0));

    assert_relative_eq!(p.scaled("x").unwrap(), 1.0);
}

#[test]
fn test_range_sweeps_one_parameter() {
    let mut p = Parameters::new();
    p.define([("x", 1.0)]).unwrap();
    p.define([("y", "x^2")]).unwrap();

    let values = p.range("y", "x", [1.0, 2.0, 4.0]).unwrap();
    assert_eq!(
        values,
        vec![Value::Scaled(1.0), Value::Scaled(4.0), Value::Scaled(16.0)]
    );
}

#[test]
fn test_expression_overrides() {
    let mut p = Parameters::new();
    p.define([("x", 2.0), ("y", 0.0)]).unwrap();
    p.define([("z", "x * y")]).unwrap();

    // Overrides given as expressions are evaluated against the others
    let value = p.get_with("z", [("x", ParamValue::from(3.0)), ("y", ParamValue::from("x + 1"))]);
    assert_eq!(value.unwrap(), Value::Scaled(12.0));
}

#[test]
fn test_update_is_atomic_on_invalid_names() {
    let mut p = Parameters::new();
    p.define([("x", 1.0)]).unwrap();

    let err = p.update([("x", 5.0), ("asd%WAD", 1.0)]).unwrap_err();
    assert_eq!(
        err,
        ParameterError::InvalidIdentifier {
            names: vec!["asd%WAD".to_string()]
        }
    );
    assert_relative_eq!(p.scaled("x").unwrap(), 1.0);
}

#[test]
fn test_malformed_literal_units() {
    let mut p = Parameters::new();
    assert!(matches!(
        p.set("x", (1.0, "not_a_unit")),
        Err(ParameterError::Unit(_))
    ));
    assert!(!p.contains("x"));
}

#[test]
fn test_bounds() {
    let mut p = Parameters::new();
    p.define([("x", (2.0, "m"))]).unwrap();

    p.set_bounds("x", [Bounds::new(0.0, 1.0).unwrap(), Bounds::new(1.5, 3.0).unwrap()])
        .unwrap();
    assert_eq!(p.bounds("x").len(), 2);

    assert!(p.set("x", 0.5).is_ok());
    assert!(matches!(
        p.set("x", 1.2),
        Err(ParameterError::OutsideBounds { .. })
    ));
    assert_relative_eq!(p.scaled("x").unwrap(), 0.5);

    // Query overrides are checked as well
    assert!(p.get_with("x", [("x", 10.0)]).is_err());

    // Existing values must satisfy new bounds
    assert!(p.set_bounds("x", [Bounds::min_only(1.0)]).is_err());

    assert_eq!(p.clear_bounds("x").len(), 2);
    assert!(p.set("x", 100.0).is_ok());
}

#[test]
fn test_bounds_apply_to_scaled_values() {
    let mut p = Parameters::new();
    p.define([("x", (1.0, "nm"))]).unwrap();
    p.scale_dimension("length", (1.0, "nm")).unwrap();
    p.set_bounds("x", [Bounds::new(0.0, 5.0).unwrap()]).unwrap();

    assert!(p.set("x", (4.0, "nm")).is_ok());
    assert!(p.set("x", (6.0, "nm")).is_err());
}

#[test]
fn test_scale_dimensions_skips_bad_entries() {
    let mut p = Parameters::new();
    p.define([("x", (1.0, "m")), ("t", (1.0, "s"))]).unwrap();

    let skipped = p
        .scale_dimensions([("length", (2.0, "m")), ("time", (1.0, "m"))])
        .unwrap();
    assert_eq!(skipped.len(), 1);
    assert_relative_eq!(p.scaled("x").unwrap(), 0.5);
    assert_relative_eq!(p.scaled("t").unwrap(), 1.0);

    assert!(p.scale_dimension("length", 2.0).is_err());
    assert_eq!(p.scaling("length").unwrap(), p.units().quantity(2.0, "m").unwrap());
    assert_eq!(p.scaling("time").unwrap(), p.units().quantity(1.0, "s").unwrap());
}

#[test]
fn test_unit_scaling_overrides() {
    let mut p = Parameters::new();
    p.define([("energy", (1.0, "J")), ("length", (1.0, "m"))]).unwrap();

    let energy = Dimensions::new()
        .with("mass", 1)
        .with("length", 2)
        .with("time", -2);
    p.add_unit_scaling(energy.clone(), 2.0).unwrap();
    assert_relative_eq!(p.scaled("energy").unwrap(), 2.0);
    assert_relative_eq!(p.scaled("length").unwrap(), 1.0);
    assert_relative_eq!(p.unit_scaling("J").unwrap(), 0.5);

    // A second entry for the same combination replaces the first
    p.add_unit_scaling(energy, 4.0).unwrap();
    assert_eq!(p.unit_scalings().len(), 1);
    assert_relative_eq!(p.scaled("energy").unwrap(), 4.0);
}

#[test]
fn test_custom_units() {
    let mut p = Parameters::new();
    p.unit_add(
        UnitSpec::new("TestUnit", "TU", 1e7)
            .dimension("length", 1)
            .dimension("mass", 1)
            .not_prefixable(),
    )
    .unwrap();
    assert_eq!(p.custom_units().len(), 1);
    assert!(!p.units().has("kTU"));

    let value = p.get_with("_x", [("x", (1.0, "TU"))]).unwrap();
    let converted = value.as_quantity().unwrap().to(&p.units().get("kg*m").unwrap()).unwrap();
    assert_relative_eq!(converted.value(), 1e7);
}

#[test]
fn test_constants() {
    let p = Parameters::with_config(ParametersConfig::new().with_constants(true)).unwrap();
    assert_relative_eq!(p.scaled("_h").unwrap(), 6.62606957e-34);
    assert_eq!(
        p.quantity("h").unwrap(),
        p.units().quantity(6.62606957e-34, "J*s").unwrap()
    );
    assert_relative_eq!(p.scaled("pi").unwrap(), std::f64::consts::PI);
}

#[test]
fn test_dependencies_introspection() {
    let mut p = Parameters::new();
    p.define([("x", 1.0), ("y", 1.0)]).unwrap();
    p.define([("r", "sqrt(x^2 + _y^2)")]).unwrap();

    assert_eq!(p.dependencies("r"), vec!["y".to_string(), "x".to_string()]);
    assert!(p.dependencies("x").is_empty());
    assert!(p.unit_spec("r").unwrap().is_dimensionless());
}

#[test]
fn test_alternate_view_assignments_target_the_parameter() {
    let mut p = Parameters::new();
    p.define([("x", (1.0, "m"))]).unwrap();

    p.set("_x", (5.0, "m")).unwrap();
    assert_eq!(p.names(), vec!["x"]);
    assert_eq!(p.get("_x").unwrap(), Value::Quantity(p.units().quantity(5.0, "m").unwrap()));

    p.update([("x", 1.0), ("_y", 2.0)]).unwrap();
    assert_eq!(p.names(), vec!["x", "y"]);
    assert_relative_eq!(p.scaled("y").unwrap(), 2.0);

    p.define([("_z", "x * 3")]).unwrap();
    assert!(p.parameter("z").unwrap().is_function());
    assert!(!p.contains("_z"));
}

#[test]
fn test_alternate_view_overrides() {
    let mut p = Parameters::new();
    p.define([("x", (1.0, "m"))]).unwrap();
    p.define([("y", "x * 2")]).unwrap();

    assert_eq!(p.get_with("x", [("_x", (5.0, "m"))]).unwrap(), Value::Scaled(5.0));
    assert_eq!(p.get_with("y", [("_x", (3.0, "m"))]).unwrap(), Value::Scaled(6.0));
    assert_relative_eq!(p.scaled("x").unwrap(), 1.0);
}

#[test]
fn test_both_views_in_one_batch_are_rejected() {
    let mut p = Parameters::new();
    p.define([("x", (1.0, "m"))]).unwrap();

    let err = p
        .update([("x", ParamValue::from(2.0)), ("_x", ParamValue::from((2.0, "m")))])
        .unwrap_err();
    assert!(matches!(err, ParameterError::Overspecified { ref name, .. } if name == "x"));
    assert_relative_eq!(p.scaled("x").unwrap(), 1.0);

    assert!(matches!(
        p.set("__x", 1.0),
        Err(ParameterError::InvalidIdentifier { .. })
    ));
    assert_eq!(p.names(), vec!["x"]);
}
