//! Tests for parameter functions, argument views and inversion

use crate::test_helpers::{product, unscaled};
use approx::assert_relative_eq;
use scaled_params::parameters::{
    Evaluated, ParamFunction, ParamValue, ParameterError, Parameters, Value,
};

#[test]
fn test_forward_evaluation_tags_declared_units() {
    let mut p = Parameters::new();
    p.define([("x", (2.0, "m")), ("y", (3.0, "m"))]).unwrap();
    p.define([("area", (product("x", "y", "area"), "m^2"))]).unwrap();

    let area = p.quantity("area").unwrap();
    assert_relative_eq!(area.value(), 6.0);
    assert_eq!(area.units().to_string(), "m^2");
}

#[test]
fn test_functions_receive_quantities_with_prefix() {
    let mut p = Parameters::new();
    p.define([("x", (2.0, "km"))]).unwrap();

    let in_metres = ParamFunction::new(&["_x"], |args| {
        let x = args.quantity("_x")?;
        Ok(x.value_in(&scaled_params::UnitDispenser::si().get("m")?)?.into())
    });
    let result = p.evaluate(&in_metres, Vec::<(&str, ParamValue)>::new()).unwrap();
    assert_eq!(result, Evaluated::Single(Value::Scaled(2000.0)));
}

#[test]
fn test_wrong_view_is_reported() {
    let mut p = Parameters::new();
    p.define([("x", 1.0)]).unwrap();
    p.define([("y", ParamFunction::new(&["x"], |args| Ok(args.quantity("x")?.clone().into())))])
        .unwrap();

    assert!(matches!(
        p.get("y"),
        Err(ParameterError::ArgumentView { .. })
    ));
}

#[test]
fn test_inverse_arity_is_checked() {
    let mut p = Parameters::new();
    p.define([("x", 1.0), ("y", 1.0)]).unwrap();
    let lossy = ParamFunction::new(&["x", "y", "z"], |args| match args.target() {
        None => Ok((args.scaled("x")? + args.scaled("y")?).into()),
        // Only one value where two are expected
        Some(_) => Ok(1.0.into()),
    });
    p.define([("z", lossy)]).unwrap();

    assert!(matches!(
        p.set("z", 4.0),
        Err(ParameterError::InverseArity {
            expected: 2,
            found: 1,
            ..
        })
    ));
    assert_relative_eq!(p.scaled("x").unwrap(), 1.0);
}

#[test]
fn test_forward_arity_is_checked() {
    let mut p = Parameters::new();
    p.define([("x", 1.0)]).unwrap();
    p.define([("y", ParamFunction::new(&["x"], |_| Ok(vec![1.0, 2.0].into())))])
        .unwrap();

    assert!(matches!(
        p.get("y"),
        Err(ParameterError::ForwardArity { found: 2, .. })
    ));
}

#[test]
fn test_inverse_results_tagged_with_argument_units() {
    let mut p = unscaled();
    p.define([("x", (2.0, "nm")), ("y", (2.0, "m"))]).unwrap();
    let z = ParamFunction::new(&["x", "y", "z"], |args| match args.target() {
        Some(_) => Ok(vec![2.0, 3.0].into()),
        None => Ok((args.quantity("x")? * args.quantity("y")?).into()),
    });
    p.define([("z", z)]).unwrap();

    p.set("z", 1.0).unwrap();
    // Scaled results are read under each argument's unit spec
    assert_eq!(p.quantity("x").unwrap(), p.units().quantity(2.0, "m").unwrap());
    assert_eq!(p.quantity("x").unwrap().units().to_string(), "nm");
    assert_eq!(p.quantity("y").unwrap(), p.units().quantity(3.0, "m").unwrap());
}

#[test]
fn test_function_overrides_with_units() {
    let mut p = unscaled();
    p.define([("x", (2.0, "m")), ("y", (2.0, "m"))]).unwrap();
    let area = ParamFunction::new(&["x", "y"], |args| {
        Ok((args.quantity("x")? * args.quantity("y")?).into())
    });
    p.define([("z", area)]).unwrap();

    let z = p.get_with("z", [("x", 1.0), ("y", 1.0)]).unwrap();
    assert_eq!(z, Value::Quantity(p.units().quantity(1.0, "m^2").unwrap()));

    // An anonymous function override with an explicit unit
    let doubled = ParamFunction::new(&["_x"], |args| Ok((args.scaled("_x")? * 2.0).into()));
    let x = p
        .get_with("x", [("x", ParamValue::Function(doubled, Some("cm".to_string())))])
        .unwrap();
    assert_eq!(x, Value::Quantity(p.units().quantity(4.0, "m").unwrap()));
    assert_eq!(x.as_quantity().unwrap().units().to_string(), "cm");
}

#[test]
fn test_update_stores_functions_results_as_values() {
    let mut p = Parameters::new();
    p.define([("x", 2.0)]).unwrap();

    // Assigning a function through update stores its current value
    p.set("y", "x * 10").unwrap();
    assert!(p.parameter("y").unwrap().as_quantity().is_some());
    p.set("x", 5.0).unwrap();
    assert_relative_eq!(p.scaled("y").unwrap(), 20.0);
}

#[test]
fn test_anonymous_evaluation_returns_raw_result() {
    let mut p = Parameters::new();
    p.define([("a", 1.0), ("b", 2.0)]).unwrap();
    let pair = ParamFunction::new(&["a", "b"], |args| {
        Ok(vec![args.scaled("a")?, args.scaled("b")?].into())
    });

    let result = p.evaluate(&pair, [("a", 10.0)]).unwrap();
    assert_eq!(
        result,
        Evaluated::Multiple(vec![Value::Scaled(10.0), Value::Scaled(2.0)])
    );
}
