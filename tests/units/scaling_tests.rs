//! Tests for dimensional scaling seen through the parameter collection

use approx::assert_relative_eq;
use scaled_params::parameters::{Parameters, ParametersConfig};
use scaled_params::scaling::ScalingEngine;
use scaled_params::units::{Dimensions, UnitDispenser, UnitSpec};

#[test]
fn test_scaled_value_follows_basis() {
    let mut p = Parameters::new();
    p.define([("x", (1.0, "m")), ("t", (30.0, "min"))]).unwrap();

    p.scale_dimension("length", (2.0, "m")).unwrap();
    p.scale_dimension("time", (1.0, "h")).unwrap();
    assert_relative_eq!(p.scaled("x").unwrap(), 0.5, max_relative = 1e-12);
    assert_relative_eq!(p.scaled("t").unwrap(), 0.5, max_relative = 1e-12);

    // The stored quantities are untouched by rescaling
    assert_eq!(p.quantity("x").unwrap(), p.units().quantity(1.0, "m").unwrap());
    assert_eq!(p.scaling("length").unwrap(), p.units().quantity(2.0, "m").unwrap());
}

#[test]
fn test_scaling_factors_for_prefixed_units() {
    let mut p = Parameters::new();
    p.scale_dimension("length", (1.0, "nm")).unwrap();

    assert_relative_eq!(p.unit_scaling("nm").unwrap(), 1.0, max_relative = 1e-12);
    assert_relative_eq!(p.unit_scaling("m").unwrap(), 1e-9, max_relative = 1e-12);
    assert_relative_eq!(p.unit_scaling("nm^2").unwrap(), 1.0, max_relative = 1e-12);
    assert_relative_eq!(p.unit_scaling("1/nm").unwrap(), 1.0, max_relative = 1e-12);
    assert_relative_eq!(p.unit_scaling("s").unwrap(), 1.0);
    assert!(p.unit_scaling("parsec").is_err());
}

#[test]
fn test_cached_factors_are_stable() {
    let si = UnitDispenser::si();
    let mut engine = ScalingEngine::new();
    let units = ["m", "km", "m/s", "J", "mT", "eV", "Å^2"];

    let first: Vec<f64> = units
        .iter()
        .map(|u| engine.unit_scaling(&si.get(u).unwrap(), &si).unwrap())
        .collect();
    assert_eq!(engine.cached(), units.len());
    let second: Vec<f64> = units
        .iter()
        .map(|u| engine.unit_scaling(&si.get(u).unwrap(), &si).unwrap())
        .collect();
    assert_eq!(first, second);

    engine
        .set_basis("length", si.quantity(1.0, "Å").unwrap(), &si)
        .unwrap();
    assert_eq!(engine.cached(), 0);
    let rescaled = engine.unit_scaling(&si.get("Å^2").unwrap(), &si).unwrap();
    assert_relative_eq!(rescaled, 1.0, max_relative = 1e-12);
    assert_relative_eq!(
        engine.unit_scaling(&si.get("m").unwrap(), &si).unwrap(),
        1e-10,
        max_relative = 1e-12
    );
}

#[test]
fn test_override_applies_to_exact_dimensions_only() {
    let mut p = Parameters::new();
    p.define([("v", (2.0, "m/s")), ("a", (2.0, "m/s^2"))]).unwrap();

    let velocity = Dimensions::new().with("length", 1).with("time", -1);
    p.add_unit_scaling(velocity.clone(), 4.0).unwrap();
    assert_relative_eq!(p.scaled("v").unwrap(), 8.0);
    assert_relative_eq!(p.scaled("a").unwrap(), 2.0);

    p.add_unit_scaling(velocity, 0.5).unwrap();
    assert_relative_eq!(p.scaled("v").unwrap(), 1.0);
    assert_eq!(p.unit_scalings().len(), 1);

    assert!(p.add_unit_scaling(Dimensions::single("length"), f64::NAN).is_err());
}

#[test]
fn test_new_units_invalidate_cached_factors() {
    let mut p = Parameters::new();
    p.define([("x", (1.0, "m"))]).unwrap();
    assert_relative_eq!(p.scaled("x").unwrap(), 1.0);

    p.unit_add(UnitSpec::new("cubit", "cub", 0.5).dimension("length", 1).not_prefixable())
        .unwrap();
    p.set("x", (4.0, "cub")).unwrap();
    assert_relative_eq!(p.scaled("x").unwrap(), 2.0, max_relative = 1e-12);
}

#[test]
fn test_custom_dispenser_scaling() {
    let mut units = UnitDispenser::new();
    units
        .add(UnitSpec::new("pixel", "px", 1.0).dimension("length", 1))
        .unwrap();
    units
        .add(UnitSpec::new("tile", "tile", 16.0).dimension("length", 1).not_prefixable())
        .unwrap();

    let mut p = Parameters::with_dispenser(units, ParametersConfig::new()).unwrap();
    p.scale_dimension("length", (1.0, "tile")).unwrap();
    p.define([("w", (32.0, "px"))]).unwrap();
    assert_relative_eq!(p.scaled("w").unwrap(), 2.0, max_relative = 1e-12);
    assert!(p.scale_dimension("time", (1.0, "px")).is_err());
}
