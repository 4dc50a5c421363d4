//! Tests for saving and loading parameter profiles

use approx::assert_relative_eq;
use scaled_params::parameters::{
    Bounds, ParameterError, Parameters, ParametersConfig, Profile, SerializationError,
};
use scaled_params::units::{Dimensions, UnitSpec};
use tempfile::tempdir;

#[test]
fn test_save_and_load_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("parameters.json");

    let mut params = Parameters::with_config(ParametersConfig::new().with_default_scaled(false)).unwrap();
    params
        .unit_add(UnitSpec::new("TestUnit", "TU", 1e7).dimension("length", 1).dimension("mass", 1))
        .unwrap();
    params.scale_dimension("time", (1.0, "ms")).unwrap();
    params
        .add_unit_scaling(Dimensions::new().with("length", 1).with("time", -1), 3.0)
        .unwrap();
    params.define([("t", (5.0, "ms")), ("v", (2.0, "m/s"))]).unwrap();
    params.define([("w", (1.0, "TU"))]).unwrap();
    params.define([("twice", ("_t * 2", "ms"))]).unwrap();
    params.set_bounds("t", [Bounds::new(0.0, 10.0).unwrap()]).unwrap();
    params.save_json(&path).unwrap();

    let loaded = Parameters::load_json(&path).unwrap();
    assert!(!loaded.config().default_scaled);
    assert!(loaded.units().has("TU"));
    assert_eq!(loaded.names(), params.names());
    assert_relative_eq!(loaded.scaled("t").unwrap(), 5.0, max_relative = 1e-12);
    assert_relative_eq!(
        loaded.scaled("v").unwrap(),
        params.scaled("v").unwrap(),
        max_relative = 1e-12
    );
    assert_relative_eq!(loaded.scaled("twice").unwrap(), 10.0, max_relative = 1e-12);
    assert_eq!(loaded.bounds("t"), params.bounds("t"));
    assert_eq!(loaded.unit_scalings(), params.unit_scalings());
}

#[test]
fn test_handwritten_profile() {
    let json = r#"{
        "dimension_scalings": {"length": [1.0, "nm"]},
        "units": {"x": "nm"},
        "parameters": {
            "x": 3.0,
            "y": [2.0, "nm"],
            "area": {"expression": "x * y", "unit": "nm^2"},
            "half": "x / 2"
        },
        "bounds": {"x": [[0.0, null]]}
    }"#;

    let params = Parameters::from_json(json).unwrap();
    assert_relative_eq!(params.quantity("x").unwrap().value(), 3.0, max_relative = 1e-12);
    assert_relative_eq!(params.scaled("area").unwrap(), 6.0, max_relative = 1e-12);
    assert_relative_eq!(params.scaled("half").unwrap(), 1.5, max_relative = 1e-12);
    assert_eq!(params.bounds("x"), &[Bounds::min_only(0.0)]);
}

#[test]
fn test_malformed_profiles() {
    let err = Parameters::from_json(r#"{"parameters": {"x": [1.0, "m", 2.0]}}"#).unwrap_err();
    assert!(matches!(
        err,
        SerializationError::Parameter(ParameterError::MalformedQuantity { .. })
    ));

    let err = Parameters::from_json(r#"{"parameters": {"bad name": 1.0}}"#).unwrap_err();
    assert!(matches!(
        err,
        SerializationError::Parameter(ParameterError::InvalidIdentifier { .. })
    ));

    assert!(matches!(
        Parameters::from_json("not json").unwrap_err(),
        SerializationError::JsonError(_)
    ));
    assert!(matches!(
        Parameters::load_json("/nonexistent/parameters.json").unwrap_err(),
        SerializationError::IoError(_)
    ));
}

#[test]
fn test_empty_profile() {
    let params = Parameters::from_profile(Profile::default()).unwrap();
    assert!(params.is_empty());
    assert_eq!(params.to_profile(), Profile::default());
}
