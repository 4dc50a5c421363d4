//! Tests for the Expression parsing and evaluation

use approx::assert_relative_eq;
use scaled_params::parameters::expression::{EvaluationContext, Expression, ExpressionError};
use scaled_params::parameters::{ParameterError, Parameters, ParametersConfig, Value};
use std::collections::HashMap;

fn context(values: &[(&str, f64)]) -> HashMap<String, f64> {
    values
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

#[test]
fn test_expression_parsing() {
    assert!(Expression::parse("42").unwrap().variables().is_empty());
    assert_eq!(Expression::parse("x").unwrap().variables(), vec!["x"]);
    assert_eq!(Expression::parse("x + y").unwrap().variables(), vec!["x", "y"]);
    assert_eq!(Expression::parse("_x * x").unwrap().variables(), vec!["_x", "x"]);
    assert_eq!(
        Expression::parse("(x + y) * (z - 1) / w").unwrap().variables().len(),
        4
    );
    assert_eq!(Expression::parse("max(a, b, c)").unwrap().variables().len(), 3);
    assert!(Expression::parse(" x + y ").is_ok());
    assert!(Expression::parse("x +").is_err());
    assert!(Expression::parse("(x").is_err());
}

#[test]
fn test_expression_evaluation() {
    let vars = context(&[("x", 2.0), ("y", 3.0)]);
    let eval = |source: &str| Expression::parse(source).unwrap().evaluate(&vars).unwrap();

    assert_relative_eq!(eval("x + y"), 5.0);
    assert_relative_eq!(eval("x ** 3"), 8.0);
    assert_relative_eq!(eval("x ^ 3"), 8.0);
    assert_relative_eq!(eval("2 ^ 3 ^ 2"), 512.0);
    assert_relative_eq!(eval("-x ^ 2"), -4.0);
    assert_relative_eq!(eval("10 - 4 - 3"), 3.0);
    assert_relative_eq!(eval("sqrt(x * 8)"), 4.0);
    assert_relative_eq!(eval("min(x, y, 1)"), 1.0);
    assert_relative_eq!(eval("1e-3 * y"), 3e-3);
}

#[test]
fn test_expression_errors() {
    let vars = context(&[("x", 0.0)]);
    let err = Expression::parse("1 / x").unwrap().evaluate(&vars).unwrap_err();
    assert_eq!(err, ExpressionError::DivisionByZero);

    let err = Expression::parse("q + 1").unwrap().evaluate(&vars).unwrap_err();
    assert!(matches!(err, ExpressionError::UndefinedVariable { .. }));

    let err = Expression::parse("frobnicate(x)").unwrap().evaluate(&vars).unwrap_err();
    assert!(matches!(err, ExpressionError::UndefinedFunction { .. }));

    assert!(vars.has_variable("x"));
}

#[test]
fn test_symbolic_queries() {
    let mut p = Parameters::new();
    p.define([("x", 1.0), ("y", 2.0)]).unwrap();

    assert_eq!(p.get("x^2 + y^2").unwrap(), Value::Scaled(5.0));
    assert!(p
        .get("_x^2 + _y^2")
        .unwrap_err()
        .to_string()
        .contains("scaled"));
}

#[test]
fn test_symbolic_queries_with_alternate_views() {
    let config = ParametersConfig::new().with_default_scaled(false);
    let mut p = Parameters::with_config(config).unwrap();
    p.define([("x", 1.0), ("y", 2.0)]).unwrap();

    assert_eq!(p.get("_x^2 + _y^2").unwrap(), Value::Scaled(5.0));
    assert!(matches!(
        p.get("x + y"),
        Err(ParameterError::Expression(ExpressionError::InvalidOperation { .. }))
    ));
}

#[test]
fn test_symbolic_query_with_unknown_symbol() {
    let p = Parameters::new();
    assert!(matches!(
        p.get("unknown * 2"),
        Err(ParameterError::NotFound { .. })
    ));
    assert!(matches!(p.get("unknown"), Err(ParameterError::NotFound { .. })));
}
