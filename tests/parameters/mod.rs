//! Integration tests for the parameter system
//!
//! These tests verify that the parameter system behaves correctly in various scenarios.

// Tests for the Parameters collection
mod parameters_tests;

// Tests for parameter functions and views
mod function_tests;

// Tests for symbolic expressions
mod expression_tests;

// Tests for JSON profiles
mod profile_tests;
