//! Integration tests for units and scaling
//!
//! These tests exercise the unit registry and the scaling engine, directly and
//! through a parameter collection.


// Tests for the scaling engine
mod scaling_tests;
