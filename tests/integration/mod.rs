//! Integration tests for the scaled-params library
//!
//! This module organizes all integration tests that test the library as a whole,
//! rather than individual components.


// End-to-end scenarios mixing units, scalings and functions
pub mod scenarios;
