//! End-to-end integration tests

pub mod output_tests;
