//! Parser integration tests organized by log type
//!
//! Each log type has its own test module covering:
//! - Section recognition
//! - Extraction of every record field
//! - Edge cases and error handling

pub mod gluing_tests;
