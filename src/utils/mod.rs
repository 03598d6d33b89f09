//! Utility functions

pub mod validation;

pub use validation::{sanitize_string, validate_role, validate_username};
