//! Field rules: patterns, cleaners and validators.

pub mod clean;
pub mod inn_guard;
pub mod patterns;
pub mod validate;

pub use clean::clean_value;
pub use patterns::{patterns_for, Matcher, PATTERN_LIBRARY_VERSION};
pub use validate::validate_value;
