// ABOUTME: Core types, traits, and utilities for Taskdeck
// ABOUTME: Foundational package providing coercion and time helpers shared across all packages

pub mod coerce;
pub mod constants;
pub mod utils;

// Re-export constants
pub use constants::{default_config_file, taskdeck_dir, ID_FIELD, NAME_FIELD};

// Re-export coercion helpers
pub use coerce::{parse_float, parse_int};

// Re-export utilities
pub use utils::{contains_ignore_case, iso_timestamp, local_date_label, local_datetime_label, truncate};
