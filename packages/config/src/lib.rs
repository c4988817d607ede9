// ABOUTME: Configuration and environment variable management for Taskdeck
// ABOUTME: Exposes variable name constants and typed lookups over an injectable source

pub mod constants;
pub mod env;

pub use env::{lookup, lookup_parsed, process_env};
