// ABOUTME: Shared plumbing for the taskdeck binary
// ABOUTME: Logging setup and construction of the facade set for online or offline use

pub mod context;
pub mod logging;

pub use context::{build_services, demo_store, StoreMode};
pub use logging::init_logging;
