// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Taskdeck

// Remote store credentials
pub const TASKDECK_PROJECT_ID: &str = "TASKDECK_PROJECT_ID";
pub const TASKDECK_PUBLIC_KEY: &str = "TASKDECK_PUBLIC_KEY";

// Remote store endpoint
pub const TASKDECK_API_URL: &str = "TASKDECK_API_URL";

// HTTP client tuning
pub const TASKDECK_HTTP_REQUEST_TIMEOUT_SECS: &str = "TASKDECK_HTTP_REQUEST_TIMEOUT_SECS";
pub const TASKDECK_HTTP_CONNECT_TIMEOUT_SECS: &str = "TASKDECK_HTTP_CONNECT_TIMEOUT_SECS";

// Config file override
pub const TASKDECK_CONFIG_PATH: &str = "TASKDECK_CONFIG_PATH";
