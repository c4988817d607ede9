//! Taskdeck Cloud Package
//!
//! Client side of the hosted table store: request/response models, the
//! `RecordStore` abstraction, an HTTP implementation, an in-memory
//! implementation, and configuration loading.

pub mod config;
pub mod error;
pub mod factory;
pub mod http;
pub mod memory;
pub mod protocol;
pub mod store;

// Re-export commonly used types and traits
pub use config::{CloudConfig, CloudConfigBuilder};
pub use error::{CloudError, CloudResult};
pub use factory::CloudClientFactory;
pub use http::HttpRecordStore;
pub use memory::MemoryRecordStore;
pub use protocol::{
    DeletePayload, FieldSelector, Operator, OrderBy, QueryParams, Record, RecordResult,
    RecordsPayload, RemoteResponse, SortType, WhereClause,
};
pub use store::RecordStore;

/// Version segment of the remote store's REST paths
pub const CLOUD_API_VERSION: &str = "v1";
