use std::sync::Arc;

use crate::config::CloudConfig;
use crate::error::CloudResult;
use crate::http::HttpRecordStore;
use crate::store::RecordStore;

/// Produces configured store handles from explicit configuration.
///
/// Building a handle performs no I/O and no credential checks; a missing
/// project id or key is reported by the first call made through it.
#[derive(Debug, Clone, Default)]
pub struct CloudClientFactory {
    config: CloudConfig,
}

impl CloudClientFactory {
    pub fn new(config: CloudConfig) -> Self {
        Self { config }
    }

    /// Factory configured from `TASKDECK_*` environment variables
    pub fn from_env() -> Self {
        Self::new(CloudConfig::from_env())
    }

    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    /// Build a concrete HTTP store handle
    pub fn build(&self) -> CloudResult<HttpRecordStore> {
        HttpRecordStore::new(self.config.clone())
    }

    /// Build a handle ready to be shared between facades
    pub fn shared(&self) -> CloudResult<Arc<dyn RecordStore>> {
        Ok(Arc::new(self.build()?))
    }
}
