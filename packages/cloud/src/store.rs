//! The record store abstraction every facade talks to

use async_trait::async_trait;

use crate::error::CloudResult;
use crate::protocol::{DeletePayload, QueryParams, RecordsPayload, RemoteResponse};

/// Table-oriented access to the remote store.
///
/// `Err` means the call itself failed (network, configuration, garbled
/// body). A call that reached the store and was rejected comes back as
/// `Ok` with `success: false`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch rows matching `params` from `table`
    async fn fetch_records(&self, table: &str, params: &QueryParams) -> CloudResult<RemoteResponse>;

    /// Fetch a single row; `data` is `null` when the id is unknown
    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        params: &QueryParams,
    ) -> CloudResult<RemoteResponse>;

    /// Insert rows; created rows are echoed in `results[i].data`
    async fn create_record(&self, table: &str, payload: &RecordsPayload) -> CloudResult<RemoteResponse>;

    /// Patch rows by `Id`; updated rows are echoed in `results[i].data`
    async fn update_record(&self, table: &str, payload: &RecordsPayload) -> CloudResult<RemoteResponse>;

    /// Hard-delete rows by id
    async fn delete_record(&self, table: &str, payload: &DeletePayload) -> CloudResult<RemoteResponse>;
}
