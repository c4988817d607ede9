// ABOUTME: Generic CRUD component shared by every resource facade
// ABOUTME: Issues store calls for one table and normalizes both failure channels

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use taskdeck_cloud::{
    DeletePayload, OrderBy, QueryParams, RecordStore, RecordsPayload, RemoteResponse, WhereClause,
};
use taskdeck_core::ID_FIELD;

use crate::error::{ServiceError, ServiceResult};
use crate::mapper::{from_legacy, record_id};
use crate::schema::{IntoRecord, Resource, TableSchema};

/// CRUD operations over the table described by `R::SCHEMA`
pub struct ResourceService<R> {
    store: Arc<dyn RecordStore>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            _resource: PhantomData,
        }
    }

    pub fn schema(&self) -> TableSchema {
        R::SCHEMA
    }

    /// Every row, with the table's projection and default order
    pub async fn get_all(&self) -> ServiceResult<Vec<R>> {
        self.fetch(R::SCHEMA.list_query()).await
    }

    /// Run an arbitrary query against this table
    pub async fn fetch(&self, params: QueryParams) -> ServiceResult<Vec<R>> {
        let schema = R::SCHEMA;
        debug!(
            "Fetching {} rows from {} ({} filters)",
            schema.entity,
            schema.table,
            params.where_clauses.len()
        );

        let response = self.store.fetch_records(schema.table, &params).await?;
        let data = ensure_success(response)?.data;
        decode_rows(schema.entity, data)
    }

    /// Filtered fetch using the table's projection
    pub async fn fetch_where(
        &self,
        clauses: Vec<WhereClause>,
        order: Option<OrderBy>,
    ) -> ServiceResult<Vec<R>> {
        let mut params = R::SCHEMA.query().filters(clauses);
        if let Some(order) = order {
            params = params.order(order);
        }
        self.fetch(params).await
    }

    /// `Ok(None)` when the store has no row with this id
    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Option<R>> {
        let schema = R::SCHEMA;
        debug!("Fetching {} {}", schema.entity, id);

        let response = self
            .store
            .get_record_by_id(schema.table, id, &schema.query())
            .await?;
        match ensure_success(response)?.data {
            None | Some(Value::Null) => Ok(None),
            Some(row) => decode_row(schema.entity, row).map(Some),
        }
    }

    pub async fn create(&self, draft: R::Draft) -> ServiceResult<R> {
        let schema = R::SCHEMA;
        let payload = RecordsPayload::single(draft.into_record(Utc::now()));
        debug!("Creating {} in {}", schema.entity, schema.table);

        let response = self.store.create_record(schema.table, &payload).await?;
        let row: R = first_row(schema.entity, response)?;
        debug!("Created {} {}", schema.entity, row.id());
        Ok(row)
    }

    /// Partial update; only fields present in `patch` are sent
    pub async fn update(&self, id: i64, patch: R::Patch) -> ServiceResult<R> {
        let schema = R::SCHEMA;
        let mut record = patch.into_record(Utc::now());
        record.insert(ID_FIELD.to_string(), Value::from(id));
        debug!("Updating {} {} ({} fields)", schema.entity, id, record.len() - 1);

        let response = self
            .store
            .update_record(schema.table, &RecordsPayload::single(record))
            .await?;
        let row: R = first_row(schema.entity, response)?;
        if row.id() != id {
            warn!("Update of {} {} echoed row {}", schema.entity, id, row.id());
        }
        Ok(row)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let schema = R::SCHEMA;
        debug!("Deleting {} {}", schema.entity, id);

        let response = self
            .store
            .delete_record(schema.table, &DeletePayload::single(id))
            .await?;
        ensure_success(response).map(|_| ())
    }

    /// Same as [`delete`](Self::delete)
    pub async fn remove(&self, id: i64) -> ServiceResult<()> {
        self.delete(id).await
    }

    /// Create from loosely typed input using either field naming
    pub async fn create_legacy(&self, input: Value) -> ServiceResult<R> {
        let draft = from_legacy::<R::Draft>(input, R::ALIASES)?;
        self.create(draft).await
    }

    /// Update from loosely typed input; `id` may be a number or numeric string
    pub async fn update_legacy(&self, id: &Value, input: Value) -> ServiceResult<R> {
        let id = record_id(id)?;
        let patch = from_legacy::<R::Patch>(input, R::ALIASES)?;
        self.update(id, patch).await
    }
}

fn ensure_success(response: RemoteResponse) -> ServiceResult<RemoteResponse> {
    if response.success {
        Ok(response)
    } else {
        Err(ServiceError::remote(response.message))
    }
}

fn decode_row<T: DeserializeOwned>(entity: &'static str, row: Value) -> ServiceResult<T> {
    serde_json::from_value(row).map_err(|source| ServiceError::Decode { entity, source })
}

fn decode_rows<T: DeserializeOwned>(
    entity: &'static str,
    data: Option<Value>,
) -> ServiceResult<Vec<T>> {
    match data {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(rows) => decode_row(entity, rows),
    }
}

/// Extract `results[0].data` from a create or update response
fn first_row<T: DeserializeOwned>(
    entity: &'static str,
    response: RemoteResponse,
) -> ServiceResult<T> {
    let response = ensure_success(response)?;
    let Some(result) = response.first_result() else {
        warn!("Store accepted the {} write but returned no results", entity);
        return Err(ServiceError::MissingResult(entity));
    };
    if !result.is_success() {
        return Err(ServiceError::remote(result.message.clone()));
    }
    match result.data.clone() {
        None | Some(Value::Null) => Err(ServiceError::MissingResult(entity)),
        Some(row) => decode_row(entity, row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use taskdeck_cloud::RecordResult;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        #[serde(rename = "Id")]
        id: i64,
    }

    #[test]
    fn test_first_row_requires_data() {
        let response = RemoteResponse::with_results(vec![RecordResult {
            success: Some(true),
            message: None,
            data: None,
        }]);
        let result: ServiceResult<Row> = first_row("row", response);
        assert!(matches!(result, Err(ServiceError::MissingResult("row"))));
    }

    #[test]
    fn test_first_row_reports_record_failure() {
        let response = RemoteResponse::with_results(vec![RecordResult::failed("Name is required")]);
        let err = first_row::<Row>("row", response).unwrap_err();
        assert_eq!(err.diagnostic(), "Name is required");
    }

    #[test]
    fn test_first_row_decodes() {
        let response = RemoteResponse::with_results(vec![RecordResult::ok(json!({"Id": 3}))]);
        assert_eq!(first_row::<Row>("row", response).unwrap(), Row { id: 3 });
    }

    #[test]
    fn test_decode_rows_treats_missing_data_as_empty() {
        assert!(decode_rows::<Row>("row", None).unwrap().is_empty());
        assert!(decode_rows::<Row>("row", Some(Value::Null)).unwrap().is_empty());

        let err = decode_rows::<Row>("row", Some(json!([{"Id": "x"}]))).unwrap_err();
        assert!(matches!(err, ServiceError::Decode { entity: "row", .. }));
    }

    #[test]
    fn test_ensure_success() {
        let err = ensure_success(RemoteResponse::failure("quota exceeded")).unwrap_err();
        assert!(err.is_remote_failure());
        assert_eq!(err.to_string(), "quota exceeded");
    }
}
