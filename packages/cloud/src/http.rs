use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::CloudConfig;
use crate::error::{CloudError, CloudResult};
use crate::protocol::{DeletePayload, QueryParams, RecordsPayload, RemoteResponse};
use crate::store::RecordStore;
use crate::CLOUD_API_VERSION;

/// Header carrying the public key
const API_KEY_HEADER: &str = "apikey";

/// Header carrying the backend project identifier
const PROJECT_ID_HEADER: &str = "X-Project-Id";

/// HTTP implementation of [`RecordStore`]
#[derive(Clone)]
pub struct HttpRecordStore {
    http_client: Client,
    config: CloudConfig,
}

impl HttpRecordStore {
    /// Create a store handle. No request is made until a method is called.
    pub fn new(config: CloudConfig) -> CloudResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    fn records_url(&self, table: &str) -> String {
        format!(
            "{}/api/{}/tables/{}/records",
            self.config.api_url.trim_end_matches('/'),
            CLOUD_API_VERSION,
            table
        )
    }

    /// Attach credentials, failing if they were never configured
    fn authorized(&self, builder: RequestBuilder) -> CloudResult<RequestBuilder> {
        if !self.config.has_credentials() {
            return Err(CloudError::config(
                "Project ID and public key must be set before calling the remote store",
            ));
        }

        Ok(builder
            .header(API_KEY_HEADER, &self.config.public_key)
            .header(PROJECT_ID_HEADER, &self.config.project_id)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.config.public_key)))
    }

    async fn send(&self, builder: RequestBuilder) -> CloudResult<RemoteResponse> {
        let response = self.authorized(builder)?.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str::<RemoteResponse>(&body)
                .map_err(|e| CloudError::InvalidResponse(e.to_string()));
        }

        match extract_error_message(&body) {
            Some(message) => Err(CloudError::api(status.as_u16(), message)),
            None if body.trim().is_empty() => Err(CloudError::Http(status.to_string())),
            None => Err(CloudError::Http(format!("{}: {}", status, body.trim()))),
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"message": …}`, `{"error": {"message": …}}` and
/// `{"data": {"message": …}}`.
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["/message", "/error/message", "/data/message"]
        .iter()
        .find_map(|pointer| value.pointer(pointer).and_then(Value::as_str))
        .map(str::to_string)
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn fetch_records(&self, table: &str, params: &QueryParams) -> CloudResult<RemoteResponse> {
        let url = format!("{}/query", self.records_url(table));
        debug!("Fetching records from {}", table);
        self.send(self.http_client.post(&url).json(params)).await
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        params: &QueryParams,
    ) -> CloudResult<RemoteResponse> {
        let url = format!("{}/{}/query", self.records_url(table), id);
        debug!("Fetching record {} from {}", id, table);
        self.send(self.http_client.post(&url).json(params)).await
    }

    async fn create_record(&self, table: &str, payload: &RecordsPayload) -> CloudResult<RemoteResponse> {
        debug!("Creating {} record(s) in {}", payload.records.len(), table);
        self.send(self.http_client.post(self.records_url(table)).json(payload))
            .await
    }

    async fn update_record(&self, table: &str, payload: &RecordsPayload) -> CloudResult<RemoteResponse> {
        debug!("Updating {} record(s) in {}", payload.records.len(), table);
        self.send(self.http_client.put(self.records_url(table)).json(payload))
            .await
    }

    async fn delete_record(&self, table: &str, payload: &DeletePayload) -> CloudResult<RemoteResponse> {
        debug!("Deleting records {:?} from {}", payload.record_ids, table);
        self.send(self.http_client.delete(self.records_url(table)).json(payload))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_shapes() {
        assert_eq!(
            extract_error_message(r#"{"message": "Invalid key"}"#).as_deref(),
            Some("Invalid key")
        );
        assert_eq!(
            extract_error_message(r#"{"error": {"message": "Rate limited"}}"#).as_deref(),
            Some("Rate limited")
        );
        assert_eq!(
            extract_error_message(r#"{"data": {"message": "Bad field"}}"#).as_deref(),
            Some("Bad field")
        );
        assert_eq!(extract_error_message("<html>502</html>"), None);
        assert_eq!(extract_error_message(r#"{"status": 500}"#), None);
    }

    #[test]
    fn test_records_url_trims_trailing_slash() {
        let mut config = CloudConfig::with_credentials("p", "k");
        config.api_url = "http://localhost:9000/".to_string();
        let store = HttpRecordStore::new(config).unwrap();
        assert_eq!(
            store.records_url("task_c"),
            "http://localhost:9000/api/v1/tables/task_c/records"
        );
    }
}
