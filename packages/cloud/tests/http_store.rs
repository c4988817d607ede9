// ABOUTME: Integration tests for the HTTP record store against a mock server
// ABOUTME: Covers request shape, credentials headers, and both failure channels

use pretty_assertions::assert_eq;
use serde_json::json;
use taskdeck_cloud::{
    CloudConfig, CloudError, DeletePayload, HttpRecordStore, OrderBy, QueryParams, RecordStore,
    RecordsPayload, WhereClause,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> HttpRecordStore {
    let mut config = CloudConfig::with_credentials("proj-1", "pk_test");
    config.api_url = server.uri();
    HttpRecordStore::new(config).unwrap()
}

#[tokio::test]
async fn test_fetch_records_sends_query_and_credentials() {
    let server = MockServer::start().await;
    let params = QueryParams::select(&["Name", "project_id_c"])
        .filter(WhereClause::equal_to("project_id_c", 4))
        .order(OrderBy::asc("Name"));

    Mock::given(method("POST"))
        .and(path("/api/v1/tables/task_c/records/query"))
        .and(header("apikey", "pk_test"))
        .and(header("X-Project-Id", "proj-1"))
        .and(header("Authorization", "Bearer pk_test"))
        .and(body_json(json!({
            "fields": [{"field": {"Name": "Name"}}, {"field": {"Name": "project_id_c"}}],
            "where": [{"FieldName": "project_id_c", "Operator": "EqualTo", "Values": [4]}],
            "orderBy": [{"fieldName": "Name", "sorttype": "ASC"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"Id": 1, "Name": "Write docs", "project_id_c": 4}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = store_for(&server).fetch_records("task_c", &params).await.unwrap();

    assert!(response.success);
    assert_eq!(
        response.data,
        Some(json!([{"Id": 1, "Name": "Write docs", "project_id_c": 4}]))
    );
}

#[tokio::test]
async fn test_get_record_by_id_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/tables/client_c/records/12/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"Id": 12, "Name": "Acme"}
        })))
        .mount(&server)
        .await;

    let response = store_for(&server)
        .get_record_by_id("client_c", 12, &QueryParams::select(&["Name"]))
        .await
        .unwrap();

    assert_eq!(response.data, Some(json!({"Id": 12, "Name": "Acme"})));
}

#[tokio::test]
async fn test_create_update_delete_verbs() {
    let server = MockServer::start().await;
    let records_path = "/api/v1/tables/project_c/records";

    Mock::given(method("POST"))
        .and(path(records_path))
        .and(body_json(json!({"records": [{"Name": "Apollo"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "results": [{"success": true, "data": {"Id": 5, "Name": "Apollo"}}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(records_path))
        .and(body_json(json!({"records": [{"Id": 5, "Name": "Artemis"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "results": [{"success": true, "data": {"Id": 5, "Name": "Artemis"}}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(records_path))
        .and(body_json(json!({"RecordIds": [5]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let store = store_for(&server);

    let mut record = taskdeck_cloud::Record::new();
    record.insert("Name".to_string(), json!("Apollo"));
    let created = store
        .create_record("project_c", &RecordsPayload::single(record))
        .await
        .unwrap();
    assert_eq!(
        created.first_result().and_then(|r| r.data.clone()),
        Some(json!({"Id": 5, "Name": "Apollo"}))
    );

    let mut patch = taskdeck_cloud::Record::new();
    patch.insert("Id".to_string(), json!(5));
    patch.insert("Name".to_string(), json!("Artemis"));
    let updated = store
        .update_record("project_c", &RecordsPayload::single(patch))
        .await
        .unwrap();
    assert!(updated.success);

    let deleted = store
        .delete_record("project_c", &DeletePayload::single(5))
        .await
        .unwrap();
    assert!(deleted.success);
}

#[tokio::test]
async fn test_protocol_failure_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/tables/issue_c/records/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Field title_x does not exist"
        })))
        .mount(&server)
        .await;

    let response = store_for(&server)
        .fetch_records("issue_c", &QueryParams::default())
        .await
        .unwrap();

    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some("Field title_x does not exist"));
}

#[tokio::test]
async fn test_http_error_surfaces_nested_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/tables/issue_c/records/query"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Public key revoked"}
        })))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .fetch_records("issue_c", &QueryParams::default())
        .await
        .unwrap_err();

    match err {
        CloudError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Public key revoked");
        }
        other => panic!("Expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_error_without_message_keeps_raw_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/tables/task_c/records"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway"))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .delete_record("task_c", &DeletePayload::single(1))
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::Http(ref body) if body.contains("Bad gateway")));
    assert!(err.remote_message().is_none());
}

#[tokio::test]
async fn test_garbled_success_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/tables/task_c/records/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .fetch_records("task_c", &QueryParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_missing_credentials_fail_at_call_time() {
    let server = MockServer::start().await;
    let mut config = CloudConfig::default();
    config.api_url = server.uri();

    // Building the handle succeeds
    let store = HttpRecordStore::new(config).unwrap();

    let err = store
        .fetch_records("task_c", &QueryParams::default())
        .await
        .unwrap_err();
    assert!(err.is_config_error());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let mut config = CloudConfig::with_credentials("p", "k");
    config.api_url = "http://127.0.0.1:1".to_string();
    config.connect_timeout_secs = 1;
    config.request_timeout_secs = 2;
    let store = HttpRecordStore::new(config).unwrap();

    let err = store
        .fetch_records("task_c", &QueryParams::default())
        .await
        .unwrap_err();
    assert!(err.is_network_error());
}
