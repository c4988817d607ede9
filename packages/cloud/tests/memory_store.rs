// ABOUTME: Integration tests for the in-memory record store
// ABOUTME: Tests id assignment, filtering, ordering, projection, and failure injection

use serde_json::{json, Value};
use taskdeck_cloud::{
    DeletePayload, MemoryRecordStore, OrderBy, QueryParams, Record, RecordStore, RecordsPayload,
    WhereClause,
};

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

async fn seeded_store() -> MemoryRecordStore {
    let store = MemoryRecordStore::new();
    store
        .seed(
            "task_c",
            vec![
                record(json!({"Name": "Write docs", "project_id_c": 1, "priority_c": "Low"})),
                record(json!({"Name": "Audit logs", "project_id_c": 2, "priority_c": "High"})),
                record(json!({"Name": "Fix build", "project_id_c": 1, "priority_c": "High"})),
            ],
        )
        .await;
    store
}

fn names(response: &taskdeck_cloud::RemoteResponse) -> Vec<String> {
    response
        .data
        .as_ref()
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .filter_map(|r| r.get("Name").and_then(Value::as_str).map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_fetch_filters_and_orders() {
    let store = seeded_store().await;
    let params = QueryParams::select(&["Name"])
        .filter(WhereClause::equal_to("project_id_c", 1))
        .order(OrderBy::asc("Name"));

    let response = store.fetch_records("task_c", &params).await.unwrap();

    assert!(response.success);
    assert_eq!(names(&response), vec!["Fix build", "Write docs"]);
}

#[tokio::test]
async fn test_fetch_descending_with_tiebreak() {
    let store = seeded_store().await;
    let params = QueryParams::select(&["Name"])
        .order(OrderBy::desc("priority_c"))
        .order(OrderBy::asc("Name"));

    let response = store.fetch_records("task_c", &params).await.unwrap();
    assert_eq!(names(&response), vec!["Write docs", "Audit logs", "Fix build"]);
}

#[tokio::test]
async fn test_projection_keeps_id_and_requested_fields() {
    let store = seeded_store().await;
    let response = store
        .fetch_records("task_c", &QueryParams::select(&["Name"]))
        .await
        .unwrap();

    let first = &response.data.unwrap()[0];
    assert!(first.get("Id").is_some());
    assert!(first.get("Name").is_some());
    assert!(first.get("priority_c").is_none());
}

#[tokio::test]
async fn test_fetch_unknown_table_is_empty() {
    let store = MemoryRecordStore::new();
    let response = store
        .fetch_records("nothing_c", &QueryParams::default())
        .await
        .unwrap();
    assert!(response.success);
    assert_eq!(response.data, Some(json!([])));
}

#[tokio::test]
async fn test_create_then_get_by_id() {
    let store = MemoryRecordStore::new();
    let created = store
        .create_record(
            "client_c",
            &RecordsPayload::single(record(json!({"Name": "Acme", "status_c": "Active"}))),
        )
        .await
        .unwrap();

    let row = created.first_result().and_then(|r| r.data.clone()).unwrap();
    let id = row["Id"].as_i64().unwrap();

    let fetched = store
        .get_record_by_id("client_c", id, &QueryParams::select(&["Name", "status_c"]))
        .await
        .unwrap();
    assert_eq!(fetched.data, Some(json!({"Id": id, "Name": "Acme", "status_c": "Active"})));
}

#[tokio::test]
async fn test_get_unknown_id_returns_null_data() {
    let store = seeded_store().await;
    let response = store
        .get_record_by_id("task_c", 999, &QueryParams::default())
        .await
        .unwrap();
    assert!(response.success);
    assert_eq!(response.data, Some(Value::Null));
}

#[tokio::test]
async fn test_update_merges_only_sent_fields() {
    let store = seeded_store().await;
    let response = store
        .update_record(
            "task_c",
            &RecordsPayload::single(record(json!({"Id": 1, "priority_c": "High"}))),
        )
        .await
        .unwrap();

    assert!(response.success);
    let row = response.first_result().and_then(|r| r.data.clone()).unwrap();
    assert_eq!(row["Name"], json!("Write docs"));
    assert_eq!(row["priority_c"], json!("High"));
}

#[tokio::test]
async fn test_update_unknown_id_reports_failure() {
    let store = seeded_store().await;
    let response = store
        .update_record("task_c", &RecordsPayload::single(record(json!({"Id": 77}))))
        .await
        .unwrap();

    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some("Record with Id 77 not found"));
}

#[tokio::test]
async fn test_delete_removes_row() {
    let store = seeded_store().await;
    let response = store
        .delete_record("task_c", &DeletePayload::single(2))
        .await
        .unwrap();
    assert!(response.success);
    assert_eq!(store.rows("task_c").await.len(), 2);

    let again = store
        .delete_record("task_c", &DeletePayload::single(2))
        .await
        .unwrap();
    assert!(!again.success);
}

#[tokio::test]
async fn test_fail_next_only_affects_one_call() {
    let store = seeded_store().await;
    store.fail_next("Service unavailable").await;

    let failed = store
        .fetch_records("task_c", &QueryParams::default())
        .await
        .unwrap();
    assert!(!failed.success);
    assert_eq!(failed.message.as_deref(), Some("Service unavailable"));

    let ok = store
        .fetch_records("task_c", &QueryParams::default())
        .await
        .unwrap();
    assert!(ok.success);
}
