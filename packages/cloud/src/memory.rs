//! In-process implementation of the record store protocol
//!
//! Behaves like the hosted store for everything this workspace relies on:
//! server-assigned ids, AND-combined filters, ordering, projection, and
//! per-record results. Used by tests and by the CLI's offline mode.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::Mutex;

use taskdeck_core::{parse_float, parse_int, ID_FIELD};

use crate::error::CloudResult;
use crate::protocol::{
    DeletePayload, Operator, QueryParams, Record, RecordResult, RecordsPayload, RemoteResponse,
    SortType, WhereClause,
};
use crate::store::RecordStore;

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<String, Vec<Record>>,
    last_id: i64,
    pending_failure: Option<String>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    state: Mutex<MemoryState>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert rows directly, assigning ids to rows that lack one.
    /// Returns the ids in insertion order.
    pub async fn seed(&self, table: &str, rows: Vec<Record>) -> Vec<i64> {
        let mut state = self.state.lock().await;
        let mut ids = Vec::with_capacity(rows.len());
        for mut row in rows {
            let id = match row.get(ID_FIELD).and_then(parse_int) {
                Some(id) => {
                    state.last_id = state.last_id.max(id);
                    id
                }
                None => state.next_id(),
            };
            row.insert(ID_FIELD.to_string(), Value::from(id));
            state.tables.entry(table.to_string()).or_default().push(row);
            ids.push(id);
        }
        ids
    }

    /// Make the next call answer `success: false` with `message`
    pub async fn fail_next(&self, message: impl Into<String>) {
        self.state.lock().await.pending_failure = Some(message.into());
    }

    /// Raw stored rows, unprojected
    pub async fn rows(&self, table: &str) -> Vec<Record> {
        self.state
            .lock()
            .await
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

fn row_id(row: &Record) -> Option<i64> {
    row.get(ID_FIELD).and_then(parse_int)
}

/// Compare the way the store does: numbers numerically (numeric strings
/// included), everything else by its string form, nulls first.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => as_text(a).cmp(&as_text(b)),
        },
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Object(map) => map.get(ID_FIELD).and_then(parse_float),
        _ => None,
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        _ => compare_values(a, b) == Ordering::Equal,
    }
}

fn matches_clause(row: &Record, clause: &WhereClause) -> bool {
    let actual = row.get(&clause.field_name).unwrap_or(&Value::Null);
    let contains = |needle: &Value| {
        as_text(actual)
            .to_lowercase()
            .contains(&as_text(needle).to_lowercase())
    };
    let first = clause.values.first().unwrap_or(&Value::Null);

    match clause.operator {
        Operator::EqualTo => clause.values.iter().any(|v| loose_eq(actual, v)),
        Operator::NotEqualTo => !clause.values.iter().any(|v| loose_eq(actual, v)),
        Operator::Contains => !actual.is_null() && clause.values.iter().any(contains),
        Operator::DoesNotContain => actual.is_null() || !clause.values.iter().any(contains),
        Operator::GreaterThan => compare_values(actual, first) == Ordering::Greater,
        Operator::GreaterThanOrEqualTo => compare_values(actual, first) != Ordering::Less,
        Operator::LessThan => !actual.is_null() && compare_values(actual, first) == Ordering::Less,
        Operator::LessThanOrEqualTo => {
            !actual.is_null() && compare_values(actual, first) != Ordering::Greater
        }
    }
}

/// Keep `Id` plus the requested columns; an empty projection keeps everything
fn project(row: &Record, params: &QueryParams) -> Record {
    if params.fields.is_empty() {
        return row.clone();
    }
    let mut projected = Record::new();
    if let Some(id) = row.get(ID_FIELD) {
        projected.insert(ID_FIELD.to_string(), id.clone());
    }
    for name in params.field_names() {
        if let Some(value) = row.get(name) {
            projected.insert(name.to_string(), value.clone());
        }
    }
    projected
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn fetch_records(&self, table: &str, params: &QueryParams) -> CloudResult<RemoteResponse> {
        let mut state = self.state.lock().await;
        if let Some(message) = state.pending_failure.take() {
            return Ok(RemoteResponse::failure(message));
        }

        let mut rows: Vec<&Record> = state
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| params.where_clauses.iter().all(|c| matches_clause(row, c)))
                    .collect()
            })
            .unwrap_or_default();

        rows.sort_by(|a, b| {
            params
                .order_by
                .iter()
                .map(|order| {
                    let left = a.get(&order.field_name).unwrap_or(&Value::Null);
                    let right = b.get(&order.field_name).unwrap_or(&Value::Null);
                    match order.sorttype {
                        SortType::Asc => compare_values(left, right),
                        SortType::Desc => compare_values(right, left),
                    }
                })
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        let data = rows
            .into_iter()
            .map(|row| Value::Object(project(row, params)))
            .collect::<Vec<_>>();
        Ok(RemoteResponse::with_data(Value::Array(data)))
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        params: &QueryParams,
    ) -> CloudResult<RemoteResponse> {
        let mut state = self.state.lock().await;
        if let Some(message) = state.pending_failure.take() {
            return Ok(RemoteResponse::failure(message));
        }

        let found = state
            .tables
            .get(table)
            .and_then(|rows| rows.iter().find(|row| row_id(row) == Some(id)))
            .map(|row| Value::Object(project(row, params)));

        Ok(RemoteResponse::with_data(found.unwrap_or(Value::Null)))
    }

    async fn create_record(&self, table: &str, payload: &RecordsPayload) -> CloudResult<RemoteResponse> {
        let mut state = self.state.lock().await;
        if let Some(message) = state.pending_failure.take() {
            return Ok(RemoteResponse::failure(message));
        }

        let mut results = Vec::with_capacity(payload.records.len());
        for record in &payload.records {
            let id = state.next_id();
            let mut row = record.clone();
            row.insert(ID_FIELD.to_string(), Value::from(id));
            state
                .tables
                .entry(table.to_string())
                .or_default()
                .push(row.clone());
            results.push(RecordResult::ok(Value::Object(row)));
        }

        Ok(RemoteResponse::with_results(results))
    }

    async fn update_record(&self, table: &str, payload: &RecordsPayload) -> CloudResult<RemoteResponse> {
        let mut state = self.state.lock().await;
        if let Some(message) = state.pending_failure.take() {
            return Ok(RemoteResponse::failure(message));
        }

        let rows = state.tables.entry(table.to_string()).or_default();
        let results = payload
            .records
            .iter()
            .map(|record| {
                let Some(id) = row_id(record) else {
                    return RecordResult::failed("Update records must include an Id");
                };
                match rows.iter_mut().find(|row| row_id(row) == Some(id)) {
                    Some(row) => {
                        for (key, value) in record {
                            if key != ID_FIELD {
                                row.insert(key.clone(), value.clone());
                            }
                        }
                        RecordResult::ok(Value::Object(row.clone()))
                    }
                    None => RecordResult::failed(format!("Record with Id {} not found", id)),
                }
            })
            .collect();

        Ok(RemoteResponse::with_results(results))
    }

    async fn delete_record(&self, table: &str, payload: &DeletePayload) -> CloudResult<RemoteResponse> {
        let mut state = self.state.lock().await;
        if let Some(message) = state.pending_failure.take() {
            return Ok(RemoteResponse::failure(message));
        }

        let rows = state.tables.entry(table.to_string()).or_default();
        let results = payload
            .record_ids
            .iter()
            .map(|&id| match rows.iter().position(|row| row_id(row) == Some(id)) {
                Some(index) => {
                    rows.remove(index);
                    RecordResult {
                        success: Some(true),
                        ..RecordResult::default()
                    }
                }
                None => RecordResult::failed(format!("Record with Id {} not found", id)),
            })
            .collect();

        Ok(RemoteResponse::with_results(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_compare_values() {
        assert_eq!(compare_values(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(compare_values(&json!("2"), &json!(10)), Ordering::Less);
        assert_eq!(compare_values(&json!("apple"), &json!("banana")), Ordering::Less);
        assert_eq!(compare_values(&json!(null), &json!("a")), Ordering::Less);
        assert_eq!(compare_values(&json!({"Id": 3}), &json!(3)), Ordering::Equal);
    }

    #[test]
    fn test_matches_clause_operators() {
        let row = record(json!({"title_c": "Login button broken", "priority_c": 3}));

        assert!(matches_clause(&row, &WhereClause::contains("title_c", "BUTTON")));
        assert!(!matches_clause(&row, &WhereClause::contains("missing_c", "x")));
        assert!(matches_clause(&row, &WhereClause::equal_to("priority_c", "3")));
        assert!(matches_clause(
            &row,
            &WhereClause::new("priority_c", Operator::GreaterThan, 2)
        ));
        assert!(matches_clause(
            &row,
            &WhereClause::new("title_c", Operator::DoesNotContain, "crash")
        ));
        assert!(!matches_clause(
            &row,
            &WhereClause::new("priority_c", Operator::NotEqualTo, 3)
        ));
    }

    #[tokio::test]
    async fn test_seed_keeps_explicit_ids() {
        let store = MemoryRecordStore::new();
        let ids = store
            .seed("t", vec![record(json!({"Id": 10})), record(json!({"Name": "x"}))])
            .await;
        assert_eq!(ids, vec![10, 11]);
    }
}
