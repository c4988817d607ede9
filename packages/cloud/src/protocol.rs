//! Request and response models for the remote table store
//!
//! Field names on the wire follow the store's own conventions
//! (`FieldName`, `orderBy`, `RecordIds`), so most of this module is serde
//! renames over plain Rust structs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single row as exchanged with the store: column name to value
pub type Record = Map<String, Value>;

/// Projection entry, serialized as `{"field": {"Name": "<column>"}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelector {
    pub field: FieldName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldName {
    #[serde(rename = "Name")]
    pub name: String,
}

impl FieldSelector {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            field: FieldName { name: name.into() },
        }
    }

    pub fn name(&self) -> &str {
        &self.field.name
    }
}

/// Filter operators understood by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    EqualTo,
    NotEqualTo,
    Contains,
    DoesNotContain,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
}

/// One filter clause. Clauses in a query are AND-combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereClause {
    #[serde(rename = "FieldName")]
    pub field_name: String,
    #[serde(rename = "Operator")]
    pub operator: Operator,
    #[serde(rename = "Values")]
    pub values: Vec<Value>,
}

impl WhereClause {
    pub fn new(field_name: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field_name: field_name.into(),
            operator,
            values: vec![value.into()],
        }
    }

    pub fn equal_to(field_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field_name, Operator::EqualTo, value)
    }

    pub fn contains(field_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field_name, Operator::Contains, value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortType {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    pub sorttype: SortType,
}

impl OrderBy {
    pub fn new(field_name: impl Into<String>, sorttype: SortType) -> Self {
        Self {
            field_name: field_name.into(),
            sorttype,
        }
    }

    pub fn asc(field_name: impl Into<String>) -> Self {
        Self::new(field_name, SortType::Asc)
    }

    pub fn desc(field_name: impl Into<String>) -> Self {
        Self::new(field_name, SortType::Desc)
    }
}

/// Parameters for fetch and get-by-id calls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSelector>,
    #[serde(rename = "where", default, skip_serializing_if = "Vec::is_empty")]
    pub where_clauses: Vec<WhereClause>,
    #[serde(rename = "orderBy", default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
}

impl QueryParams {
    /// Start a query projecting the given columns
    pub fn select<S: AsRef<str>>(fields: &[S]) -> Self {
        Self {
            fields: fields.iter().map(|f| FieldSelector::new(f.as_ref())).collect(),
            ..Self::default()
        }
    }

    pub fn filter(mut self, clause: WhereClause) -> Self {
        self.where_clauses.push(clause);
        self
    }

    pub fn filters(mut self, clauses: impl IntoIterator<Item = WhereClause>) -> Self {
        self.where_clauses.extend(clauses);
        self
    }

    pub fn order(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    /// Names of the projected columns, in request order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldSelector::name)
    }
}

/// Body of create and update calls. Update records must carry `Id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordsPayload {
    pub records: Vec<Record>,
}

impl RecordsPayload {
    pub fn single(record: Record) -> Self {
        Self {
            records: vec![record],
        }
    }
}

/// Body of delete calls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePayload {
    #[serde(rename = "RecordIds")]
    pub record_ids: Vec<i64>,
}

impl DeletePayload {
    pub fn single(id: i64) -> Self {
        Self {
            record_ids: vec![id],
        }
    }
}

/// Per-record outcome of a create, update or delete call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RecordResult {
    pub fn ok(data: Value) -> Self {
        Self {
            success: Some(true),
            message: None,
            data: Some(data),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            message: Some(message.into()),
            data: None,
        }
    }

    /// A missing flag counts as success
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(true)
    }
}

/// Envelope returned by every store call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<RecordResult>>,
}

impl RemoteResponse {
    /// Successful response with no body
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn with_data(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn with_results(results: Vec<RecordResult>) -> Self {
        let success = results.iter().all(RecordResult::is_success);
        let message = results
            .iter()
            .find(|r| !r.is_success())
            .and_then(|r| r.message.clone());
        Self {
            success,
            message,
            data: None,
            results: Some(results),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// The result row for single-record create/update calls
    pub fn first_result(&self) -> Option<&RecordResult> {
        self.results.as_ref().and_then(|r| r.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_query_params_wire_shape() {
        let params = QueryParams::select(&["Name", "status_c"])
            .filter(WhereClause::equal_to("project_id_c", 7))
            .order(OrderBy::asc("Name"));

        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "fields": [
                    {"field": {"Name": "Name"}},
                    {"field": {"Name": "status_c"}}
                ],
                "where": [
                    {"FieldName": "project_id_c", "Operator": "EqualTo", "Values": [7]}
                ],
                "orderBy": [
                    {"fieldName": "Name", "sorttype": "ASC"}
                ]
            })
        );
    }

    #[test]
    fn test_empty_where_and_order_are_omitted() {
        let params = QueryParams::select(&["Name"]);
        let value = serde_json::to_value(&params).unwrap();
        assert!(value.get("where").is_none());
        assert!(value.get("orderBy").is_none());
    }

    #[test]
    fn test_delete_payload_wire_shape() {
        assert_eq!(
            serde_json::to_value(DeletePayload::single(3)).unwrap(),
            json!({"RecordIds": [3]})
        );
    }

    #[test]
    fn test_response_parses_minimal_failure() {
        let response: RemoteResponse =
            serde_json::from_value(json!({"success": false, "message": "Table not found"})).unwrap();
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("Table not found"));
        assert!(response.first_result().is_none());
    }

    #[test]
    fn test_with_results_reports_first_failure() {
        let response = RemoteResponse::with_results(vec![
            RecordResult::ok(json!({"Id": 1})),
            RecordResult::failed("Name is required"),
        ]);
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("Name is required"));
        assert_eq!(response.first_result().unwrap().data, Some(json!({"Id": 1})));
    }
}
