// ABOUTME: Time entry records and the time entry facade
// ABOUTME: CRUD over time_entry_c with per-project and per-task listings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskdeck_cloud::{OrderBy, Record, SortType, WhereClause};
use taskdeck_core::coerce::{opt_float, opt_int, opt_lookup_id};
use taskdeck_core::{local_date_label, NAME_FIELD};

use crate::error::ServiceResult;
use crate::mapper::FieldAlias;
use crate::schema::{IntoRecord, RecordBuilder, Resource, TableSchema};
use crate::service::ResourceService;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "description_c", default)]
    pub description: Option<String>,
    #[serde(rename = "date_c", default)]
    pub date: Option<String>,
    /// Hours
    #[serde(rename = "duration_c", default, deserialize_with = "opt_float")]
    pub duration: Option<f64>,
    #[serde(rename = "created_at_c", default)]
    pub created_at: Option<String>,
    #[serde(rename = "project_id_c", default, deserialize_with = "opt_lookup_id")]
    pub project_id: Option<i64>,
    #[serde(rename = "task_id_c", default, deserialize_with = "opt_lookup_id")]
    pub task_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTimeEntry {
    /// Defaults to `Time Entry - <local date>`
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    #[serde(default, deserialize_with = "opt_float")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "opt_int")]
    pub project_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_int")]
    pub task_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    #[serde(default, deserialize_with = "opt_float")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "opt_int")]
    pub project_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_int")]
    pub task_id: Option<i64>,
}

impl IntoRecord for NewTimeEntry {
    fn into_record(self, now: DateTime<Utc>) -> Record {
        let name = self
            .name
            .unwrap_or_else(|| format!("Time Entry - {}", local_date_label(now)));
        RecordBuilder::new()
            .set(NAME_FIELD, name)
            .set_opt("description_c", self.description)
            .set_opt("date_c", self.date)
            .set("duration_c", self.duration.unwrap_or(0.0))
            .stamp("created_at_c", now)
            .set("project_id_c", self.project_id)
            .set("task_id_c", self.task_id)
            .build()
    }
}

impl IntoRecord for TimeEntryPatch {
    fn into_record(self, _now: DateTime<Utc>) -> Record {
        RecordBuilder::new()
            .set_opt(NAME_FIELD, self.name)
            .set_opt("description_c", self.description)
            .set_opt("date_c", self.date)
            .set_opt("duration_c", self.duration)
            .set_opt("project_id_c", self.project_id)
            .set_opt("task_id_c", self.task_id)
            .build()
    }
}

impl Resource for TimeEntry {
    const SCHEMA: TableSchema = TableSchema {
        table: "time_entry_c",
        entity: "time entry",
        fields: &[
            "Name",
            "description_c",
            "date_c",
            "duration_c",
            "created_at_c",
            "project_id_c",
            "task_id_c",
        ],
        default_order: Some(("date_c", SortType::Desc)),
    };

    const ALIASES: &'static [FieldAlias] = &[
        FieldAlias::new("name", "Name"),
        FieldAlias::new("description", "description_c"),
        FieldAlias::new("date", "date_c"),
        FieldAlias::new("duration", "duration_c"),
        FieldAlias::new("projectId", "project_id_c"),
        FieldAlias::new("taskId", "task_id_c"),
    ];

    type Draft = NewTimeEntry;
    type Patch = TimeEntryPatch;

    fn id(&self) -> i64 {
        self.id
    }
}

pub type TimeEntryService = ResourceService<TimeEntry>;

impl ResourceService<TimeEntry> {
    /// Most recent first
    pub async fn get_by_project_id(&self, project_id: i64) -> ServiceResult<Vec<TimeEntry>> {
        self.fetch_where(
            vec![WhereClause::equal_to("project_id_c", project_id)],
            Some(OrderBy::desc("date_c")),
        )
        .await
    }

    /// Most recent first
    pub async fn get_by_task_id(&self, task_id: i64) -> ServiceResult<Vec<TimeEntry>> {
        self.fetch_where(
            vec![WhereClause::equal_to("task_id_c", task_id)],
            Some(OrderBy::desc("date_c")),
        )
        .await
    }

    /// Record a stopped timer; identical to `create`
    pub async fn create_from_timer(&self, entry: NewTimeEntry) -> ServiceResult<TimeEntry> {
        self.create(entry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::from_legacy;
    use serde_json::json;

    #[test]
    fn test_new_entry_defaults() {
        let now = Utc::now();
        let record = NewTimeEntry::default().into_record(now);

        assert_eq!(
            record["Name"],
            json!(format!("Time Entry - {}", local_date_label(now)))
        );
        assert_eq!(record["duration_c"], json!(0.0));
        assert_eq!(record["task_id_c"], serde_json::Value::Null);
        assert!(!record.contains_key("date_c"));
    }

    #[test]
    fn test_duration_string_is_parsed() {
        let draft: NewTimeEntry =
            from_legacy(json!({"duration_c": "1.5", "taskId": "9"}), TimeEntry::ALIASES).unwrap();
        assert_eq!(draft.duration, Some(1.5));
        assert_eq!(draft.task_id, Some(9));
    }

    #[test]
    fn test_garbage_duration_is_rejected() {
        let result: crate::error::ServiceResult<NewTimeEntry> =
            from_legacy(json!({"duration": "soon"}), TimeEntry::ALIASES);
        assert!(result.is_err());
    }
}
