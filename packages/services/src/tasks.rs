// ABOUTME: Task records and the task facade
// ABOUTME: CRUD over task_c, per-project listing, and completion shortcut

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskdeck_cloud::{Record, SortType, WhereClause};
use taskdeck_core::coerce::{opt_int, opt_lookup_id};
use taskdeck_core::NAME_FIELD;

use crate::error::ServiceResult;
use crate::mapper::FieldAlias;
use crate::schema::{IntoRecord, RecordBuilder, Resource, TableSchema};
use crate::service::ResourceService;

pub const DEFAULT_TASK_PRIORITY: &str = "Medium";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "description_c", default)]
    pub description: Option<String>,
    #[serde(rename = "completed_c", default)]
    pub completed: Option<bool>,
    #[serde(rename = "priority_c", default)]
    pub priority: Option<String>,
    #[serde(rename = "start_date_c", default)]
    pub start_date: Option<String>,
    #[serde(rename = "due_date_c", default)]
    pub due_date: Option<String>,
    #[serde(rename = "created_at_c", default)]
    pub created_at: Option<String>,
    #[serde(rename = "project_id_c", default, deserialize_with = "opt_lookup_id")]
    pub project_id: Option<i64>,
    #[serde(rename = "assigned_to_c", default, deserialize_with = "opt_lookup_id")]
    pub assigned_to: Option<i64>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub name: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    /// Defaults to `Medium`
    pub priority: Option<String>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "opt_int")]
    pub project_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_int")]
    pub assigned_to: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<String>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "opt_int")]
    pub project_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_int")]
    pub assigned_to: Option<i64>,
}

impl TaskPatch {
    pub fn completed() -> Self {
        Self {
            completed: Some(true),
            ..Self::default()
        }
    }
}

impl IntoRecord for NewTask {
    fn into_record(self, now: DateTime<Utc>) -> Record {
        RecordBuilder::new()
            .set_opt(NAME_FIELD, self.name)
            .set_opt("description_c", self.description)
            .set("completed_c", self.completed.unwrap_or(false))
            .set(
                "priority_c",
                self.priority
                    .unwrap_or_else(|| DEFAULT_TASK_PRIORITY.to_string()),
            )
            .set_opt("start_date_c", self.start_date)
            .set_opt("due_date_c", self.due_date)
            .stamp("created_at_c", now)
            .set("project_id_c", self.project_id)
            .set("assigned_to_c", self.assigned_to)
            .build()
    }
}

impl IntoRecord for TaskPatch {
    fn into_record(self, _now: DateTime<Utc>) -> Record {
        RecordBuilder::new()
            .set_opt(NAME_FIELD, self.name)
            .set_opt("description_c", self.description)
            .set_opt("completed_c", self.completed)
            .set_opt("priority_c", self.priority)
            .set_opt("start_date_c", self.start_date)
            .set_opt("due_date_c", self.due_date)
            .set_opt("project_id_c", self.project_id)
            .set_opt("assigned_to_c", self.assigned_to)
            .build()
    }
}

impl Resource for Task {
    const SCHEMA: TableSchema = TableSchema {
        table: "task_c",
        entity: "task",
        fields: &[
            "Name",
            "description_c",
            "completed_c",
            "priority_c",
            "start_date_c",
            "due_date_c",
            "created_at_c",
            "project_id_c",
            "assigned_to_c",
        ],
        default_order: Some(("Name", SortType::Asc)),
    };

    const ALIASES: &'static [FieldAlias] = &[
        FieldAlias::new("name", "Name"),
        FieldAlias::new("description", "description_c"),
        FieldAlias::new("completed", "completed_c"),
        FieldAlias::new("priority", "priority_c"),
        FieldAlias::new("startDate", "start_date_c"),
        FieldAlias::new("dueDate", "due_date_c"),
        FieldAlias::new("projectId", "project_id_c"),
        FieldAlias::new("assignedTo", "assigned_to_c"),
    ];

    type Draft = NewTask;
    type Patch = TaskPatch;

    fn id(&self) -> i64 {
        self.id
    }
}

pub type TaskService = ResourceService<Task>;

impl ResourceService<Task> {
    /// Tasks of one project, in store order
    pub async fn get_by_project_id(&self, project_id: i64) -> ServiceResult<Vec<Task>> {
        self.fetch_where(vec![WhereClause::equal_to("project_id_c", project_id)], None)
            .await
    }

    pub async fn mark_complete(&self, id: i64) -> ServiceResult<Task> {
        self.update(id, TaskPatch::completed()).await
    }
}
