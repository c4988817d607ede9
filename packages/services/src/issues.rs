// ABOUTME: Issue records, the issue facade, and issue reference data
// ABOUTME: CRUD over issue_c plus server-side search by title and equality filters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskdeck_cloud::{QueryParams, Record, SortType, WhereClause};
use taskdeck_core::coerce::{opt_int, opt_lookup_id};
use taskdeck_core::NAME_FIELD;

use crate::error::ServiceResult;
use crate::mapper::FieldAlias;
use crate::schema::{IntoRecord, RecordBuilder, Resource, TableSchema};
use crate::service::ResourceService;

/// Filter value meaning "do not filter on this field"
pub const ANY_FILTER: &str = "all";

/// Columns returned by [`IssueService::search_issues`]
pub const SEARCH_FIELDS: &[&str] = &[
    "Name",
    "title_c",
    "type_c",
    "description_c",
    "priority_c",
    "status_c",
    "created_at_c",
    "project_id_c",
];

/// A `{value, label}` pair for populating pickers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReferenceOption {
    pub value: &'static str,
    pub label: &'static str,
}

impl ReferenceOption {
    const fn same(value: &'static str) -> Self {
        Self {
            value,
            label: value,
        }
    }
}

pub const ISSUE_TYPES: &[ReferenceOption] = &[
    ReferenceOption::same("Bug"),
    ReferenceOption::same("Feature Request"),
    ReferenceOption::same("Improvement"),
    ReferenceOption::same("Task"),
];

pub const PRIORITY_LEVELS: &[ReferenceOption] = &[
    ReferenceOption::same("Low"),
    ReferenceOption::same("Medium"),
    ReferenceOption::same("High"),
    ReferenceOption::same("Highest"),
];

pub const STATUS_WORKFLOW: &[ReferenceOption] = &[
    ReferenceOption::same("To Do"),
    ReferenceOption::same("In Progress"),
    ReferenceOption::same("In Review"),
    ReferenceOption::same("Done"),
];

pub const ENVIRONMENTS: &[ReferenceOption] = &[
    ReferenceOption::same("Development"),
    ReferenceOption::same("Staging"),
    ReferenceOption::same("Production"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "title_c", default)]
    pub title: Option<String>,
    #[serde(rename = "type_c", default)]
    pub issue_type: Option<String>,
    #[serde(rename = "description_c", default)]
    pub description: Option<String>,
    #[serde(rename = "priority_c", default)]
    pub priority: Option<String>,
    #[serde(rename = "status_c", default)]
    pub status: Option<String>,
    #[serde(rename = "reporter_c", default)]
    pub reporter: Option<String>,
    #[serde(rename = "assignee_c", default)]
    pub assignee: Option<String>,
    #[serde(rename = "environment_c", default)]
    pub environment: Option<String>,
    #[serde(rename = "due_date_c", default)]
    pub due_date: Option<String>,
    #[serde(rename = "created_at_c", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at_c", default)]
    pub updated_at: Option<String>,
    #[serde(rename = "project_id_c", default, deserialize_with = "opt_lookup_id")]
    pub project_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
    /// Falls back to `title`
    pub name: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub issue_type: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub reporter: Option<String>,
    pub assignee: Option<String>,
    pub environment: Option<String>,
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "opt_int")]
    pub project_id: Option<i64>,
}

/// Same fields as [`NewIssue`]; only present ones are sent
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuePatch {
    pub name: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub issue_type: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub reporter: Option<String>,
    pub assignee: Option<String>,
    pub environment: Option<String>,
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "opt_int")]
    pub project_id: Option<i64>,
}

impl IntoRecord for NewIssue {
    fn into_record(self, now: DateTime<Utc>) -> Record {
        let name = self.name.or_else(|| self.title.clone());
        RecordBuilder::new()
            .set_opt(NAME_FIELD, name)
            .set_opt("title_c", self.title)
            .set_opt("type_c", self.issue_type)
            .set_opt("description_c", self.description)
            .set_opt("priority_c", self.priority)
            .set_opt("status_c", self.status)
            .set_opt("reporter_c", self.reporter)
            .set_opt("assignee_c", self.assignee)
            .set_opt("environment_c", self.environment)
            .set_opt("due_date_c", self.due_date)
            .stamp("created_at_c", now)
            .stamp("updated_at_c", now)
            .set("project_id_c", self.project_id)
            .build()
    }
}

impl IntoRecord for IssuePatch {
    fn into_record(self, now: DateTime<Utc>) -> Record {
        let name = self.name.or_else(|| self.title.clone());
        RecordBuilder::new()
            .set_opt(NAME_FIELD, name)
            .set_opt("title_c", self.title)
            .set_opt("type_c", self.issue_type)
            .set_opt("description_c", self.description)
            .set_opt("priority_c", self.priority)
            .set_opt("status_c", self.status)
            .set_opt("reporter_c", self.reporter)
            .set_opt("assignee_c", self.assignee)
            .set_opt("environment_c", self.environment)
            .set_opt("due_date_c", self.due_date)
            .stamp("updated_at_c", now)
            .set_opt("project_id_c", self.project_id)
            .build()
    }
}

impl Resource for Issue {
    const SCHEMA: TableSchema = TableSchema {
        table: "issue_c",
        entity: "issue",
        fields: &[
            "Name",
            "title_c",
            "type_c",
            "description_c",
            "priority_c",
            "status_c",
            "reporter_c",
            "assignee_c",
            "environment_c",
            "due_date_c",
            "created_at_c",
            "updated_at_c",
            "project_id_c",
        ],
        default_order: Some(("created_at_c", SortType::Desc)),
    };

    const ALIASES: &'static [FieldAlias] = &[
        FieldAlias::new("name", "Name"),
        FieldAlias::new("title", "title_c"),
        FieldAlias::new("type", "type_c"),
        FieldAlias::new("description", "description_c"),
        FieldAlias::new("priority", "priority_c"),
        FieldAlias::new("status", "status_c"),
        FieldAlias::new("reporter", "reporter_c"),
        FieldAlias::new("assignee", "assignee_c"),
        FieldAlias::new("environment", "environment_c"),
        FieldAlias::new("dueDate", "due_date_c"),
        FieldAlias::new("projectId", "project_id_c"),
    ];

    type Draft = NewIssue;
    type Patch = IssuePatch;

    fn id(&self) -> i64 {
        self.id
    }
}

/// Optional equality filters for issue search; `"all"` disables a filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IssueFilters {
    #[serde(rename = "type")]
    pub issue_type: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl IssueFilters {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }
}

fn active_filter(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty() && *v != ANY_FILTER)
}

/// Where clauses for an issue search, in title, type, status, priority order
pub fn search_clauses(query: &str, filters: &IssueFilters) -> Vec<WhereClause> {
    let mut clauses = Vec::new();

    let query = query.trim();
    if !query.is_empty() {
        clauses.push(WhereClause::contains("title_c", query));
    }

    let equality = [
        ("type_c", &filters.issue_type),
        ("status_c", &filters.status),
        ("priority_c", &filters.priority),
    ];
    for (field, value) in equality {
        if let Some(value) = active_filter(value) {
            clauses.push(WhereClause::equal_to(field, value));
        }
    }

    clauses
}

pub type IssueService = ResourceService<Issue>;

impl ResourceService<Issue> {
    /// Title substring search combined with the active filters
    pub async fn search_issues(
        &self,
        query: &str,
        filters: &IssueFilters,
    ) -> ServiceResult<Vec<Issue>> {
        let params = QueryParams::select(SEARCH_FIELDS).filters(search_clauses(query, filters));
        self.fetch(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{json, Value};

    #[test]
    fn test_all_sentinel_skips_filter() {
        let filters = IssueFilters {
            issue_type: Some("all".into()),
            status: Some("Done".into()),
            priority: None,
        };
        assert_eq!(
            search_clauses("  login  ", &filters),
            vec![
                WhereClause::contains("title_c", "login"),
                WhereClause::equal_to("status_c", "Done"),
            ]
        );
    }

    #[rstest]
    #[case("", 0)]
    #[case("   ", 0)]
    #[case("crash", 1)]
    fn test_blank_query_adds_no_clause(#[case] query: &str, #[case] expected: usize) {
        assert_eq!(search_clauses(query, &IssueFilters::default()).len(), expected);
    }

    #[test]
    fn test_name_falls_back_to_title() {
        let record = NewIssue {
            title: Some("Login fails".into()),
            ..Default::default()
        }
        .into_record(Utc::now());
        assert_eq!(record["Name"], json!("Login fails"));
        assert_eq!(record["project_id_c"], Value::Null);
        assert!(record.contains_key("updated_at_c"));
    }

    #[test]
    fn test_patch_stamps_updated_at_only() {
        let record = IssuePatch {
            status: Some("Done".into()),
            ..Default::default()
        }
        .into_record(Utc::now());
        let mut keys: Vec<&str> = record.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["status_c", "updated_at_c"]);
    }

    #[test]
    fn test_reference_data() {
        let values: Vec<&str> = STATUS_WORKFLOW.iter().map(|o| o.value).collect();
        assert_eq!(values, vec!["To Do", "In Progress", "In Review", "Done"]);
        assert_eq!(ISSUE_TYPES[1].label, "Feature Request");
        assert_eq!(PRIORITY_LEVELS.len(), 4);
        assert_eq!(ENVIRONMENTS.last().map(|o| o.value), Some("Production"));
    }
}
