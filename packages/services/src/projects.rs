// ABOUTME: Project records and the project facade
// ABOUTME: CRUD over project_c plus lookup of a client's projects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskdeck_cloud::{OrderBy, Record, SortType, WhereClause};
use taskdeck_core::coerce::{opt_int, opt_lookup_id};
use taskdeck_core::NAME_FIELD;

use crate::error::ServiceResult;
use crate::mapper::FieldAlias;
use crate::schema::{IntoRecord, RecordBuilder, Resource, TableSchema};
use crate::service::ResourceService;

pub const DEFAULT_PROJECT_STATUS: &str = "Planning";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "description_c", default)]
    pub description: Option<String>,
    #[serde(rename = "status_c", default)]
    pub status: Option<String>,
    #[serde(rename = "deadline_c", default)]
    pub deadline: Option<String>,
    #[serde(rename = "deliverables_c", default)]
    pub deliverables: Option<String>,
    #[serde(rename = "created_at_c", default)]
    pub created_at: Option<String>,
    #[serde(rename = "start_date_c", default)]
    pub start_date: Option<String>,
    #[serde(rename = "chat_enabled_c", default)]
    pub chat_enabled: Option<bool>,
    #[serde(rename = "client_id_c", default, deserialize_with = "opt_lookup_id")]
    pub client_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Defaults to `Planning`
    pub status: Option<String>,
    pub deadline: Option<String>,
    pub deliverables: Option<String>,
    pub start_date: Option<String>,
    /// Defaults to `true`
    pub chat_enabled: Option<bool>,
    #[serde(default, deserialize_with = "opt_int")]
    pub client_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub deadline: Option<String>,
    pub deliverables: Option<String>,
    pub start_date: Option<String>,
    pub chat_enabled: Option<bool>,
    #[serde(default, deserialize_with = "opt_int")]
    pub client_id: Option<i64>,
}

impl IntoRecord for NewProject {
    fn into_record(self, now: DateTime<Utc>) -> Record {
        RecordBuilder::new()
            .set_opt(NAME_FIELD, self.name)
            .set_opt("description_c", self.description)
            .set(
                "status_c",
                self.status
                    .unwrap_or_else(|| DEFAULT_PROJECT_STATUS.to_string()),
            )
            .set_opt("deadline_c", self.deadline)
            .set_opt("deliverables_c", self.deliverables)
            .stamp("created_at_c", now)
            .set_opt("start_date_c", self.start_date)
            .set("chat_enabled_c", self.chat_enabled.unwrap_or(true))
            .set("client_id_c", self.client_id)
            .build()
    }
}

impl IntoRecord for ProjectPatch {
    fn into_record(self, _now: DateTime<Utc>) -> Record {
        RecordBuilder::new()
            .set_opt(NAME_FIELD, self.name)
            .set_opt("description_c", self.description)
            .set_opt("status_c", self.status)
            .set_opt("deadline_c", self.deadline)
            .set_opt("deliverables_c", self.deliverables)
            .set_opt("start_date_c", self.start_date)
            .set_opt("chat_enabled_c", self.chat_enabled)
            .set_opt("client_id_c", self.client_id)
            .build()
    }
}

impl Resource for Project {
    const SCHEMA: TableSchema = TableSchema {
        table: "project_c",
        entity: "project",
        fields: &[
            "Name",
            "description_c",
            "status_c",
            "deadline_c",
            "deliverables_c",
            "created_at_c",
            "start_date_c",
            "chat_enabled_c",
            "client_id_c",
        ],
        default_order: Some(("Name", SortType::Asc)),
    };

    const ALIASES: &'static [FieldAlias] = &[
        FieldAlias::new("name", "Name"),
        FieldAlias::new("description", "description_c"),
        FieldAlias::new("status", "status_c"),
        FieldAlias::new("deadline", "deadline_c"),
        FieldAlias::new("deliverables", "deliverables_c"),
        FieldAlias::new("startDate", "start_date_c"),
        FieldAlias::new("chatEnabled", "chat_enabled_c"),
        FieldAlias::new("clientId", "client_id_c"),
    ];

    type Draft = NewProject;
    type Patch = ProjectPatch;

    fn id(&self) -> i64 {
        self.id
    }
}

pub type ProjectService = ResourceService<Project>;

impl ResourceService<Project> {
    /// Projects belonging to one client, by name
    pub async fn get_by_client_id(&self, client_id: i64) -> ServiceResult<Vec<Project>> {
        self.fetch_where(
            vec![WhereClause::equal_to("client_id_c", client_id)],
            Some(OrderBy::asc("Name")),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_new_project_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 8, 30, 0).unwrap();
        let record = NewProject {
            name: Some("Website".into()),
            ..Default::default()
        }
        .into_record(now);

        assert_eq!(
            Value::Object(record),
            json!({
                "Name": "Website",
                "status_c": "Planning",
                "created_at_c": "2024-02-29T08:30:00.000Z",
                "chat_enabled_c": true,
                "client_id_c": null
            })
        );
    }

    #[test]
    fn test_explicit_false_chat_flag_is_kept() {
        let record = NewProject {
            chat_enabled: Some(false),
            client_id: Some(4),
            ..Default::default()
        }
        .into_record(Utc::now());
        assert_eq!(record["chat_enabled_c"], json!(false));
        assert_eq!(record["client_id_c"], json!(4));
    }

    #[test]
    fn test_patch_omits_absent_client() {
        let record = ProjectPatch {
            status: Some("Active".into()),
            ..Default::default()
        }
        .into_record(Utc::now());
        assert_eq!(Value::Object(record), json!({"status_c": "Active"}));
    }

    #[test]
    fn test_client_lookup_object_decodes() {
        let project: Project = serde_json::from_value(json!({
            "Id": 1,
            "Name": "Website",
            "client_id_c": {"Id": 7, "Name": "Acme"}
        }))
        .unwrap();
        assert_eq!(project.client_id, Some(7));
    }
}
