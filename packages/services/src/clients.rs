// ABOUTME: Client records and the client facade
// ABOUTME: Plain CRUD over client_c ordered by name

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskdeck_cloud::{Record, SortType};
use taskdeck_core::NAME_FIELD;

use crate::mapper::FieldAlias;
use crate::schema::{IntoRecord, RecordBuilder, Resource, TableSchema};
use crate::service::ResourceService;

pub const DEFAULT_CLIENT_STATUS: &str = "Active";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "company_c", default)]
    pub company: Option<String>,
    #[serde(rename = "email_c", default)]
    pub email: Option<String>,
    #[serde(rename = "phone_c", default)]
    pub phone: Option<String>,
    #[serde(rename = "website_c", default)]
    pub website: Option<String>,
    #[serde(rename = "address_c", default)]
    pub address: Option<String>,
    #[serde(rename = "industry_c", default)]
    pub industry: Option<String>,
    #[serde(rename = "status_c", default)]
    pub status: Option<String>,
    #[serde(rename = "created_at_c", default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub industry: Option<String>,
    /// Defaults to `Active`
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub industry: Option<String>,
    pub status: Option<String>,
}

impl IntoRecord for NewClient {
    fn into_record(self, now: DateTime<Utc>) -> Record {
        RecordBuilder::new()
            .set_opt(NAME_FIELD, self.name)
            .set_opt("company_c", self.company)
            .set_opt("email_c", self.email)
            .set_opt("phone_c", self.phone)
            .set_opt("website_c", self.website)
            .set_opt("address_c", self.address)
            .set_opt("industry_c", self.industry)
            .set(
                "status_c",
                self.status.unwrap_or_else(|| DEFAULT_CLIENT_STATUS.to_string()),
            )
            .stamp("created_at_c", now)
            .build()
    }
}

impl IntoRecord for ClientPatch {
    fn into_record(self, _now: DateTime<Utc>) -> Record {
        RecordBuilder::new()
            .set_opt(NAME_FIELD, self.name)
            .set_opt("company_c", self.company)
            .set_opt("email_c", self.email)
            .set_opt("phone_c", self.phone)
            .set_opt("website_c", self.website)
            .set_opt("address_c", self.address)
            .set_opt("industry_c", self.industry)
            .set_opt("status_c", self.status)
            .build()
    }
}

impl Resource for Client {
    const SCHEMA: TableSchema = TableSchema {
        table: "client_c",
        entity: "client",
        fields: &[
            "Name",
            "company_c",
            "email_c",
            "phone_c",
            "website_c",
            "address_c",
            "industry_c",
            "status_c",
            "created_at_c",
        ],
        default_order: Some(("Name", SortType::Asc)),
    };

    const ALIASES: &'static [FieldAlias] = &[
        FieldAlias::new("name", "Name"),
        FieldAlias::new("company", "company_c"),
        FieldAlias::new("email", "email_c"),
        FieldAlias::new("phone", "phone_c"),
        FieldAlias::new("website", "website_c"),
        FieldAlias::new("address", "address_c"),
        FieldAlias::new("industry", "industry_c"),
        FieldAlias::new("status", "status_c"),
    ];

    type Draft = NewClient;
    type Patch = ClientPatch;

    fn id(&self) -> i64 {
        self.id
    }
}

pub type ClientService = ResourceService<Client>;
