// ABOUTME: Builds the facade set the commands operate on
// ABOUTME: Online mode talks to the hosted store; offline mode uses a seeded in-memory store

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing::debug;

use taskdeck_cloud::{CloudClientFactory, CloudConfig, MemoryRecordStore, Record, RecordStore};
use taskdeck_services::Services;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Online,
    Offline,
}

impl StoreMode {
    pub fn from_flag(offline: bool) -> Self {
        if offline {
            StoreMode::Offline
        } else {
            StoreMode::Online
        }
    }
}

pub async fn build_services(mode: StoreMode) -> Result<Services> {
    let store: Arc<dyn RecordStore> = match mode {
        StoreMode::Offline => {
            debug!("Using in-memory store");
            Arc::new(demo_store().await)
        }
        StoreMode::Online => {
            let config = CloudConfig::load_default()
                .await
                .context("Failed to load configuration")?;
            debug!("Using remote store at {}", config.api_url);
            CloudClientFactory::new(config)
                .shared()
                .context("Failed to build HTTP client")?
        }
    };
    Ok(Services::new(store))
}

fn rows(values: Vec<Value>) -> Vec<Record> {
    values
        .into_iter()
        .filter_map(|v| match v {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect()
}

/// A small data set so offline commands have something to show
pub async fn demo_store() -> MemoryRecordStore {
    let store = MemoryRecordStore::new();
    let stamp = "2024-06-03T09:00:00.000Z";

    let clients = store
        .seed(
            "client_c",
            rows(vec![json!({
                "Name": "Northwind",
                "company_c": "Northwind Traders",
                "email_c": "ops@northwind.test",
                "status_c": "Active",
                "created_at_c": stamp
            })]),
        )
        .await;
    let client_id = clients.first().copied();

    let projects = store
        .seed(
            "project_c",
            rows(vec![json!({
                "Name": "Storefront redesign",
                "status_c": "Planning",
                "chat_enabled_c": true,
                "client_id_c": client_id,
                "created_at_c": stamp
            })]),
        )
        .await;
    let project_id = projects.first().copied();

    let tasks = store
        .seed(
            "task_c",
            rows(vec![
                json!({"Name": "Audit checkout flow", "completed_c": false, "priority_c": "High", "project_id_c": project_id, "created_at_c": stamp}),
                json!({"Name": "Draft wireframes", "completed_c": true, "priority_c": "Medium", "project_id_c": project_id, "created_at_c": stamp}),
            ]),
        )
        .await;

    store
        .seed(
            "time_entry_c",
            rows(vec![json!({
                "Name": "Checkout audit",
                "date_c": "2024-06-03",
                "duration_c": 2.5,
                "project_id_c": project_id,
                "task_id_c": tasks.first().copied(),
                "created_at_c": stamp
            })]),
        )
        .await;

    store
        .seed(
            "issue_c",
            rows(vec![json!({
                "Name": "Cart total ignores coupons",
                "title_c": "Cart total ignores coupons",
                "type_c": "Bug",
                "priority_c": "High",
                "status_c": "To Do",
                "environment_c": "Staging",
                "project_id_c": project_id,
                "created_at_c": stamp,
                "updated_at_c": stamp
            })]),
        )
        .await;

    store
        .seed(
            "channel_c",
            rows(vec![json!({
                "Name": "general",
                "type_c": "team",
                "member_count_c": 3,
                "description_c": "Team-wide announcements",
                "created_at_c": stamp
            })]),
        )
        .await;

    store
        .seed(
            "chat_message_c",
            rows(vec![json!({
                "Name": "Welcome",
                "content_c": "Welcome aboard @dana, kickoff is Monday",
                "channel_type_c": "team",
                "created_at_c": stamp,
                "updated_at_c": stamp
            })]),
        )
        .await;

    store
}
