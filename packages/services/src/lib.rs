// ABOUTME: Resource facades over the hosted table store
// ABOUTME: Clients, projects, tasks, time entries, issues, and chat sharing one generic CRUD component

pub mod chat;
pub mod clients;
pub mod error;
pub mod issues;
pub mod mapper;
pub mod outcome;
pub mod projects;
pub mod schema;
pub mod service;
pub mod tasks;
pub mod time_entries;

use std::sync::Arc;

use taskdeck_cloud::{CloudClientFactory, RecordStore};

pub use chat::{
    extract_mentions, Channel, ChannelPatch, ChannelType, ChatMessage, ChatMessagePatch,
    ChatService, NewChannel, NewChatMessage,
};
pub use clients::{Client, ClientPatch, ClientService, NewClient};
pub use error::{ServiceError, ServiceResult};
pub use issues::{
    Issue, IssueFilters, IssuePatch, IssueService, NewIssue, ReferenceOption, ENVIRONMENTS,
    ISSUE_TYPES, PRIORITY_LEVELS, STATUS_WORKFLOW,
};
pub use mapper::{from_legacy, record_id, record_id_str, FieldAlias};
pub use outcome::{or_none, OrSentinel};
pub use projects::{NewProject, Project, ProjectPatch, ProjectService};
pub use schema::{IntoRecord, Resource, TableSchema};
pub use service::ResourceService;
pub use tasks::{NewTask, Task, TaskPatch, TaskService};
pub use time_entries::{NewTimeEntry, TimeEntry, TimeEntryPatch, TimeEntryService};

/// Every facade, sharing one store handle
#[derive(Clone)]
pub struct Services {
    pub clients: ClientService,
    pub projects: ProjectService,
    pub tasks: TaskService,
    pub time_entries: TimeEntryService,
    pub issues: IssueService,
    pub chat: ChatService,
}

impl Services {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            clients: ClientService::new(Arc::clone(&store)),
            projects: ProjectService::new(Arc::clone(&store)),
            tasks: TaskService::new(Arc::clone(&store)),
            time_entries: TimeEntryService::new(Arc::clone(&store)),
            issues: IssueService::new(Arc::clone(&store)),
            chat: ChatService::new(store),
        }
    }

    /// Facades talking to the HTTP store described by `factory`
    pub fn from_factory(factory: &CloudClientFactory) -> ServiceResult<Self> {
        Ok(Self::new(factory.shared()?))
    }
}
