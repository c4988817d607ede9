// ABOUTME: Chat messages, channels, and the chat facade
// ABOUTME: Message CRUD, channel queries, thread replies, client-side search, and @mention parsing

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use taskdeck_cloud::{OrderBy, Record, RecordStore, SortType, WhereClause};
use taskdeck_core::coerce::{opt_int, opt_lookup_id};
use taskdeck_core::{contains_ignore_case, local_datetime_label, NAME_FIELD};

use crate::error::{ServiceError, ServiceResult};
use crate::mapper::FieldAlias;
use crate::schema::{IntoRecord, RecordBuilder, Resource, TableSchema};
use crate::service::ResourceService;

const MENTION_PATTERN: &str = r"@([A-Za-z0-9._-]+)";

static MENTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(MENTION_PATTERN)
        .unwrap_or_else(|e| panic!("Mention pattern failed to compile: {}", e))
});

pub const DEFAULT_MEMBER_COUNT: i64 = 1;

/// Where a message or channel lives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    #[default]
    Team,
    Project,
    Thread,
}

impl ChannelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelType::Team => "team",
            ChannelType::Project => "project",
            ChannelType::Thread => "thread",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelType {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "team" => Ok(ChannelType::Team),
            "project" => Ok(ChannelType::Project),
            "thread" => Ok(ChannelType::Thread),
            other => Err(ServiceError::invalid_input(format!(
                "unknown channel type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "content_c", default)]
    pub content: Option<String>,
    /// Kept as text so rows with unexpected values still load
    #[serde(rename = "channel_type_c", default)]
    pub channel_type: Option<String>,
    #[serde(rename = "created_at_c", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at_c", default)]
    pub updated_at: Option<String>,
    #[serde(rename = "parent_id_c", default, deserialize_with = "opt_lookup_id")]
    pub parent_id: Option<i64>,
    #[serde(rename = "author_id_c", default, deserialize_with = "opt_lookup_id")]
    pub author_id: Option<i64>,
    #[serde(rename = "project_id_c", default, deserialize_with = "opt_lookup_id")]
    pub project_id: Option<i64>,
}

impl ChatMessage {
    pub fn mentions(&self) -> Vec<String> {
        self.content.as_deref().map(extract_mentions).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChatMessage {
    /// Defaults to `Message - <local datetime>`
    pub name: Option<String>,
    pub content: Option<String>,
    pub channel_type: Option<ChannelType>,
    /// Thread root for replies
    #[serde(default, deserialize_with = "opt_int")]
    pub parent_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_int")]
    pub author_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_int")]
    pub project_id: Option<i64>,
}

/// Messages can only be renamed or edited
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessagePatch {
    pub name: Option<String>,
    pub content: Option<String>,
}

impl IntoRecord for NewChatMessage {
    fn into_record(self, now: DateTime<Utc>) -> Record {
        let name = self
            .name
            .unwrap_or_else(|| format!("Message - {}", local_datetime_label(now)));
        RecordBuilder::new()
            .set(NAME_FIELD, name)
            .set_opt("content_c", self.content)
            .set(
                "channel_type_c",
                self.channel_type.unwrap_or_default().as_str(),
            )
            .stamp("created_at_c", now)
            .stamp("updated_at_c", now)
            .set("parent_id_c", self.parent_id)
            .set("author_id_c", self.author_id)
            .set("project_id_c", self.project_id)
            .build()
    }
}

impl IntoRecord for ChatMessagePatch {
    fn into_record(self, now: DateTime<Utc>) -> Record {
        RecordBuilder::new()
            .set_opt(NAME_FIELD, self.name)
            .set_opt("content_c", self.content)
            .stamp("updated_at_c", now)
            .build()
    }
}

impl Resource for ChatMessage {
    const SCHEMA: TableSchema = TableSchema {
        table: "chat_message_c",
        entity: "chat message",
        fields: &[
            "Name",
            "content_c",
            "channel_type_c",
            "created_at_c",
            "updated_at_c",
            "parent_id_c",
            "author_id_c",
            "project_id_c",
        ],
        default_order: Some(("created_at_c", SortType::Asc)),
    };

    const ALIASES: &'static [FieldAlias] = &[
        FieldAlias::new("name", "Name"),
        FieldAlias::new("content", "content_c"),
        FieldAlias::new("channelType", "channel_type_c"),
        FieldAlias::new("parentId", "parent_id_c"),
        FieldAlias::new("authorId", "author_id_c"),
        FieldAlias::new("projectId", "project_id_c"),
    ];

    type Draft = NewChatMessage;
    type Patch = ChatMessagePatch;

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "type_c", default)]
    pub channel_type: Option<String>,
    #[serde(rename = "project_id_c", default, deserialize_with = "opt_lookup_id")]
    pub project_id: Option<i64>,
    #[serde(rename = "created_at_c", default)]
    pub created_at: Option<String>,
    #[serde(rename = "member_count_c", default, deserialize_with = "opt_int")]
    pub member_count: Option<i64>,
    #[serde(rename = "description_c", default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChannel {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub channel_type: Option<ChannelType>,
    #[serde(default, deserialize_with = "opt_int")]
    pub project_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_int")]
    pub member_count: Option<i64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_int")]
    pub member_count: Option<i64>,
    pub description: Option<String>,
}

impl IntoRecord for NewChannel {
    fn into_record(self, now: DateTime<Utc>) -> Record {
        RecordBuilder::new()
            .set_opt(NAME_FIELD, self.name)
            .set("type_c", self.channel_type.unwrap_or_default().as_str())
            .set("project_id_c", self.project_id)
            .stamp("created_at_c", now)
            .set(
                "member_count_c",
                self.member_count.unwrap_or(DEFAULT_MEMBER_COUNT),
            )
            .set("description_c", self.description.unwrap_or_default())
            .build()
    }
}

impl IntoRecord for ChannelPatch {
    fn into_record(self, _now: DateTime<Utc>) -> Record {
        RecordBuilder::new()
            .set_opt(NAME_FIELD, self.name)
            .set_opt("member_count_c", self.member_count)
            .set_opt("description_c", self.description)
            .build()
    }
}

impl Resource for Channel {
    const SCHEMA: TableSchema = TableSchema {
        table: "channel_c",
        entity: "channel",
        fields: &[
            "Name",
            "type_c",
            "project_id_c",
            "created_at_c",
            "member_count_c",
            "description_c",
        ],
        default_order: None,
    };

    const ALIASES: &'static [FieldAlias] = &[
        FieldAlias::new("name", "Name"),
        FieldAlias::new("type", "type_c"),
        FieldAlias::new("projectId", "project_id_c"),
        FieldAlias::new("memberCount", "member_count_c"),
        FieldAlias::new("description", "description_c"),
    ];

    type Draft = NewChannel;
    type Patch = ChannelPatch;

    fn id(&self) -> i64 {
        self.id
    }
}

/// `@handle` mentions in order of appearance, duplicates kept
pub fn extract_mentions(content: &str) -> Vec<String> {
    MENTION_REGEX
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Where clauses selecting one channel's messages
pub fn channel_clauses(project_id: Option<i64>, channel_type: ChannelType) -> Vec<WhereClause> {
    let mut clauses = vec![WhereClause::equal_to("channel_type_c", channel_type.as_str())];
    // 0 is never a real record id; treat it like no project
    let project_id = project_id.filter(|id| *id != 0);
    if let (ChannelType::Project, Some(project_id)) = (channel_type, project_id) {
        clauses.push(WhereClause::equal_to("project_id_c", project_id));
    }
    clauses
}

/// Facade over the message and channel tables
#[derive(Clone)]
pub struct ChatService {
    messages: ResourceService<ChatMessage>,
    channels: ResourceService<Channel>,
}

impl ChatService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            messages: ResourceService::new(Arc::clone(&store)),
            channels: ResourceService::new(store),
        }
    }

    pub fn messages(&self) -> &ResourceService<ChatMessage> {
        &self.messages
    }

    pub fn channels(&self) -> &ResourceService<Channel> {
        &self.channels
    }

    /// All messages, oldest first
    pub async fn get_all(&self) -> ServiceResult<Vec<ChatMessage>> {
        self.messages.get_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Option<ChatMessage>> {
        self.messages.get_by_id(id).await
    }

    pub async fn create(&self, message: NewChatMessage) -> ServiceResult<ChatMessage> {
        self.messages.create(message).await
    }

    pub async fn create_legacy(&self, input: Value) -> ServiceResult<ChatMessage> {
        self.messages.create_legacy(input).await
    }

    /// Only name and content are sent, with a fresh `updated_at_c`
    pub async fn update(&self, id: i64, patch: ChatMessagePatch) -> ServiceResult<ChatMessage> {
        self.messages.update(id, patch).await
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        self.messages.delete(id).await
    }

    pub async fn get_channels_by_type(
        &self,
        channel_type: ChannelType,
    ) -> ServiceResult<Vec<Channel>> {
        self.channels
            .fetch_where(
                vec![WhereClause::equal_to("type_c", channel_type.as_str())],
                None,
            )
            .await
    }

    pub async fn create_channel(&self, channel: NewChannel) -> ServiceResult<Channel> {
        self.channels.create(channel).await
    }

    /// Messages of one channel, oldest first.
    ///
    /// `project_id` narrows the result only for [`ChannelType::Project`].
    pub async fn get_messages_by_channel(
        &self,
        project_id: Option<i64>,
        channel_type: ChannelType,
    ) -> ServiceResult<Vec<ChatMessage>> {
        self.messages
            .fetch_where(
                channel_clauses(project_id, channel_type),
                Some(OrderBy::asc("created_at_c")),
            )
            .await
    }

    /// Thread messages whose parent is `parent_id`, oldest first.
    ///
    /// Older clients ignored the parent and returned every thread message;
    /// this narrows to replies of one message.
    pub async fn get_thread_replies(&self, parent_id: i64) -> ServiceResult<Vec<ChatMessage>> {
        let mut clauses = channel_clauses(None, ChannelType::Thread);
        clauses.push(WhereClause::equal_to("parent_id_c", parent_id));
        self.messages
            .fetch_where(clauses, Some(OrderBy::asc("created_at_c")))
            .await
    }

    /// Case-insensitive content search within one channel, done locally
    pub async fn search_messages(
        &self,
        query: &str,
        channel_type: ChannelType,
        project_id: Option<i64>,
    ) -> ServiceResult<Vec<ChatMessage>> {
        let messages = self
            .get_messages_by_channel(project_id, channel_type)
            .await?;
        Ok(messages
            .into_iter()
            .filter(|m| {
                m.content
                    .as_deref()
                    .is_some_and(|content| contains_ignore_case(content, query))
            })
            .collect())
    }

    pub fn extract_mentions(&self, content: &str) -> Vec<String> {
        extract_mentions(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("hi @alice and @bob.smith", vec!["alice", "bob.smith"])]
    #[case("@dev-team @dev-team ping", vec!["dev-team", "dev-team"])]
    #[case("mail me at someone@example.com", vec!["example.com"])]
    #[case("no mentions here", vec![])]
    #[case("@ alone", vec![])]
    fn test_extract_mentions(#[case] content: &str, #[case] expected: Vec<&str>) {
        assert_eq!(extract_mentions(content), expected);
    }

    #[test]
    fn test_project_clause_only_for_project_channels() {
        assert_eq!(channel_clauses(Some(4), ChannelType::Team).len(), 1);
        assert_eq!(channel_clauses(None, ChannelType::Project).len(), 1);
        assert_eq!(channel_clauses(Some(0), ChannelType::Project).len(), 1);
        assert_eq!(
            channel_clauses(Some(4), ChannelType::Project),
            vec![
                WhereClause::equal_to("channel_type_c", "project"),
                WhereClause::equal_to("project_id_c", 4),
            ]
        );
    }

    #[test]
    fn test_new_message_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap();
        let record = NewChatMessage {
            content: Some("hello".into()),
            ..Default::default()
        }
        .into_record(now);

        assert_eq!(
            record["Name"],
            json!(format!("Message - {}", local_datetime_label(now)))
        );
        assert_eq!(record["channel_type_c"], json!("team"));
        assert_eq!(record["created_at_c"], record["updated_at_c"]);
        assert_eq!(record["parent_id_c"], Value::Null);
    }

    #[test]
    fn test_message_patch_only_touches_name_and_content() {
        let record = ChatMessagePatch {
            content: Some("edited".into()),
            ..Default::default()
        }
        .into_record(Utc::now());
        let mut keys: Vec<&str> = record.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["content_c", "updated_at_c"]);
    }

    #[test]
    fn test_new_channel_defaults() {
        let record = NewChannel {
            name: Some("general".into()),
            ..Default::default()
        }
        .into_record(Utc::now());
        assert_eq!(record["type_c"], json!("team"));
        assert_eq!(record["member_count_c"], json!(1));
        assert_eq!(record["description_c"], json!(""));
        assert_eq!(record["project_id_c"], Value::Null);
    }

    #[rstest]
    #[case("team", ChannelType::Team)]
    #[case("Project", ChannelType::Project)]
    #[case(" thread ", ChannelType::Thread)]
    fn test_channel_type_parse(#[case] input: &str, #[case] expected: ChannelType) {
        assert_eq!(input.parse::<ChannelType>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_channel_type() {
        assert!("dm".parse::<ChannelType>().is_err());
    }
}
