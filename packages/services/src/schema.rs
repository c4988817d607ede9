// ABOUTME: Per-resource schema descriptors and record construction
// ABOUTME: Table name, projection, default order, and the traits tying typed inputs to rows

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use taskdeck_cloud::{OrderBy, QueryParams, Record, SortType};
use taskdeck_core::iso_timestamp;

use crate::mapper::FieldAlias;

/// Static description of one remote table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub table: &'static str,
    /// Singular noun used in logs and errors
    pub entity: &'static str,
    /// Columns fetched by `get_all` and `get_by_id`
    pub fields: &'static [&'static str],
    pub default_order: Option<(&'static str, SortType)>,
}

impl TableSchema {
    /// Projection only
    pub fn query(&self) -> QueryParams {
        QueryParams::select(self.fields)
    }

    /// Projection plus the table's default ordering
    pub fn list_query(&self) -> QueryParams {
        match self.default_order {
            Some((field, sorttype)) => self.query().order(OrderBy::new(field, sorttype)),
            None => self.query(),
        }
    }
}

/// Turns a typed create or update request into a storage row
pub trait IntoRecord {
    fn into_record(self, now: DateTime<Utc>) -> Record;
}

/// A row type stored in one remote table
pub trait Resource: DeserializeOwned + Send + Sync + 'static {
    const SCHEMA: TableSchema;

    /// Friendly/storage name pairs accepted by the legacy entry points
    const ALIASES: &'static [FieldAlias];

    /// Typed create request
    type Draft: IntoRecord + DeserializeOwned + Send;

    /// Typed partial update; absent fields are left untouched remotely
    type Patch: IntoRecord + DeserializeOwned + Send;

    fn id(&self) -> i64;
}

/// Small builder keeping record construction readable
#[derive(Debug, Default)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always write the field, `None` becoming `null`
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.record.insert(field.to_string(), value.into());
        self
    }

    /// Write the field only when a value is present
    pub fn set_opt<V: Into<Value>>(mut self, field: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.record.insert(field.to_string(), value.into());
        }
        self
    }

    /// Write an ISO-8601 timestamp
    pub fn stamp(self, field: &str, now: DateTime<Utc>) -> Self {
        self.set(field, iso_timestamp(now))
    }

    pub fn build(self) -> Record {
        self.record
    }
}
