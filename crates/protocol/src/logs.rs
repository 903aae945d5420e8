//! Log records

use serde::{Deserialize, Serialize};

use crate::attributes::{AttributeValue, Attributes};
use crate::batch::{InstrumentationScope, Resource, ResourceBatch, ResourceGroup};
use crate::schema::SignalKind;

/// A batch of log records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Logs {
    pub resource_logs: Vec<ResourceLogs>,
}

impl Logs {
    /// Create an empty batch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resource group, returning it for further population
    pub fn push(&mut self, group: ResourceLogs) -> &mut ResourceLogs {
        self.resource_logs.push(group);
        let last = self.resource_logs.len() - 1;
        &mut self.resource_logs[last]
    }
}

/// Log records produced by one resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceLogs {
    pub resource: Resource,
    pub scope_logs: Vec<ScopeLogs>,
}

impl ResourceLogs {
    /// Create a group for a resource with the given attributes
    pub fn new(attributes: Attributes) -> Self {
        Self {
            resource: Resource::new(attributes),
            scope_logs: Vec::new(),
        }
    }

    /// Append a record under the default (unnamed) scope
    #[must_use]
    pub fn with_record(mut self, record: LogRecord) -> Self {
        match self.scope_logs.first_mut() {
            Some(scope) => scope.log_records.push(record),
            None => self.scope_logs.push(ScopeLogs {
                scope: InstrumentationScope::default(),
                log_records: vec![record],
            }),
        }
        self
    }
}

impl ResourceGroup for ResourceLogs {
    #[inline]
    fn resource(&self) -> &Resource {
        &self.resource
    }

    #[inline]
    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }

    fn record_count(&self) -> usize {
        self.scope_logs.iter().map(|s| s.log_records.len()).sum()
    }
}

/// Log records from one instrumentation scope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScopeLogs {
    pub scope: InstrumentationScope,
    pub log_records: Vec<LogRecord>,
}

/// A single log record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogRecord {
    pub time_unix_nano: u64,
    pub severity_number: i32,
    pub severity_text: String,
    pub body: Option<AttributeValue>,
    pub attributes: Attributes,
}

impl LogRecord {
    /// Create a record with a string body
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: Some(AttributeValue::String(body.into())),
            ..Self::default()
        }
    }
}

impl ResourceBatch for Logs {
    type Group = ResourceLogs;

    const KIND: SignalKind = SignalKind::Logs;

    #[inline]
    fn resource_groups(&self) -> &[ResourceLogs] {
        &self.resource_logs
    }

    #[inline]
    fn into_resource_groups(self) -> Vec<ResourceLogs> {
        self.resource_logs
    }

    #[inline]
    fn from_resource_groups(groups: Vec<ResourceLogs>) -> Self {
        Self {
            resource_logs: groups,
        }
    }
}
