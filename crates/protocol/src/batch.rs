//! Resource-grouped batches
//!
//! Every record kind is a list of resource groups; each group carries one
//! resource attribute set and the records produced under it. The routing
//! processor only needs the capabilities below, so it is written once and
//! instantiated per kind.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attributes::Attributes;
use crate::schema::SignalKind;

/// The entity that produced a resource group's records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    pub attributes: Attributes,
}

impl Resource {
    /// Create a resource with the given attributes
    #[inline]
    pub fn new(attributes: Attributes) -> Self {
        Self { attributes }
    }
}

/// Instrumentation scope of a set of records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentationScope {
    pub name: String,
    pub version: String,
}

/// A subset of a batch sharing one resource
pub trait ResourceGroup: Clone + fmt::Debug + Send + Sync + 'static {
    /// The group's resource
    fn resource(&self) -> &Resource;

    /// Mutable access to the group's resource
    fn resource_mut(&mut self) -> &mut Resource;

    /// Number of records (log records, data points, spans) in this group
    fn record_count(&self) -> usize;
}

/// A batch of records organized as resource groups
///
/// Implemented once per record kind. Splitting and merging only move whole
/// groups; records are never reordered inside a group.
pub trait ResourceBatch: Clone + fmt::Debug + Send + Sync + 'static {
    /// Resource group type of this kind
    type Group: ResourceGroup;

    /// Record kind of this batch type
    const KIND: SignalKind;

    /// Resource groups in batch order
    fn resource_groups(&self) -> &[Self::Group];

    /// Consume the batch, yielding its groups in order
    fn into_resource_groups(self) -> Vec<Self::Group>;

    /// Build a batch from groups, preserving their order
    fn from_resource_groups(groups: Vec<Self::Group>) -> Self;

    /// Number of resource groups
    #[inline]
    fn group_count(&self) -> usize {
        self.resource_groups().len()
    }

    /// Total records across all groups
    fn record_count(&self) -> usize {
        self.resource_groups()
            .iter()
            .map(ResourceGroup::record_count)
            .sum()
    }

    /// Check if the batch has no resource groups
    #[inline]
    fn is_empty(&self) -> bool {
        self.resource_groups().is_empty()
    }
}
