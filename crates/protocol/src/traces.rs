//! Trace spans

use serde::{Deserialize, Serialize};

use crate::attributes::Attributes;
use crate::batch::{InstrumentationScope, Resource, ResourceBatch, ResourceGroup};
use crate::schema::SignalKind;

/// A batch of spans
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Traces {
    pub resource_spans: Vec<ResourceSpans>,
}

impl Traces {
    /// Create an empty batch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resource group, returning it for further population
    pub fn push(&mut self, group: ResourceSpans) -> &mut ResourceSpans {
        self.resource_spans.push(group);
        let last = self.resource_spans.len() - 1;
        &mut self.resource_spans[last]
    }
}

/// Spans produced by one resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceSpans {
    pub resource: Resource,
    pub scope_spans: Vec<ScopeSpans>,
}

impl ResourceSpans {
    /// Create a group for a resource with the given attributes
    pub fn new(attributes: Attributes) -> Self {
        Self {
            resource: Resource::new(attributes),
            scope_spans: Vec::new(),
        }
    }

    /// Append a span under the default (unnamed) scope
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        match self.scope_spans.first_mut() {
            Some(scope) => scope.spans.push(span),
            None => self.scope_spans.push(ScopeSpans {
                scope: InstrumentationScope::default(),
                spans: vec![span],
            }),
        }
        self
    }
}

impl ResourceGroup for ResourceSpans {
    #[inline]
    fn resource(&self) -> &Resource {
        &self.resource
    }

    #[inline]
    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }

    fn record_count(&self) -> usize {
        self.scope_spans.iter().map(|s| s.spans.len()).sum()
    }
}

/// Spans from one instrumentation scope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScopeSpans {
    pub scope: InstrumentationScope,
    pub spans: Vec<Span>,
}

/// A single span
///
/// Trace and span IDs are carried hex-encoded, as in OTLP JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Span {
    pub trace_id: String,
    pub span_id: String,
    pub parent_span_id: String,
    pub name: String,
    pub start_time_unix_nano: u64,
    pub end_time_unix_nano: u64,
    pub attributes: Attributes,
}

impl Span {
    /// Create a span with a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl ResourceBatch for Traces {
    type Group = ResourceSpans;

    const KIND: SignalKind = SignalKind::Traces;

    #[inline]
    fn resource_groups(&self) -> &[ResourceSpans] {
        &self.resource_spans
    }

    #[inline]
    fn into_resource_groups(self) -> Vec<ResourceSpans> {
        self.resource_spans
    }

    #[inline]
    fn from_resource_groups(groups: Vec<ResourceSpans>) -> Self {
        Self {
            resource_spans: groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_count() {
        let mut traces = Traces::new();
        traces
            .push(ResourceSpans::new(Attributes::new()))
            .scope_spans
            .push(ScopeSpans {
                scope: InstrumentationScope::default(),
                spans: vec![Span::new("a"), Span::new("b")],
            });

        assert_eq!(traces.record_count(), 2);
        assert_eq!(Traces::KIND, SignalKind::Traces);
    }

    #[test]
    fn test_with_span_reuses_first_scope() {
        let group = ResourceSpans::new(Attributes::new())
            .with_span(Span::new("a"))
            .with_span(Span::new("b"));
        assert_eq!(group.scope_spans.len(), 1);
        assert_eq!(group.record_count(), 2);
    }
}
