//! Metric records

use serde::{Deserialize, Serialize};

use crate::attributes::Attributes;
use crate::batch::{InstrumentationScope, Resource, ResourceBatch, ResourceGroup};
use crate::schema::SignalKind;

/// A batch of metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metrics {
    pub resource_metrics: Vec<ResourceMetrics>,
}

impl Metrics {
    /// Create an empty batch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resource group, returning it for further population
    pub fn push(&mut self, group: ResourceMetrics) -> &mut ResourceMetrics {
        self.resource_metrics.push(group);
        let last = self.resource_metrics.len() - 1;
        &mut self.resource_metrics[last]
    }
}

/// Metrics produced by one resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceMetrics {
    pub resource: Resource,
    pub scope_metrics: Vec<ScopeMetrics>,
}

impl ResourceMetrics {
    /// Create a group for a resource with the given attributes
    pub fn new(attributes: Attributes) -> Self {
        Self {
            resource: Resource::new(attributes),
            scope_metrics: Vec::new(),
        }
    }

    /// Append a metric under the default (unnamed) scope
    #[must_use]
    pub fn with_metric(mut self, metric: Metric) -> Self {
        match self.scope_metrics.first_mut() {
            Some(scope) => scope.metrics.push(metric),
            None => self.scope_metrics.push(ScopeMetrics {
                scope: InstrumentationScope::default(),
                metrics: vec![metric],
            }),
        }
        self
    }
}

impl ResourceGroup for ResourceMetrics {
    #[inline]
    fn resource(&self) -> &Resource {
        &self.resource
    }

    #[inline]
    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }

    /// Counts data points, the unit metric pipelines batch on
    fn record_count(&self) -> usize {
        self.scope_metrics
            .iter()
            .flat_map(|s| &s.metrics)
            .map(|m| m.data_points.len())
            .sum()
    }
}

/// Metrics from one instrumentation scope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScopeMetrics {
    pub scope: InstrumentationScope,
    pub metrics: Vec<Metric>,
}

/// Kind of metric stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    #[default]
    Gauge,
    Sum,
}

/// A named metric with its data points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metric {
    pub name: String,
    pub description: String,
    pub unit: String,
    #[serde(rename = "type")]
    pub metric_type: MetricType,
    pub data_points: Vec<NumberDataPoint>,
}

impl Metric {
    /// Create a gauge with a single data point
    pub fn gauge(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            data_points: vec![NumberDataPoint {
                value,
                ..NumberDataPoint::default()
            }],
            ..Self::default()
        }
    }
}

/// A single numeric observation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberDataPoint {
    pub time_unix_nano: u64,
    pub value: f64,
    pub attributes: Attributes,
}

impl ResourceBatch for Metrics {
    type Group = ResourceMetrics;

    const KIND: SignalKind = SignalKind::Metrics;

    #[inline]
    fn resource_groups(&self) -> &[ResourceMetrics] {
        &self.resource_metrics
    }

    #[inline]
    fn into_resource_groups(self) -> Vec<ResourceMetrics> {
        self.resource_metrics
    }

    #[inline]
    fn from_resource_groups(groups: Vec<ResourceMetrics>) -> Self {
        Self {
            resource_metrics: groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_count_counts_data_points() {
        let mut gauge = Metric::gauge("cpu", 0.5);
        gauge.data_points.push(NumberDataPoint::default());

        let mut metrics = Metrics::new();
        metrics.push(
            ResourceMetrics::new(Attributes::new().with("X-Tenant", "acme"))
                .with_metric(gauge)
                .with_metric(Metric::gauge("mem", 1.0)),
        );

        assert_eq!(metrics.group_count(), 1);
        assert_eq!(metrics.record_count(), 3);
    }

    #[test]
    fn test_metric_type_json() {
        let json = r#"{"name": "requests", "type": "sum", "dataPoints": [{"value": 4.0}]}"#;
        let metric: Metric = serde_json::from_str(json).unwrap();
        assert_eq!(metric.metric_type, MetricType::Sum);
        assert_eq!(metric.data_points[0].value, 4.0);
    }
}
