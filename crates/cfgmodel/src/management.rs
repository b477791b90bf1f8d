//! Read-only summaries of composite services and references.
//!
//! A management or monitoring facade mirrors these values verbatim. They are
//! snapshots: building one reads the tree once and later edits are not
//! reflected. Message metrics come from whatever runtime tracks them, through
//! [`MetricsSource`].

use crate::Result;
use crate::composite::{
    BindingModel, CompositeModel, CompositeReferenceModel, CompositeServiceModel, InterfaceModel,
};
use crate::model::NamedModel;
use crate::policy::PolicyRequirements;
use serde::Serialize;

/// Message counters for one service, reference, or binding.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessageMetrics {
    pub message_count: u64,
    pub fault_count: u64,
    pub total_processing_time_ms: u64,
    pub min_processing_time_ms: u64,
    pub max_processing_time_ms: u64,
    pub average_processing_time_ms: f64,
}

impl MessageMetrics {
    /// Count one processed message.
    pub fn record(&mut self, processing_time_ms: u64, fault: bool) {
        if self.message_count == 0 || processing_time_ms < self.min_processing_time_ms {
            self.min_processing_time_ms = processing_time_ms;
        }
        self.max_processing_time_ms = self.max_processing_time_ms.max(processing_time_ms);
        // Counters stick at the maximum instead of wrapping.
        self.message_count = self.message_count.saturating_add(1);
        if fault {
            self.fault_count = self.fault_count.saturating_add(1);
        }
        self.total_processing_time_ms = self
            .total_processing_time_ms
            .saturating_add(processing_time_ms);
        self.average_processing_time_ms =
            self.total_processing_time_ms as f64 / self.message_count as f64;
    }
}

/// Anything that can report message metrics.
pub trait MetricsSource {
    fn message_metrics(&self) -> MessageMetrics;
}

impl MetricsSource for MessageMetrics {
    fn message_metrics(&self) -> MessageMetrics {
        self.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindingSummary {
    pub name: Option<String>,
    pub binding_type: Option<String>,
    pub uri: Option<String>,
}

impl BindingSummary {
    pub fn from_model(binding: &BindingModel) -> Result<Self> {
        Ok(Self {
            name: binding.name()?,
            binding_type: binding.binding_type(),
            uri: binding.uri()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceSummary {
    pub name: String,
    /// Name of the composite that exposes the reference.
    pub composite: Option<String>,
    pub promoted_reference: Option<String>,
    pub interface: Option<String>,
    pub bindings: Vec<BindingSummary>,
    pub policy_requirements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MessageMetrics>,
}

impl ReferenceSummary {
    pub fn from_model(reference: &CompositeReferenceModel) -> Result<Self> {
        Ok(Self {
            name: reference.display_name()?,
            composite: reference
                .composite()?
                .map(|composite| composite.display_name())
                .transpose()?,
            promoted_reference: reference.promoted_reference()?,
            interface: interface_name(reference.interface()?)?,
            bindings: binding_summaries(reference.bindings()?)?,
            policy_requirements: reference.policy_requirements()?.into_iter().collect(),
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, source: &dyn MetricsSource) -> Self {
        self.metrics = Some(source.message_metrics());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceSummary {
    pub name: String,
    pub composite: Option<String>,
    pub promoted_service: Option<String>,
    pub interface: Option<String>,
    pub bindings: Vec<BindingSummary>,
    pub policy_requirements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MessageMetrics>,
}

impl ServiceSummary {
    pub fn from_model(service: &CompositeServiceModel) -> Result<Self> {
        Ok(Self {
            name: service.display_name()?,
            composite: service
                .composite()?
                .map(|composite| composite.display_name())
                .transpose()?,
            promoted_service: service.promote()?,
            interface: interface_name(service.interface()?)?,
            bindings: binding_summaries(service.bindings()?)?,
            policy_requirements: service.policy_requirements()?.into_iter().collect(),
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, source: &dyn MetricsSource) -> Self {
        self.metrics = Some(source.message_metrics());
        self
    }
}

/// Everything a composite exposes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeSummary {
    pub name: String,
    pub target_namespace: Option<String>,
    pub services: Vec<ServiceSummary>,
    pub references: Vec<ReferenceSummary>,
}

impl CompositeSummary {
    pub fn from_model(composite: &CompositeModel) -> Result<Self> {
        let services = composite
            .services()?
            .iter()
            .map(ServiceSummary::from_model)
            .collect::<Result<Vec<_>>>()?;
        let references = composite
            .references()?
            .iter()
            .map(ReferenceSummary::from_model)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: composite.display_name()?,
            target_namespace: composite.target_namespace()?,
            services,
            references,
        })
    }
}

fn interface_name(interface: Option<InterfaceModel>) -> Result<Option<String>> {
    Ok(match interface {
        Some(interface) => interface.interface()?,
        None => None,
    })
}

fn binding_summaries(bindings: Vec<BindingModel>) -> Result<Vec<BindingSummary>> {
    bindings.iter().map(BindingSummary::from_model).collect()
}
