//! Dry-run view of a deployment

use crate::purpose::{ResourcePurpose, SubnetResourcePurpose};
use crate::resource::ResourceType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every resource a deployment would create, in creation order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentPlan {
    /// Landing zone the resources would be tagged with
    pub landing_zone_id: String,

    /// Resource group the resources would be created in
    pub resource_group: String,

    /// Planned resources in declaration order
    pub resources: Vec<PlannedResource>,
}

/// A single resource in a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedResource {
    pub name: String,
    pub resource_type: ResourceType,
    pub purpose: Option<ResourcePurpose>,
    pub subnet_purposes: Vec<(SubnetResourcePurpose, String)>,

    /// Full tag set that would be applied
    pub tags: BTreeMap<String, String>,
}

impl DeploymentPlan {
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Names in creation order
    pub fn names(&self) -> Vec<&str> {
        self.resources.iter().map(|r| r.name.as_str()).collect()
    }

    /// Planned resources carrying the given purpose
    pub fn resources_by_purpose(&self, purpose: ResourcePurpose) -> Vec<&PlannedResource> {
        self.resources
            .iter()
            .filter(|r| r.purpose == Some(purpose))
            .collect()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            total: self.resources.len(),
            with_purpose: self.resources.iter().filter(|r| r.purpose.is_some()).count(),
            subnet_bindings: self.resources.iter().map(|r| r.subnet_purposes.len()).sum(),
        }
    }
}

/// Summary of planned resources
#[derive(Debug, Clone)]
pub struct PlanSummary {
    pub total: usize,
    pub with_purpose: usize,
    pub subnet_bindings: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to create, {} with purpose, {} subnet bindings",
            self.total, self.with_purpose, self.subnet_bindings
        )
    }
}
