//! Reconstruct landing zone topology from live resource tags
//!
//! Every query lists the resource group through the provider; nothing is
//! cached, so results always reflect the tags currently on the resources.

use crate::error::{LandingZoneError, Result};
use crate::provider::ResourceProvider;
use crate::purpose::{ResourcePurpose, SubnetResourcePurpose};
use crate::resource::{DeployedResource, DeployedVNet, ResourceGroup, ResourceType};
use crate::tags;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Read-only view of the landing zones in one resource group
#[derive(Clone)]
pub struct ResourcesReader {
    provider: Arc<dyn ResourceProvider>,
    resource_group: ResourceGroup,
    landing_zone_id: Option<String>,
}

impl ResourcesReader {
    pub fn new(provider: Arc<dyn ResourceProvider>, resource_group: ResourceGroup) -> Self {
        Self {
            provider,
            resource_group,
            landing_zone_id: None,
        }
    }

    /// Same reader, restricted to resources owned by `landing_zone_id`
    pub fn for_landing_zone(&self, landing_zone_id: impl Into<String>) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            resource_group: self.resource_group.clone(),
            landing_zone_id: Some(landing_zone_id.into()),
        }
    }

    pub fn resource_group(&self) -> &ResourceGroup {
        &self.resource_group
    }

    /// Resources tagged [`ResourcePurpose::SharedResource`]
    pub async fn list_shared_resources(&self) -> Result<Vec<DeployedResource>> {
        self.list_resources_by_purpose(ResourcePurpose::SharedResource)
            .await
    }

    /// Resources tagged with `purpose`
    pub async fn list_resources_by_purpose(
        &self,
        purpose: ResourcePurpose,
    ) -> Result<Vec<DeployedResource>> {
        let resources: Vec<_> = self
            .scoped_resources()
            .await?
            .into_iter()
            .filter(|r| tags::resource_purpose(&r.tags) == Some(purpose))
            .collect();

        debug!(%purpose, count = resources.len(), "Listed resources by purpose");
        Ok(resources)
    }

    /// Every resource owned by a landing zone, regardless of purpose
    ///
    /// Unscoped readers return resources of any landing zone; untagged
    /// resources are never included.
    pub async fn list_landing_zone_resources(&self) -> Result<Vec<DeployedResource>> {
        Ok(self
            .scoped_resources()
            .await?
            .into_iter()
            .filter(|r| tags::landing_zone_id(&r.tags).is_some())
            .collect())
    }

    /// Virtual networks that have a subnet tagged `purpose`
    ///
    /// Each returned network carries its complete purpose map, not just the
    /// requested entry. A tag naming a subnet the network no longer has is
    /// reported as [`LandingZoneError::TagReconstruction`].
    pub async fn list_vnet_with_subnet_purpose(
        &self,
        purpose: SubnetResourcePurpose,
    ) -> Result<Vec<DeployedVNet>> {
        let candidates: Vec<_> = self
            .scoped_resources()
            .await?
            .into_iter()
            .filter(|r| r.is_type(ResourceType::VirtualNetwork))
            .filter(|r| r.tags.contains_key(purpose.as_str()))
            .collect();

        let mut vnets = Vec::with_capacity(candidates.len());
        for resource in candidates {
            vnets.push(self.resolve_vnet(resource).await?);
        }

        debug!(%purpose, count = vnets.len(), "Listed virtual networks by subnet purpose");
        Ok(vnets)
    }

    async fn resolve_vnet(&self, resource: DeployedResource) -> Result<DeployedVNet> {
        let live_subnets = self
            .provider
            .get_vnet_subnets(&resource.resource_id)
            .await?;

        let mut subnets_by_purpose = BTreeMap::new();
        for (purpose, subnet_name) in tags::subnet_purposes(&resource.tags) {
            let subnet = live_subnets.get(subnet_name).ok_or_else(|| {
                LandingZoneError::TagReconstruction {
                    vnet_id: resource.resource_id.clone(),
                    subnet: subnet_name.to_string(),
                    purpose,
                }
            })?;
            subnets_by_purpose.insert(purpose, subnet.clone());
        }

        Ok(DeployedVNet {
            resource_id: resource.resource_id,
            region: resource.region,
            subnets_by_purpose,
        })
    }

    async fn scoped_resources(&self) -> Result<Vec<DeployedResource>> {
        let resources = self.provider.list_resources(&self.resource_group).await?;

        Ok(match &self.landing_zone_id {
            Some(id) => resources
                .into_iter()
                .filter(|r| tags::landing_zone_id(&r.tags) == Some(id.as_str()))
                .collect(),
            None => resources,
        })
    }
}

impl std::fmt::Debug for ResourcesReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcesReader")
            .field("provider", &self.provider.name())
            .field("resource_group", &self.resource_group.name)
            .field("landing_zone_id", &self.landing_zone_id)
            .finish()
    }
}
