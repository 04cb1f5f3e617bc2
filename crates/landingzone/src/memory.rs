//! In-memory resource provider for tests
//!
//! Behaves like a cloud that is idempotent-by-name: creating a resource whose
//! type and name already exist in the group fails with
//! [`CloudError::ResourceAlreadyExists`]. Failures and tag/subnet drift can be
//! injected to exercise error paths.

use crate::error::CloudError;
use crate::provider::{ProviderResult, ResourceProvider};
use crate::resource::{
    DeployedResource, DeployedSubnet, ResourceDefinition, ResourceGroup, ResourceType, subnet_id,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
struct StoredResource {
    resource_group: String,
    resource_type: ResourceType,
    name: String,
    resource: DeployedResource,
    subnets: Vec<String>,
}

/// Provider that keeps every resource in process memory
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    resources: Mutex<Vec<StoredResource>>,
    failing_names: Mutex<HashSet<String>>,
    create_calls: AtomicUsize,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every create call for `name` fail with an API error
    pub fn fail_on(&self, name: impl Into<String>) {
        self.lock_failures().insert(name.into());
    }

    /// Stop injecting failures
    pub fn clear_failures(&self) {
        self.lock_failures().clear();
    }

    /// Number of create calls received, including failed ones
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Snapshot of every stored resource, in creation order
    pub fn resources(&self) -> Vec<DeployedResource> {
        self.lock_resources()
            .iter()
            .map(|r| r.resource.clone())
            .collect()
    }

    /// Add a resource that was not created through a deployment
    pub fn insert_foreign(
        &self,
        resource_group: &ResourceGroup,
        resource_type: ResourceType,
        name: &str,
        tags: HashMap<String, String>,
        subnets: &[&str],
    ) -> DeployedResource {
        let resource = DeployedResource {
            resource_id: resource_group.resource_id(resource_type, name),
            resource_type: resource_type.as_str().to_string(),
            region: resource_group.region.clone(),
            tags,
        };
        self.lock_resources().push(StoredResource {
            resource_group: resource_group.name.clone(),
            resource_type,
            name: name.to_string(),
            resource: resource.clone(),
            subnets: subnets.iter().map(|s| s.to_string()).collect(),
        });
        resource
    }

    /// Delete a subnet from a stored virtual network, leaving its tags alone
    pub fn remove_subnet(&self, vnet_resource_id: &str, subnet: &str) -> bool {
        let mut resources = self.lock_resources();
        match resources
            .iter_mut()
            .find(|r| r.resource.resource_id == vnet_resource_id)
        {
            Some(stored) => {
                let before = stored.subnets.len();
                stored.subnets.retain(|s| s != subnet);
                stored.subnets.len() != before
            }
            None => false,
        }
    }

    fn lock_resources(&self) -> std::sync::MutexGuard<'_, Vec<StoredResource>> {
        self.resources
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lock_failures(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.failing_names
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl ResourceProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn create_tagged_resource(
        &self,
        resource_group: &ResourceGroup,
        definition: &ResourceDefinition,
        tags: &HashMap<String, String>,
    ) -> ProviderResult<DeployedResource> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        // Let concurrent deployments interleave between calls
        tokio::task::yield_now().await;

        if self.lock_failures().contains(&definition.name) {
            return Err(CloudError::ApiError(format!(
                "injected failure for {}",
                definition.name
            )));
        }

        let mut resources = self.lock_resources();
        let exists = resources.iter().any(|r| {
            r.resource_group == resource_group.name
                && r.resource_type == definition.resource_type
                && r.name == definition.name
        });
        if exists {
            return Err(CloudError::ResourceAlreadyExists(definition.name.clone()));
        }

        let resource = DeployedResource {
            resource_id: resource_group.resource_id(definition.resource_type, &definition.name),
            resource_type: definition.resource_type.as_str().to_string(),
            region: definition.region.clone(),
            tags: tags.clone(),
        };
        resources.push(StoredResource {
            resource_group: resource_group.name.clone(),
            resource_type: definition.resource_type,
            name: definition.name.clone(),
            resource: resource.clone(),
            subnets: definition.subnets.iter().map(|s| s.name.clone()).collect(),
        });

        Ok(resource)
    }

    async fn find_resource(
        &self,
        resource_group: &ResourceGroup,
        resource_type: ResourceType,
        name: &str,
    ) -> ProviderResult<Option<DeployedResource>> {
        Ok(self
            .lock_resources()
            .iter()
            .find(|r| {
                r.resource_group == resource_group.name
                    && r.resource_type == resource_type
                    && r.name == name
            })
            .map(|r| r.resource.clone()))
    }

    async fn list_resources(
        &self,
        resource_group: &ResourceGroup,
    ) -> ProviderResult<Vec<DeployedResource>> {
        Ok(self
            .lock_resources()
            .iter()
            .filter(|r| r.resource_group == resource_group.name)
            .map(|r| r.resource.clone())
            .collect())
    }

    async fn get_vnet_subnets(
        &self,
        vnet_resource_id: &str,
    ) -> ProviderResult<HashMap<String, DeployedSubnet>> {
        let resources = self.lock_resources();
        let vnet = resources
            .iter()
            .find(|r| r.resource.resource_id == vnet_resource_id)
            .ok_or_else(|| CloudError::ResourceNotFound(vnet_resource_id.to_string()))?;

        Ok(vnet
            .subnets
            .iter()
            .map(|name| {
                (
                    name.clone(),
                    DeployedSubnet {
                        resource_id: subnet_id(vnet_resource_id, name),
                        name: name.clone(),
                    },
                )
            })
            .collect())
    }
}
