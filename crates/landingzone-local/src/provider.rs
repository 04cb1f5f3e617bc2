//! [`ResourceProvider`] backed by a [`ResourceStore`]

use crate::store::{ResourceStore, StoreState, StoredResource};
use async_trait::async_trait;
use chrono::Utc;
use landingzone::provider::{ProviderResult, ResourceProvider};
use landingzone::resource::subnet_id;
use landingzone::{
    CloudError, DeployedResource, DeployedSubnet, ResourceDefinition, ResourceGroup, ResourceType,
};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::Mutex;

/// Resource group persisted in a local state directory
///
/// Creates are idempotent by name: a second create of the same type and name
/// in the same group fails with [`CloudError::ResourceAlreadyExists`].
#[derive(Debug)]
pub struct LocalResourceGroup {
    store: ResourceStore,
    // Serializes access from this process; the lock file covers other processes
    access: Mutex<()>,
}

impl LocalResourceGroup {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            store: ResourceStore::new(state_dir),
            access: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    async fn read(&self) -> ProviderResult<StoreState> {
        let _access = self.access.lock().await;
        Ok(self.store.load().await?)
    }

    async fn mutate<T, F>(&self, apply: F) -> ProviderResult<T>
    where
        F: FnOnce(&mut StoreState) -> ProviderResult<T> + Send,
    {
        let _access = self.access.lock().await;
        let lock = self.store.acquire_lock().await?;

        let mut state = self.store.load().await?;
        let value = apply(&mut state)?;
        self.store.save(&state).await?;

        lock.release().await?;
        Ok(value)
    }
}

#[async_trait]
impl ResourceProvider for LocalResourceGroup {
    fn name(&self) -> &str {
        "local"
    }

    async fn create_tagged_resource(
        &self,
        resource_group: &ResourceGroup,
        definition: &ResourceDefinition,
        tags: &HashMap<String, String>,
    ) -> ProviderResult<DeployedResource> {
        if definition.name.trim().is_empty() {
            return Err(CloudError::InvalidDefinition(format!(
                "{} without a name",
                definition.resource_type
            )));
        }

        tracing::debug!(
            resource = %definition.name,
            resource_type = %definition.resource_type,
            resource_group = %resource_group.name,
            "Creating local resource"
        );

        self.mutate(|state| {
            if state
                .find(&resource_group.name, definition.resource_type, &definition.name)
                .is_some()
            {
                return Err(CloudError::ResourceAlreadyExists(format!(
                    "{} '{}' in {}",
                    definition.resource_type, definition.name, resource_group.name
                )));
            }

            let resource = DeployedResource {
                resource_id: resource_group.resource_id(definition.resource_type, &definition.name),
                resource_type: definition.resource_type.as_str().to_string(),
                region: definition.region.clone(),
                tags: tags.clone(),
            };
            state.push(StoredResource {
                resource_group: resource_group.name.clone(),
                resource_type: definition.resource_type,
                name: definition.name.clone(),
                resource: resource.clone(),
                subnets: definition.subnets.iter().map(|s| s.name.clone()).collect(),
                created_at: Utc::now(),
            });
            Ok(resource)
        })
        .await
    }

    async fn find_resource(
        &self,
        resource_group: &ResourceGroup,
        resource_type: ResourceType,
        name: &str,
    ) -> ProviderResult<Option<DeployedResource>> {
        Ok(self
            .read()
            .await?
            .find(&resource_group.name, resource_type, name)
            .map(|r| r.resource.clone()))
    }

    async fn list_resources(
        &self,
        resource_group: &ResourceGroup,
    ) -> ProviderResult<Vec<DeployedResource>> {
        Ok(self
            .read()
            .await?
            .in_group(&resource_group.name)
            .map(|r| r.resource.clone())
            .collect())
    }

    async fn get_vnet_subnets(
        &self,
        vnet_resource_id: &str,
    ) -> ProviderResult<HashMap<String, DeployedSubnet>> {
        let state = self.read().await?;
        let vnet = state
            .find_by_id(vnet_resource_id)
            .ok_or_else(|| CloudError::ResourceNotFound(vnet_resource_id.to_string()))?;

        Ok(vnet
            .subnets
            .iter()
            .map(|name| {
                let subnet = DeployedSubnet {
                    resource_id: subnet_id(vnet_resource_id, name),
                    name: name.clone(),
                };
                (name.clone(), subnet)
            })
            .collect())
    }
}
