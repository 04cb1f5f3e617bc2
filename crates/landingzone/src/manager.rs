//! Landing zone façade
//!
//! Composes the registry, the factory of a given topology and the deployment
//! builder for writes, and hands out a [`ResourcesReader`] for reads.

use crate::builder::DeploymentBuilder;
use crate::error::{LandingZoneError, Result};
use crate::plan::DeploymentPlan;
use crate::provider::ResourceProvider;
use crate::reader::ResourcesReader;
use crate::registry::{DefinitionRegistry, FactoryDescriptor};
use crate::resource::{DeployedResource, ResourceGroup};
use crate::version::DefinitionVersion;
use futures_util::Stream;
use std::sync::Arc;

/// Entry point for listing, deploying and reading landing zones in one resource group
pub struct LandingZoneManager {
    registry: DefinitionRegistry,
    provider: Arc<dyn ResourceProvider>,
    resource_group: ResourceGroup,
}

impl LandingZoneManager {
    /// Manager over the built-in factory catalog
    pub fn new(provider: Arc<dyn ResourceProvider>, resource_group: ResourceGroup) -> Self {
        Self::with_registry(DefinitionRegistry::new(), provider, resource_group)
    }

    pub fn with_registry(
        registry: DefinitionRegistry,
        provider: Arc<dyn ResourceProvider>,
        resource_group: ResourceGroup,
    ) -> Self {
        Self {
            registry,
            provider,
            resource_group,
        }
    }

    pub fn resource_group(&self) -> &ResourceGroup {
        &self.resource_group
    }

    pub fn list_definition_factories(&self) -> &[FactoryDescriptor] {
        self.registry.list_factories()
    }

    /// Deploy `factory` at `version` as landing zone `landing_zone_id`
    ///
    /// Arguments are validated before the provider is contacted. Deploying
    /// the same landing zone again converges on the resources already created.
    #[tracing::instrument(skip(self), fields(resource_group = %self.resource_group.name))]
    pub async fn deploy_landing_zone(
        &self,
        landing_zone_id: &str,
        factory: &str,
        version: &DefinitionVersion,
    ) -> Result<Vec<DeployedResource>> {
        self.definition(landing_zone_id, factory, version)?
            .deploy()
            .await
    }

    /// Lazy variant of [`deploy_landing_zone`](Self::deploy_landing_zone)
    ///
    /// Argument and catalog errors are returned immediately; resource
    /// creation happens as the stream is polled.
    #[tracing::instrument(skip(self), fields(resource_group = %self.resource_group.name))]
    pub fn deploy_landing_zone_stream(
        &self,
        landing_zone_id: &str,
        factory: &str,
        version: &DefinitionVersion,
    ) -> Result<impl Stream<Item = Result<DeployedResource>> + Send + use<>> {
        Ok(self
            .definition(landing_zone_id, factory, version)?
            .deploy_stream())
    }

    /// What [`deploy_landing_zone`](Self::deploy_landing_zone) would create
    #[tracing::instrument(skip(self), fields(resource_group = %self.resource_group.name))]
    pub fn plan_landing_zone(
        &self,
        landing_zone_id: &str,
        factory: &str,
        version: &DefinitionVersion,
    ) -> Result<DeploymentPlan> {
        Ok(self.definition(landing_zone_id, factory, version)?.plan())
    }

    /// Reader bound to this manager's resource group
    pub fn reader(&self) -> ResourcesReader {
        ResourcesReader::new(Arc::clone(&self.provider), self.resource_group.clone())
    }

    /// Empty builder bound to this manager's resource group
    pub fn builder(&self) -> DeploymentBuilder {
        DeploymentBuilder::new(Arc::clone(&self.provider), self.resource_group.clone())
    }

    fn definition(
        &self,
        landing_zone_id: &str,
        factory: &str,
        version: &DefinitionVersion,
    ) -> Result<DeploymentBuilder> {
        if landing_zone_id.trim().is_empty() {
            return Err(LandingZoneError::InvalidArgument(
                "landing zone id must not be blank".to_string(),
            ));
        }
        if factory.trim().is_empty() {
            return Err(LandingZoneError::InvalidArgument(
                "factory identifier must not be blank".to_string(),
            ));
        }
        if version.is_blank() {
            return Err(LandingZoneError::InvalidArgument(
                "definition version must not be blank".to_string(),
            ));
        }

        let definable = self.registry.create_factory(factory)?.create(version)?;
        let builder = self.builder().define(landing_zone_id);
        Ok(definable.definition(builder, &self.resource_group))
    }
}

impl std::fmt::Debug for LandingZoneManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LandingZoneManager")
            .field("provider", &self.provider.name())
            .field("resource_group", &self.resource_group)
            .field("factories", &self.registry.list_factories().len())
            .finish()
    }
}
