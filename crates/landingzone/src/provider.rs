//! Resource provider trait definition

use crate::error::CloudError;
use crate::resource::{DeployedResource, DeployedSubnet, ResourceDefinition, ResourceGroup, ResourceType};
use async_trait::async_trait;
use std::collections::HashMap;

/// Result type for provider calls
pub type ProviderResult<T> = std::result::Result<T, CloudError>;

/// Cloud provider abstraction trait
///
/// Deployments and readers only reach the cloud through this trait.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Returns the provider name (e.g., "local", "in-memory")
    fn name(&self) -> &str;

    /// Create a resource with all of `tags` applied in the same call
    ///
    /// A resource that is created must never be observable without its tags.
    /// A name collision with an existing resource of the same type is reported
    /// as [`CloudError::ResourceAlreadyExists`].
    async fn create_tagged_resource(
        &self,
        resource_group: &ResourceGroup,
        definition: &ResourceDefinition,
        tags: &HashMap<String, String>,
    ) -> ProviderResult<DeployedResource>;

    /// Look up a resource by type and name
    async fn find_resource(
        &self,
        resource_group: &ResourceGroup,
        resource_type: ResourceType,
        name: &str,
    ) -> ProviderResult<Option<DeployedResource>>;

    /// List every resource in the group with its current tags
    async fn list_resources(
        &self,
        resource_group: &ResourceGroup,
    ) -> ProviderResult<Vec<DeployedResource>>;

    /// Subnets of a virtual network, keyed by subnet name
    async fn get_vnet_subnets(
        &self,
        vnet_resource_id: &str,
    ) -> ProviderResult<HashMap<String, DeployedSubnet>>;
}
