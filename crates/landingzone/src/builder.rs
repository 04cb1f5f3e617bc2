//! Fluent deployment builder
//!
//! A [`DeploymentBuilder`] accumulates "resource + purpose" declarations for a
//! single landing zone and executes them in declaration order. Every `with_*`
//! call returns a new builder and leaves the receiver untouched, so a builder
//! can be planned, cloned and deployed independently.

use crate::error::{CloudError, LandingZoneError, Result};
use crate::plan::{DeploymentPlan, PlannedResource};
use crate::provider::ResourceProvider;
use crate::purpose::{ResourcePurpose, SubnetResourcePurpose};
use crate::resource::{
    DeployedResource, ResourceDefinition, ResourceGroup, ResourceType, VirtualNetworkDefinition,
};
use crate::tags::{self, TagSet};
use futures_util::{Stream, TryStreamExt, stream};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One declared resource
#[derive(Debug, Clone)]
struct ResourceEntry {
    definition: ResourceDefinition,
    purpose: Option<ResourcePurpose>,
    subnet_purposes: Vec<(SubnetResourcePurpose, String)>,
}

/// Accumulates and executes the resources of one landing zone
#[derive(Clone)]
pub struct DeploymentBuilder {
    provider: Arc<dyn ResourceProvider>,
    resource_group: ResourceGroup,
    landing_zone_id: String,
    entries: Arc<Vec<ResourceEntry>>,
}

impl DeploymentBuilder {
    /// Builder targeting `resource_group`; call [`define`](Self::define) before declaring resources
    pub fn new(provider: Arc<dyn ResourceProvider>, resource_group: ResourceGroup) -> Self {
        Self {
            provider,
            resource_group,
            landing_zone_id: String::new(),
            entries: Arc::new(Vec::new()),
        }
    }

    /// Start a landing zone definition, tagging every later resource with `landing_zone_id`
    pub fn define(&self, landing_zone_id: impl Into<String>) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            resource_group: self.resource_group.clone(),
            landing_zone_id: landing_zone_id.into(),
            entries: Arc::new(Vec::new()),
        }
    }

    /// Declare a resource owned by the landing zone but not classified
    pub fn with_resource(&self, definition: ResourceDefinition) -> Self {
        self.push(ResourceEntry {
            definition,
            purpose: None,
            subnet_purposes: Vec::new(),
        })
    }

    /// Declare a resource tagged with `purpose`
    pub fn with_resource_with_purpose(
        &self,
        definition: ResourceDefinition,
        purpose: ResourcePurpose,
    ) -> Self {
        self.push(ResourceEntry {
            definition,
            purpose: Some(purpose),
            subnet_purposes: Vec::new(),
        })
    }

    /// Declare a virtual network whose `subnet` serves `purpose`
    ///
    /// Repeated calls for the same VNet name extend the existing declaration
    /// instead of declaring a second network.
    pub fn with_vnet_with_purpose(
        &self,
        vnet: &VirtualNetworkDefinition,
        subnet: impl Into<String>,
        purpose: SubnetResourcePurpose,
    ) -> Self {
        let subnet = subnet.into();
        let mut entries = (*self.entries).clone();

        let existing = entries.iter_mut().find(|e| {
            e.definition.resource_type == ResourceType::VirtualNetwork
                && e.definition.name == vnet.name
        });

        match existing {
            Some(entry) => {
                entry.subnet_purposes.retain(|(p, _)| *p != purpose);
                entry.subnet_purposes.push((purpose, subnet));
            }
            None => entries.push(ResourceEntry {
                definition: ResourceDefinition::from(vnet),
                purpose: None,
                subnet_purposes: vec![(purpose, subnet)],
            }),
        }

        self.with_entries(entries)
    }

    pub fn landing_zone_id(&self) -> &str {
        &self.landing_zone_id
    }

    pub fn resource_group(&self) -> &ResourceGroup {
        &self.resource_group
    }

    /// Number of declared resources
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// What [`deploy`](Self::deploy) would create, without calling the provider
    pub fn plan(&self) -> DeploymentPlan {
        DeploymentPlan {
            landing_zone_id: self.landing_zone_id.clone(),
            resource_group: self.resource_group.name.clone(),
            resources: self
                .entries
                .iter()
                .map(|entry| PlannedResource {
                    name: entry.definition.name.clone(),
                    resource_type: entry.definition.resource_type,
                    purpose: entry.purpose,
                    subnet_purposes: entry.subnet_purposes.clone(),
                    tags: self.tags_for(entry).into_map().into_iter().collect(),
                })
                .collect(),
        }
    }

    /// Create every declared resource, in order
    ///
    /// Stops at the first failure; resources created before it stay in place.
    pub async fn deploy(&self) -> Result<Vec<DeployedResource>> {
        info!(
            landing_zone_id = %self.landing_zone_id,
            resource_group = %self.resource_group.name,
            resources = self.entries.len(),
            "Deploying landing zone"
        );

        let deployed: Vec<DeployedResource> = self.deploy_stream().try_collect().await?;

        info!(
            landing_zone_id = %self.landing_zone_id,
            resources = deployed.len(),
            "Landing zone deployed"
        );
        Ok(deployed)
    }

    /// Lazy variant of [`deploy`](Self::deploy)
    ///
    /// Nothing is created until the stream is polled; each poll creates the
    /// next declared resource. The first error ends the stream.
    pub fn deploy_stream(&self) -> impl Stream<Item = Result<DeployedResource>> + Send + use<> {
        let builder = self.clone();
        stream::unfold(Some((builder, 0usize)), |state| async move {
            let (builder, index) = state?;

            if index == 0 {
                if let Err(e) = builder.validate() {
                    return Some((Err(e), None));
                }
            }

            let entry = builder.entries.get(index)?.clone();
            match builder.create_entry(&entry).await {
                Ok(resource) => Some((Ok(resource), Some((builder, index + 1)))),
                Err(e) => Some((Err(e), None)),
            }
        })
    }

    /// Check declarations before anything is created
    pub fn validate(&self) -> Result<()> {
        if self.landing_zone_id.trim().is_empty() {
            return Err(LandingZoneError::InvalidArgument(
                "landing zone id must not be blank".to_string(),
            ));
        }

        for entry in self.entries.iter() {
            let def = &entry.definition;
            if def.name.trim().is_empty() {
                return Err(LandingZoneError::InvalidArgument(format!(
                    "{} declared without a name",
                    def.resource_type
                )));
            }
            for (purpose, subnet) in &entry.subnet_purposes {
                if !def.has_subnet(subnet) {
                    return Err(LandingZoneError::InvalidArgument(format!(
                        "subnet '{}' tagged {} is not defined in virtual network '{}'",
                        subnet, purpose, def.name
                    )));
                }
            }
        }

        Ok(())
    }

    fn push(&self, entry: ResourceEntry) -> Self {
        let mut entries = (*self.entries).clone();
        entries.push(entry);
        self.with_entries(entries)
    }

    fn with_entries(&self, entries: Vec<ResourceEntry>) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            resource_group: self.resource_group.clone(),
            landing_zone_id: self.landing_zone_id.clone(),
            entries: Arc::new(entries),
        }
    }

    fn tags_for(&self, entry: &ResourceEntry) -> TagSet {
        let mut tags = TagSet::owned_by(&self.landing_zone_id);
        if let Some(purpose) = entry.purpose {
            tags = tags.with_purpose(purpose);
        }
        for (purpose, subnet) in &entry.subnet_purposes {
            tags = tags.with_subnet_purpose(*purpose, subnet);
        }
        tags
    }

    async fn create_entry(&self, entry: &ResourceEntry) -> Result<DeployedResource> {
        let def = &entry.definition;
        let tags = self.tags_for(entry);

        debug!(
            resource = %def.name,
            resource_type = %def.resource_type,
            landing_zone_id = %self.landing_zone_id,
            "Creating tagged resource"
        );

        match self
            .provider
            .create_tagged_resource(&self.resource_group, def, tags.as_map())
            .await
        {
            Ok(resource) => Ok(resource),
            Err(CloudError::ResourceAlreadyExists(message)) => {
                self.converge_on_existing(def, &tags, message).await
            }
            Err(source) => Err(creation_error(def, source)),
        }
    }

    /// Resolve a name collision into the resource that won it
    ///
    /// The existing resource is adopted only if it is owned by this landing
    /// zone and carries the same purpose and subnet-purpose tags this
    /// declaration would apply.
    async fn converge_on_existing(
        &self,
        def: &ResourceDefinition,
        expected: &TagSet,
        message: String,
    ) -> Result<DeployedResource> {
        let existing = self
            .provider
            .find_resource(&self.resource_group, def.resource_type, &def.name)
            .await
            .map_err(|e| creation_error(def, e))?;

        let Some(resource) = existing else {
            return Err(creation_error(def, CloudError::ResourceAlreadyExists(message)));
        };

        if tags::landing_zone_id(&resource.tags) != Some(self.landing_zone_id.as_str()) {
            return Err(creation_error(def, CloudError::ResourceAlreadyExists(message)));
        }

        let drifted: Vec<&str> = tags::managed_keys()
            .filter(|key| resource.tags.get(*key) != expected.as_map().get(*key))
            .collect();
        if !drifted.is_empty() {
            return Err(creation_error(
                def,
                CloudError::ResourceAlreadyExists(format!(
                    "{} exists with different tags ({})",
                    def.name,
                    drifted.join(", ")
                )),
            ));
        }

        warn!(
            resource = %def.name,
            landing_zone_id = %self.landing_zone_id,
            "Resource already exists, using existing instance"
        );
        Ok(resource)
    }
}

fn creation_error(def: &ResourceDefinition, source: CloudError) -> LandingZoneError {
    LandingZoneError::ResourceCreation {
        resource: def.name.clone(),
        resource_type: def.resource_type.to_string(),
        source,
    }
}

impl std::fmt::Debug for DeploymentBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentBuilder")
            .field("provider", &self.provider.name())
            .field("resource_group", &self.resource_group.name)
            .field("landing_zone_id", &self.landing_zone_id)
            .field("entries", &self.entries.len())
            .finish()
    }
}
