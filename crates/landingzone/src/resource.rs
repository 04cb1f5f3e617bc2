//! Resource definitions and deployed-resource snapshots

use crate::purpose::SubnetResourcePurpose;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Resource group that a landing zone is deployed into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroup {
    /// Resource group name
    pub name: String,

    /// Region every landing zone resource is placed in
    pub region: String,

    /// Subscription that owns the resource group
    pub subscription_id: String,
}

impl ResourceGroup {
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        subscription_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            subscription_id: subscription_id.into(),
        }
    }

    /// Resource group identifier
    pub fn id(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}",
            self.subscription_id, self.name
        )
    }

    /// Identifier of a resource of the given type and name in this group
    pub fn resource_id(&self, resource_type: ResourceType, name: &str) -> String {
        format!("{}/providers/{}/{}", self.id(), resource_type.as_str(), name)
    }
}

/// Identifier of a subnet inside a virtual network
pub fn subnet_id(vnet_id: &str, subnet: &str) -> String {
    format!("{}/subnets/{}", vnet_id, subnet)
}

/// Resource types a landing zone can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
    StorageAccount,
    VirtualNetwork,
    KubernetesCluster,
    LogAnalyticsWorkspace,
    PostgresServer,
    RelayNamespace,
    BatchAccount,
}

impl ResourceType {
    pub const ALL: &'static [ResourceType] = &[
        ResourceType::StorageAccount,
        ResourceType::VirtualNetwork,
        ResourceType::KubernetesCluster,
        ResourceType::LogAnalyticsWorkspace,
        ResourceType::PostgresServer,
        ResourceType::RelayNamespace,
        ResourceType::BatchAccount,
    ];

    /// Provider type string
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::StorageAccount => "Microsoft.Storage/storageAccounts",
            ResourceType::VirtualNetwork => "Microsoft.Network/virtualNetworks",
            ResourceType::KubernetesCluster => "Microsoft.ContainerService/managedClusters",
            ResourceType::LogAnalyticsWorkspace => "Microsoft.OperationalInsights/workspaces",
            ResourceType::PostgresServer => "Microsoft.DBforPostgreSQL/flexibleServers",
            ResourceType::RelayNamespace => "Microsoft.Relay/namespaces",
            ResourceType::BatchAccount => "Microsoft.Batch/batchAccounts",
        }
    }

    /// Provider type strings are case-insensitive
    pub fn matches(&self, provider_type: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(provider_type)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|t| t.matches(s))
            .copied()
            .ok_or_else(|| format!("unsupported resource type: {}", s))
    }
}

/// A resource to create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Resource name (unique per type within the resource group)
    pub name: String,

    pub resource_type: ResourceType,

    pub region: String,

    /// Type-specific settings passed through to the provider
    pub properties: serde_json::Value,

    /// Subnets, for virtual networks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subnets: Vec<SubnetDefinition>,
}

impl ResourceDefinition {
    pub fn new(
        resource_type: ResourceType,
        name: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            resource_type,
            region: region.into(),
            properties: serde_json::Value::Object(Default::default()),
            subnets: Vec::new(),
        }
    }

    /// Set a single property
    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        if let serde_json::Value::Object(ref mut map) = self.properties {
            map.insert(key.into(), value);
        }
        self
    }

    /// Get a property as a specific type
    pub fn get_property<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.properties
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn has_subnet(&self, name: &str) -> bool {
        self.subnets.iter().any(|s| s.name == name)
    }
}

/// Typed definition of a virtual network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualNetworkDefinition {
    pub name: String,
    pub region: String,
    pub address_space: String,
    pub subnets: Vec<SubnetDefinition>,
}

impl VirtualNetworkDefinition {
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        address_space: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            address_space: address_space.into(),
            subnets: Vec::new(),
        }
    }

    pub fn with_subnet(mut self, name: impl Into<String>, address_prefix: impl Into<String>) -> Self {
        self.subnets.push(SubnetDefinition {
            name: name.into(),
            address_prefix: address_prefix.into(),
        });
        self
    }
}

impl From<&VirtualNetworkDefinition> for ResourceDefinition {
    fn from(vnet: &VirtualNetworkDefinition) -> Self {
        let mut def = ResourceDefinition::new(ResourceType::VirtualNetwork, &vnet.name, &vnet.region)
            .with_property("address_space", serde_json::json!(vnet.address_space));
        def.subnets = vnet.subnets.clone();
        def
    }
}

/// Subnet declared inside a virtual network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetDefinition {
    pub name: String,
    pub address_prefix: String,
}

/// Snapshot of a resource as the provider reported it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedResource {
    /// Provider resource identifier
    pub resource_id: String,

    /// Provider type string
    pub resource_type: String,

    pub region: String,

    pub tags: HashMap<String, String>,
}

impl DeployedResource {
    /// Last segment of the resource id
    pub fn name(&self) -> &str {
        self.resource_id
            .rsplit('/')
            .next()
            .unwrap_or(&self.resource_id)
    }

    pub fn is_type(&self, resource_type: ResourceType) -> bool {
        resource_type.matches(&self.resource_type)
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// Subnet resolved from a virtual network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedSubnet {
    pub resource_id: String,
    pub name: String,
}

/// Virtual network with its purpose-tagged subnets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedVNet {
    pub resource_id: String,
    pub region: String,
    pub subnets_by_purpose: BTreeMap<SubnetResourcePurpose, DeployedSubnet>,
}

impl DeployedVNet {
    pub fn subnet(&self, purpose: SubnetResourcePurpose) -> Option<&DeployedSubnet> {
        self.subnets_by_purpose.get(&purpose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_ids() {
        let rg = ResourceGroup::new("rg-dev", "eastus", "sub-1");
        let id = rg.resource_id(ResourceType::VirtualNetwork, "lzabc");
        assert_eq!(
            id,
            "/subscriptions/sub-1/resourceGroups/rg-dev/providers/Microsoft.Network/virtualNetworks/lzabc"
        );
        assert_eq!(subnet_id(&id, "compute"), format!("{}/subnets/compute", id));
    }

    #[test]
    fn test_resource_type_matches_case_insensitively() {
        assert!(ResourceType::VirtualNetwork.matches("microsoft.network/virtualnetworks"));
        assert!(!ResourceType::VirtualNetwork.matches("Microsoft.Storage/storageAccounts"));
        assert_eq!(
            "MICROSOFT.STORAGE/STORAGEACCOUNTS".parse::<ResourceType>().unwrap(),
            ResourceType::StorageAccount
        );
    }

    #[test]
    fn test_vnet_definition_conversion() {
        let vnet = VirtualNetworkDefinition::new("net", "eastus", "10.1.0.0/27")
            .with_subnet("compute", "10.1.0.0/29")
            .with_subnet("storage", "10.1.0.8/29");
        let def = ResourceDefinition::from(&vnet);

        assert_eq!(def.resource_type, ResourceType::VirtualNetwork);
        assert!(def.has_subnet("compute"));
        assert!(!def.has_subnet("batch"));
        assert_eq!(
            def.get_property::<String>("address_space").as_deref(),
            Some("10.1.0.0/27")
        );
    }

    #[test]
    fn test_deployed_resource_name() {
        let resource = DeployedResource {
            resource_id: "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/lz123".to_string(),
            resource_type: "Microsoft.Storage/storageAccounts".to_string(),
            region: "eastus".to_string(),
            tags: HashMap::new(),
        };
        assert_eq!(resource.name(), "lz123");
        assert!(resource.is_type(ResourceType::StorageAccount));
    }
}
