//! Shared storage plus a managed virtual network

use crate::builder::DeploymentBuilder;
use crate::factory::{FactoryHeader, LandingZoneDefinable, LandingZoneFactory};
use crate::naming::{NameGenerator, max_length};
use crate::purpose::{ResourcePurpose, SubnetResourcePurpose};
use crate::resource::{ResourceDefinition, ResourceGroup, ResourceType, VirtualNetworkDefinition};
use crate::version::DefinitionVersion;

pub const COMPUTE_SUBNET: &str = "compute";
pub const STORAGE_SUBNET: &str = "storage";
pub const BATCH_SUBNET: &str = "batch";

/// Storage account shared by all workspaces and one VNet with purpose-tagged subnets
///
/// - v1: storage account, VNet with compute and storage subnets
/// - v2: v1 plus a batch subnet and a shared Batch account
#[derive(Debug, Default, Clone, Copy)]
pub struct ManagedNetworkFactory;

impl ManagedNetworkFactory {
    pub const IDENTIFIER: &'static str = "managed-network";
}

impl LandingZoneFactory for ManagedNetworkFactory {
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn header(&self) -> FactoryHeader {
        FactoryHeader::new(
            "Managed network with shared resources",
            "Shared storage account and a virtual network with compute and storage subnets",
        )
    }

    fn available_versions(&self) -> Vec<DefinitionVersion> {
        vec![DefinitionVersion::V1, DefinitionVersion::V2]
    }

    fn definable(&self, version: &DefinitionVersion) -> Box<dyn LandingZoneDefinable> {
        Box::new(ManagedNetwork {
            with_batch: *version != DefinitionVersion::V1,
        })
    }
}

struct ManagedNetwork {
    with_batch: bool,
}

impl LandingZoneDefinable for ManagedNetwork {
    fn definition(
        &self,
        builder: DeploymentBuilder,
        resource_group: &ResourceGroup,
    ) -> DeploymentBuilder {
        let names = NameGenerator::new(builder.landing_zone_id());
        let region = &resource_group.region;

        let storage = ResourceDefinition::new(
            ResourceType::StorageAccount,
            names.next_name(max_length::STORAGE_ACCOUNT),
            region,
        )
        .with_property("sku", serde_json::json!("Standard_LRS"));

        let mut vnet = VirtualNetworkDefinition::new(
            names.next_name(max_length::VIRTUAL_NETWORK),
            region,
            "10.1.0.0/27",
        )
        .with_subnet(COMPUTE_SUBNET, "10.1.0.0/29")
        .with_subnet(STORAGE_SUBNET, "10.1.0.8/29");
        if self.with_batch {
            vnet = vnet.with_subnet(BATCH_SUBNET, "10.1.0.16/29");
        }

        let mut builder = builder
            .with_resource_with_purpose(storage, ResourcePurpose::SharedResource)
            .with_vnet_with_purpose(&vnet, COMPUTE_SUBNET, SubnetResourcePurpose::WorkspaceComputeSubnet)
            .with_vnet_with_purpose(&vnet, STORAGE_SUBNET, SubnetResourcePurpose::WorkspaceStorageSubnet);

        if self.with_batch {
            let batch = ResourceDefinition::new(
                ResourceType::BatchAccount,
                names.next_name(max_length::BATCH_ACCOUNT),
                region,
            );
            builder = builder
                .with_vnet_with_purpose(&vnet, BATCH_SUBNET, SubnetResourcePurpose::WorkspaceBatchSubnet)
                .with_resource_with_purpose(batch, ResourcePurpose::SharedResource);
        }

        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryProvider;
    use std::sync::Arc;

    fn plan(version: DefinitionVersion) -> crate::plan::DeploymentPlan {
        let rg = ResourceGroup::new("rg-test", "westeurope", "sub-1");
        let builder =
            DeploymentBuilder::new(Arc::new(InMemoryProvider::new()), rg.clone()).define("lz-1");
        ManagedNetworkFactory
            .create(&version)
            .unwrap()
            .definition(builder, &rg)
            .plan()
    }

    #[test]
    fn test_v1_shape() {
        let plan = plan(DefinitionVersion::V1);
        let types: Vec<_> = plan.resources.iter().map(|r| r.resource_type).collect();
        assert_eq!(types, vec![ResourceType::StorageAccount, ResourceType::VirtualNetwork]);
        assert_eq!(plan.resources[1].subnet_purposes.len(), 2);
        assert!(plan.resources[0].name.len() <= max_length::STORAGE_ACCOUNT);
    }

    #[test]
    fn test_v2_adds_batch() {
        let plan = plan(DefinitionVersion::V2);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.resources[2].resource_type, ResourceType::BatchAccount);
        assert!(plan.resources[1]
            .subnet_purposes
            .contains(&(SubnetResourcePurpose::WorkspaceBatchSubnet, BATCH_SUBNET.to_string())));
    }

    #[test]
    fn test_v2_keeps_v1_names() {
        let v1 = plan(DefinitionVersion::V1);
        let v2 = plan(DefinitionVersion::V2);
        assert_eq!(v1.names(), v2.names()[..2].to_vec());
    }

    #[test]
    fn test_unsupported_version() {
        assert!(ManagedNetworkFactory.create(&DefinitionVersion::V3).is_err());
    }
}
