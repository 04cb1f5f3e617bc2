//! Kubernetes-based workspace topology

use crate::builder::DeploymentBuilder;
use crate::factory::{FactoryHeader, LandingZoneDefinable, LandingZoneFactory};
use crate::naming::{NameGenerator, max_length};
use crate::purpose::{ResourcePurpose, SubnetResourcePurpose};
use crate::resource::{ResourceDefinition, ResourceGroup, ResourceType, VirtualNetworkDefinition};
use crate::version::DefinitionVersion;

pub const AKS_SUBNET: &str = "aks";
pub const POSTGRES_SUBNET: &str = "postgres";
pub const COMPUTE_SUBNET: &str = "compute";

/// Cluster, database and relay for running workspace workloads
#[derive(Debug, Default, Clone, Copy)]
pub struct KubernetesWorkspaceFactory;

impl KubernetesWorkspaceFactory {
    pub const IDENTIFIER: &'static str = "kubernetes-workspace";
}

impl LandingZoneFactory for KubernetesWorkspaceFactory {
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn header(&self) -> FactoryHeader {
        FactoryHeader::new(
            "Kubernetes workspace",
            "Kubernetes cluster, PostgreSQL server and relay behind a shared network, \
             with shared storage and log analytics",
        )
    }

    fn available_versions(&self) -> Vec<DefinitionVersion> {
        vec![DefinitionVersion::V1]
    }

    fn definable(&self, _version: &DefinitionVersion) -> Box<dyn LandingZoneDefinable> {
        Box::new(KubernetesWorkspace)
    }
}

struct KubernetesWorkspace;

impl LandingZoneDefinable for KubernetesWorkspace {
    fn definition(
        &self,
        builder: DeploymentBuilder,
        resource_group: &ResourceGroup,
    ) -> DeploymentBuilder {
        let names = NameGenerator::new(builder.landing_zone_id());
        let region = &resource_group.region;

        let vnet = VirtualNetworkDefinition::new(
            names.next_name(max_length::VIRTUAL_NETWORK),
            region,
            "10.1.0.0/16",
        )
        .with_subnet(AKS_SUBNET, "10.1.0.0/22")
        .with_subnet(POSTGRES_SUBNET, "10.1.4.0/24")
        .with_subnet(COMPUTE_SUBNET, "10.1.5.0/24");

        let log_analytics = ResourceDefinition::new(
            ResourceType::LogAnalyticsWorkspace,
            names.next_name(max_length::LOG_ANALYTICS_WORKSPACE),
            region,
        )
        .with_property("retention_days", serde_json::json!(30));

        let storage = ResourceDefinition::new(
            ResourceType::StorageAccount,
            names.next_name(max_length::STORAGE_ACCOUNT),
            region,
        )
        .with_property("sku", serde_json::json!("Standard_LRS"));

        let postgres = ResourceDefinition::new(
            ResourceType::PostgresServer,
            names.next_name(max_length::POSTGRES_SERVER),
            region,
        )
        .with_property("version", serde_json::json!("14"))
        .with_property("subnet", serde_json::json!(POSTGRES_SUBNET));

        let cluster = ResourceDefinition::new(
            ResourceType::KubernetesCluster,
            names.next_name(max_length::KUBERNETES_CLUSTER),
            region,
        )
        .with_property("node_count", serde_json::json!(1))
        .with_property("vm_size", serde_json::json!("Standard_A2_v2"))
        .with_property("subnet", serde_json::json!(AKS_SUBNET));

        let relay = ResourceDefinition::new(
            ResourceType::RelayNamespace,
            names.next_name(max_length::RELAY_NAMESPACE),
            region,
        );

        builder
            .with_vnet_with_purpose(&vnet, AKS_SUBNET, SubnetResourcePurpose::AksNodePoolSubnet)
            .with_vnet_with_purpose(&vnet, POSTGRES_SUBNET, SubnetResourcePurpose::PostgresqlSubnet)
            .with_vnet_with_purpose(
                &vnet,
                COMPUTE_SUBNET,
                SubnetResourcePurpose::WorkspaceComputeSubnet,
            )
            .with_resource_with_purpose(log_analytics, ResourcePurpose::MonitoringResource)
            .with_resource_with_purpose(storage, ResourcePurpose::SharedResource)
            .with_resource_with_purpose(postgres, ResourcePurpose::WorkspaceResource)
            .with_resource_with_purpose(cluster, ResourcePurpose::WorkspaceResource)
            .with_resource(relay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryProvider;
    use std::sync::Arc;

    #[test]
    fn test_names_respect_type_limits() {
        let rg = ResourceGroup::new("rg-test", "eastus", "sub-1");
        let builder =
            DeploymentBuilder::new(Arc::new(InMemoryProvider::new()), rg.clone()).define("lz-k8s");
        let plan = KubernetesWorkspaceFactory
            .create(&DefinitionVersion::V1)
            .unwrap()
            .definition(builder, &rg)
            .plan();

        assert_eq!(plan.len(), 6);
        for resource in &plan.resources {
            let limit = match resource.resource_type {
                ResourceType::StorageAccount => max_length::STORAGE_ACCOUNT,
                ResourceType::KubernetesCluster => max_length::KUBERNETES_CLUSTER,
                ResourceType::RelayNamespace => max_length::RELAY_NAMESPACE,
                ResourceType::LogAnalyticsWorkspace => max_length::LOG_ANALYTICS_WORKSPACE,
                ResourceType::PostgresServer => max_length::POSTGRES_SERVER,
                _ => max_length::VIRTUAL_NETWORK,
            };
            assert!(resource.name.len() <= limit, "{} too long", resource.name);
        }
        assert_eq!(plan.resources[0].subnet_purposes.len(), 3);
        assert_eq!(
            plan.resources_by_purpose(ResourcePurpose::WorkspaceResource).len(),
            2
        );
    }
}
