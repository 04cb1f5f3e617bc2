//! Purpose vocabulary for tagged resources and subnets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical role of a whole resource within a landing zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourcePurpose {
    /// Shared by every workspace attached to the landing zone
    SharedResource,
    /// Dedicated to workspace compute (clusters, databases, relays)
    WorkspaceResource,
    /// Monitoring and diagnostics sinks
    MonitoringResource,
}

impl ResourcePurpose {
    pub const ALL: &'static [ResourcePurpose] = &[
        ResourcePurpose::SharedResource,
        ResourcePurpose::WorkspaceResource,
        ResourcePurpose::MonitoringResource,
    ];

    /// Tag value for this purpose
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourcePurpose::SharedResource => "SHARED_RESOURCE",
            ResourcePurpose::WorkspaceResource => "WORKSPACE_RESOURCE",
            ResourcePurpose::MonitoringResource => "MONITORING_RESOURCE",
        }
    }
}

impl fmt::Display for ResourcePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourcePurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown resource purpose: {}", s))
    }
}

/// Logical role of a subnet inside a virtual network
///
/// Each value doubles as a tag key on the VNet; the tag value is the subnet name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubnetResourcePurpose {
    WorkspaceComputeSubnet,
    WorkspaceStorageSubnet,
    WorkspaceBatchSubnet,
    AksNodePoolSubnet,
    PostgresqlSubnet,
}

impl SubnetResourcePurpose {
    pub const ALL: &'static [SubnetResourcePurpose] = &[
        SubnetResourcePurpose::WorkspaceComputeSubnet,
        SubnetResourcePurpose::WorkspaceStorageSubnet,
        SubnetResourcePurpose::WorkspaceBatchSubnet,
        SubnetResourcePurpose::AksNodePoolSubnet,
        SubnetResourcePurpose::PostgresqlSubnet,
    ];

    /// Tag key for this purpose
    pub fn as_str(&self) -> &'static str {
        match self {
            SubnetResourcePurpose::WorkspaceComputeSubnet => "WORKSPACE_COMPUTE_SUBNET",
            SubnetResourcePurpose::WorkspaceStorageSubnet => "WORKSPACE_STORAGE_SUBNET",
            SubnetResourcePurpose::WorkspaceBatchSubnet => "WORKSPACE_BATCH_SUBNET",
            SubnetResourcePurpose::AksNodePoolSubnet => "AKS_NODE_POOL_SUBNET",
            SubnetResourcePurpose::PostgresqlSubnet => "POSTGRESQL_SUBNET",
        }
    }
}

impl fmt::Display for SubnetResourcePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubnetResourcePurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown subnet purpose: {}", s))
    }
}
