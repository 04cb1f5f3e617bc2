//! Built-in landing zone topologies

mod kubernetes_workspace;
mod managed_network;

pub use kubernetes_workspace::KubernetesWorkspaceFactory;
pub use managed_network::ManagedNetworkFactory;
