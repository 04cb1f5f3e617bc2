//! Catalog of landing zone factories
//!
//! The catalog is a closed, compile-time list: a landing zone shape ships with
//! the application, it is not discovered at runtime.

use crate::error::{LandingZoneError, Result};
use crate::factories::{KubernetesWorkspaceFactory, ManagedNetworkFactory};
use crate::factory::LandingZoneFactory;
use crate::version::DefinitionVersion;
use serde::{Deserialize, Serialize};

/// Catalog entry: identifier plus a side-effect-free constructor
#[derive(Clone, Copy)]
pub struct FactoryRegistration {
    pub identifier: &'static str,
    pub construct: fn() -> Box<dyn LandingZoneFactory>,
}

/// Factories shipped with this crate
pub const BUILTIN_FACTORIES: &[FactoryRegistration] = &[
    FactoryRegistration {
        identifier: ManagedNetworkFactory::IDENTIFIER,
        construct: managed_network,
    },
    FactoryRegistration {
        identifier: KubernetesWorkspaceFactory::IDENTIFIER,
        construct: kubernetes_workspace,
    },
];

fn managed_network() -> Box<dyn LandingZoneFactory> {
    Box::new(ManagedNetworkFactory)
}

fn kubernetes_workspace() -> Box<dyn LandingZoneFactory> {
    Box::new(KubernetesWorkspaceFactory)
}

/// Listing entry for one factory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryDescriptor {
    pub identifier: String,
    pub display_name: String,
    pub description: String,
    pub supported_versions: Vec<DefinitionVersion>,
}

/// Enumerates and instantiates landing zone factories
pub struct DefinitionRegistry {
    catalog: Vec<FactoryRegistration>,
    descriptors: Vec<FactoryDescriptor>,
}

impl DefinitionRegistry {
    /// Registry over [`BUILTIN_FACTORIES`]
    pub fn new() -> Self {
        Self::with_catalog(BUILTIN_FACTORIES)
    }

    /// Registry over an explicit catalog
    pub fn with_catalog(catalog: &[FactoryRegistration]) -> Self {
        let descriptors = catalog
            .iter()
            .map(|registration| {
                let factory = (registration.construct)();
                let header = factory.header();
                FactoryDescriptor {
                    identifier: registration.identifier.to_string(),
                    display_name: header.name,
                    description: header.description,
                    supported_versions: factory.available_versions(),
                }
            })
            .collect();

        Self {
            catalog: catalog.to_vec(),
            descriptors,
        }
    }

    /// Every registered factory with the versions it supports
    pub fn list_factories(&self) -> &[FactoryDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, identifier: &str) -> Option<&FactoryDescriptor> {
        self.descriptors.iter().find(|d| d.identifier == identifier)
    }

    /// Instantiate the factory registered under `identifier`
    pub fn create_factory(&self, identifier: &str) -> Result<Box<dyn LandingZoneFactory>> {
        self.catalog
            .iter()
            .find(|r| r.identifier == identifier)
            .map(|r| (r.construct)())
            .ok_or_else(|| LandingZoneError::UnknownFactory(identifier.to_string()))
    }
}

impl Default for DefinitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DefinitionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefinitionRegistry")
            .field("descriptors", &self.descriptors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_factories() {
        let registry = DefinitionRegistry::new();
        let factories = registry.list_factories();
        assert_eq!(factories.len(), 2);

        let network = registry.descriptor("managed-network").unwrap();
        assert_eq!(
            network.supported_versions,
            vec![DefinitionVersion::V1, DefinitionVersion::V2]
        );

        let k8s = registry.descriptor("kubernetes-workspace").unwrap();
        assert_eq!(k8s.supported_versions, vec![DefinitionVersion::V1]);
        assert!(!k8s.display_name.is_empty());
    }

    #[test]
    fn test_create_factory() {
        let registry = DefinitionRegistry::new();
        let factory = registry.create_factory("managed-network").unwrap();
        assert_eq!(factory.header().name, "Managed network with shared resources");
        assert_eq!(factory.identifier(), "managed-network");
    }

    #[test]
    fn test_unknown_factory() {
        let registry = DefinitionRegistry::new();
        let err = registry.create_factory("does-not-exist").err().unwrap();
        assert!(matches!(err, LandingZoneError::UnknownFactory(ref id) if id == "does-not-exist"));
    }

    #[test]
    fn test_unsupported_version() {
        let registry = DefinitionRegistry::new();
        let factory = registry.create_factory("kubernetes-workspace").unwrap();
        let err = factory.create(&DefinitionVersion::V3).err().unwrap();
        assert!(matches!(
            err,
            LandingZoneError::UnsupportedVersion { ref factory, ref version }
                if factory == "kubernetes-workspace" && version == "v3"
        ));
        assert!(factory.create(&DefinitionVersion::V1).is_ok());
    }

    #[test]
    fn test_custom_catalog() {
        let registry = DefinitionRegistry::with_catalog(&BUILTIN_FACTORIES[..1]);
        assert_eq!(registry.list_factories().len(), 1);
        assert!(registry.create_factory("kubernetes-workspace").is_err());
    }
}
