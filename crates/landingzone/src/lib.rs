//! Landing Zones
//!
//! Declarative, tag-driven provisioning of cloud "landing zones": named sets
//! of resources deployed together and classified by purpose.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                LandingZoneManager                │
//! │    list factories / deploy / plan / reader()     │
//! └───────┬─────────────────────────────┬────────────┘
//!         │ writes                      │ reads
//! ┌───────▼────────────┐        ┌───────▼────────────┐
//! │ DefinitionRegistry │        │ ResourcesReader    │
//! │  → Factory         │        │  tags → topology   │
//! │  → Builder         │        └───────▲────────────┘
//! └───────┬────────────┘                │
//!         │ create + tag                │ list + tags
//! ┌───────▼─────────────────────────────┴────────────┐
//! │          trait ResourceProvider { ... }          │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! The write and read paths share no state. Tags on the live resources are
//! the only record of what was deployed, and resource names are derived from
//! the landing zone id, so repeating a deployment converges instead of
//! duplicating resources.

pub mod builder;
pub mod error;
pub mod factories;
pub mod factory;
pub mod manager;
pub mod naming;
pub mod plan;
pub mod provider;
pub mod purpose;
pub mod reader;
pub mod registry;
pub mod resource;
pub mod tags;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

// Re-exports
pub use builder::DeploymentBuilder;
pub use error::{CloudError, LandingZoneError, Result};
pub use factories::{KubernetesWorkspaceFactory, ManagedNetworkFactory};
pub use factory::{FactoryHeader, LandingZoneDefinable, LandingZoneFactory};
pub use manager::LandingZoneManager;
pub use naming::NameGenerator;
pub use plan::{DeploymentPlan, PlanSummary, PlannedResource};
pub use provider::{ProviderResult, ResourceProvider};
pub use purpose::{ResourcePurpose, SubnetResourcePurpose};
pub use reader::ResourcesReader;
pub use registry::{BUILTIN_FACTORIES, DefinitionRegistry, FactoryDescriptor, FactoryRegistration};
pub use resource::{
    DeployedResource, DeployedSubnet, DeployedVNet, ResourceDefinition, ResourceGroup,
    ResourceType, SubnetDefinition, VirtualNetworkDefinition,
};
pub use version::DefinitionVersion;
