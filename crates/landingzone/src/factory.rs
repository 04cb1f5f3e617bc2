//! Landing zone factory traits

use crate::builder::DeploymentBuilder;
use crate::error::{LandingZoneError, Result};
use crate::resource::ResourceGroup;
use crate::version::DefinitionVersion;
use serde::{Deserialize, Serialize};

/// Human-readable identity of a factory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryHeader {
    pub name: String,
    pub description: String,
}

impl FactoryHeader {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A landing zone "shape": one topology, possibly in several versions
///
/// Factories only declare resources; nothing is created until `deploy()` is
/// called on the builder their definition returns.
pub trait LandingZoneFactory: Send + Sync {
    /// Stable key the factory is registered and reported under
    fn identifier(&self) -> &'static str;

    fn header(&self) -> FactoryHeader;

    /// Versions this factory can produce
    fn available_versions(&self) -> Vec<DefinitionVersion>;

    /// Definition for `version`, which is already known to be available
    fn definable(&self, version: &DefinitionVersion) -> Box<dyn LandingZoneDefinable>;

    /// Definition for `version`
    fn create(&self, version: &DefinitionVersion) -> Result<Box<dyn LandingZoneDefinable>> {
        if !self.available_versions().contains(version) {
            return Err(LandingZoneError::UnsupportedVersion {
                factory: self.identifier().to_string(),
                version: version.to_string(),
            });
        }
        Ok(self.definable(version))
    }
}

/// One concrete version of a landing zone topology
pub trait LandingZoneDefinable: Send + Sync {
    /// Declare the topology on `builder`
    ///
    /// Resource names must come from a fresh [`NameGenerator`](crate::NameGenerator)
    /// seeded with the builder's landing zone id, consumed in a fixed order, so
    /// that repeated definitions reproduce the same names.
    fn definition(&self, builder: DeploymentBuilder, resource_group: &ResourceGroup)
    -> DeploymentBuilder;
}
