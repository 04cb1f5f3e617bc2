//! Resolved settings

use crate::discovery::find_config;
use crate::error::{ConfigError, Result};
use crate::parser::parse_settings_file;
use landingzone::ResourceGroup;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_STATE_DIR: &str = ".landingzone";

pub const RESOURCE_GROUP_ENV: &str = "LZ_RESOURCE_GROUP";
pub const REGION_ENV: &str = "LZ_REGION";
pub const SUBSCRIPTION_ENV: &str = "LZ_SUBSCRIPTION_ID";

/// Everything needed to talk to one resource group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub resource_group: ResourceGroup,

    /// Directory the local provider keeps its state in
    pub state_dir: PathBuf,

    /// File the settings were read from, if any
    pub source: Option<PathBuf>,
}

impl Settings {
    /// Load settings from `path`, or from the discovered config file
    ///
    /// Without any config file the environment must name the resource group,
    /// region and subscription.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let discovered = match path {
            Some(path) => Some(path.to_path_buf()),
            None => find_config(),
        };

        let settings = match discovered {
            Some(path) => parse_settings_file(&path)?,
            None => Self::from_env_only()?,
        };

        Ok(settings.with_env_overrides())
    }

    /// Apply `LZ_RESOURCE_GROUP`, `LZ_REGION` and `LZ_SUBSCRIPTION_ID`
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(name) = non_empty_env(RESOURCE_GROUP_ENV) {
            debug!(resource_group = %name, "Resource group overridden by environment");
            self.resource_group.name = name;
        }
        if let Some(region) = non_empty_env(REGION_ENV) {
            self.resource_group.region = region;
        }
        if let Some(subscription) = non_empty_env(SUBSCRIPTION_ENV) {
            self.resource_group.subscription_id = subscription;
        }
        self
    }

    fn from_env_only() -> Result<Self> {
        let name = non_empty_env(RESOURCE_GROUP_ENV).ok_or(ConfigError::NotFound)?;
        let region = non_empty_env(REGION_ENV).ok_or(ConfigError::NotFound)?;
        let subscription = non_empty_env(SUBSCRIPTION_ENV).ok_or(ConfigError::NotFound)?;

        Ok(Self {
            resource_group: ResourceGroup::new(name, region, subscription),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            source: None,
        })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
