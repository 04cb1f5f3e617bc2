pub mod deploy;
pub mod factories;
pub mod plan;
pub mod show;

use colored::Colorize;
use landingzone::LandingZoneManager;
use landingzone_config::Settings;
use landingzone_local::LocalResourceGroup;
use std::path::Path;
use std::sync::Arc;

/// Settings plus a manager over the configured resource group
pub struct Context {
    pub settings: Settings,
    pub manager: LandingZoneManager,
}

impl Context {
    pub fn load(config: Option<&Path>) -> anyhow::Result<Self> {
        let settings = Settings::load(config)?;
        let provider = Arc::new(LocalResourceGroup::new(&settings.state_dir));
        let manager = LandingZoneManager::new(provider, settings.resource_group.clone());

        Ok(Self { settings, manager })
    }

    pub fn print_header(&self) {
        let group = &self.settings.resource_group;
        match &self.settings.source {
            Some(path) => println!("{} {}", "Config:".dimmed(), path.display()),
            None => println!("{} {}", "Config:".dimmed(), "environment".dimmed()),
        }
        println!(
            "{} {} ({})",
            "Resource group:".dimmed(),
            group.name.cyan(),
            group.region
        );
        println!();
    }
}
