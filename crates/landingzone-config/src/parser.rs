//! landingzone.kdl parser

use crate::error::{ConfigError, Result};
use crate::settings::{DEFAULT_STATE_DIR, Settings};
use kdl::{KdlDocument, KdlNode};
use landingzone::ResourceGroup;
use std::path::{Path, PathBuf};

/// Parse a config file; a relative `state-dir` is resolved against the file's directory
pub fn parse_settings_file(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    let mut settings = parse_settings(&content)?;

    if settings.state_dir.is_relative() {
        if let Some(root) = path.parent() {
            settings.state_dir = root.join(&settings.state_dir);
        }
    }
    settings.source = Some(path.to_path_buf());
    Ok(settings)
}

/// Parse config text
pub fn parse_settings(content: &str) -> Result<Settings> {
    let doc: KdlDocument = content.parse()?;

    let mut resource_group = None;
    let mut state_dir = PathBuf::from(DEFAULT_STATE_DIR);

    for node in doc.nodes() {
        match node.name().value() {
            "resource-group" => resource_group = Some(parse_resource_group(node)?),
            "state-dir" => {
                let dir = first_string(node).ok_or_else(|| {
                    ConfigError::InvalidConfig("state-dir requires a path".to_string())
                })?;
                state_dir = PathBuf::from(dir);
            }
            _ => {}
        }
    }

    let resource_group = resource_group.ok_or_else(|| {
        ConfigError::InvalidConfig("a resource-group node is required".to_string())
    })?;

    Ok(Settings {
        resource_group,
        state_dir,
        source: None,
    })
}

fn parse_resource_group(node: &KdlNode) -> Result<ResourceGroup> {
    let name = first_string(node)
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ConfigError::InvalidConfig("resource-group requires a name".to_string()))?;

    let mut region = None;
    let mut subscription = None;

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "region" => region = first_string(child),
                "subscription" => subscription = first_string(child),
                _ => {}
            }
        }
    }

    let region = region.ok_or_else(|| {
        ConfigError::InvalidConfig(format!("resource-group '{}' requires a region", name))
    })?;
    let subscription = subscription.ok_or_else(|| {
        ConfigError::InvalidConfig(format!("resource-group '{}' requires a subscription", name))
    })?;

    Ok(ResourceGroup::new(name, region, subscription))
}

fn first_string(node: &KdlNode) -> Option<String> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
resource-group "rg-dev" {
    region "eastus"
    subscription "00000000-0000-0000-0000-000000000000"
}
state-dir "state"
"#;

    #[test]
    fn test_parse_full() {
        let settings = parse_settings(FULL).unwrap();
        assert_eq!(settings.resource_group.name, "rg-dev");
        assert_eq!(settings.resource_group.region, "eastus");
        assert_eq!(
            settings.resource_group.subscription_id,
            "00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(settings.state_dir, PathBuf::from("state"));
    }

    #[test]
    fn test_state_dir_defaults() {
        let settings = parse_settings(
            r#"resource-group "rg" {
    region "westus"
    subscription "sub"
}"#,
        )
        .unwrap();
        assert_eq!(settings.state_dir, PathBuf::from(DEFAULT_STATE_DIR));
    }

    #[test]
    fn test_missing_resource_group() {
        let err = parse_settings(r#"state-dir "x""#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn test_missing_region() {
        let err = parse_settings(
            r#"resource-group "rg" {
    subscription "sub"
}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("region"));
    }

    #[test]
    fn test_invalid_kdl() {
        let err = parse_settings("resource-group \"rg\" {").unwrap_err();
        assert!(matches!(err, ConfigError::KdlParse(_)));
    }

    #[test]
    fn test_state_dir_relative_to_config_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("landingzone.kdl");
        std::fs::write(&path, FULL).unwrap();

        let settings = parse_settings_file(&path).unwrap();
        assert_eq!(settings.state_dir, temp_dir.path().join("state"));
        assert_eq!(settings.source, Some(path));
    }
}
