//! Configuration file discovery
//!
//! Search order:
//! 1. `LZ_CONFIG_PATH`
//! 2. `landingzone.kdl` in the current directory or any parent
//! 3. `~/.config/landingzone/landingzone.kdl`

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const CONFIG_FILENAME: &str = "landingzone.kdl";

pub const CONFIG_PATH_ENV: &str = "LZ_CONFIG_PATH";

/// Locate `landingzone.kdl`
#[tracing::instrument]
pub fn find_config() -> Option<PathBuf> {
    if let Ok(path_str) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(&path_str);
        if path.exists() {
            info!(config_path = %path.display(), "Found config from environment variable");
            return Some(path);
        }
        warn!(env_path = %path_str, "LZ_CONFIG_PATH is set but file does not exist");
    }

    let found = std::env::current_dir()
        .ok()
        .and_then(|dir| find_config_from(&dir));
    if found.is_some() {
        return found;
    }

    global_config().filter(|path| path.exists())
}

/// Search `start_dir` and its parents for `landingzone.kdl`
pub fn find_config_from(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    debug!(start_dir = %start_dir.display(), "Searching for {}", CONFIG_FILENAME);

    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            info!(config_path = %candidate.display(), "Found config file");
            return Some(candidate);
        }

        if !current.pop() {
            break;
        }
    }

    debug!("Config file not found");
    None
}

/// Per-user configuration path
pub fn global_config() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("landingzone").join(CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_find_config_from_with_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILENAME), "state-dir \"x\"").unwrap();

        let result = find_config_from(temp_dir.path()).unwrap();
        assert!(result.ends_with(CONFIG_FILENAME));
    }

    #[test]
    fn test_find_config_from_subdirectory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        std::fs::write(root.join(CONFIG_FILENAME), "state-dir \"x\"").unwrap();

        let sub_dir = root.join("zones").join("dev");
        std::fs::create_dir_all(&sub_dir).unwrap();

        assert_eq!(find_config_from(&sub_dir), Some(root.join(CONFIG_FILENAME)));
    }

    #[test]
    fn test_find_config_from_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(find_config_from(temp_dir.path()).is_none());
    }

    #[test]
    #[serial]
    fn test_env_var_takes_precedence() {
        let temp_dir = tempfile::tempdir().unwrap();
        let explicit = temp_dir.path().join("custom.kdl");
        std::fs::write(&explicit, "state-dir \"x\"").unwrap();

        temp_env::with_var(CONFIG_PATH_ENV, Some(&explicit), || {
            assert_eq!(find_config(), Some(explicit.clone()));
        });
    }

    #[test]
    fn test_global_config_location() {
        if let Some(path) = global_config() {
            assert!(path.ends_with("landingzone/landingzone.kdl"));
        }
    }
}
