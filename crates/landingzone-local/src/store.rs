//! Persistent resource store
//!
//! Manages `resources.json` inside the state directory, which records every
//! resource created through a [`LocalResourceGroup`](crate::LocalResourceGroup).

use crate::error::{LocalError, Result};
use chrono::{DateTime, TimeDelta, Utc};
use landingzone::{DeployedResource, ResourceType};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const STATE_VERSION: u32 = 1;
const STATE_FILE: &str = "resources.json";
const STATE_BACKUP: &str = "resources.json.backup";
const STATE_SCRATCH: &str = "resources.json.tmp";
const LOCK_FILE: &str = "lock.json";

/// Locks older than this are treated as abandoned
const STALE_LOCK_HOURS: i64 = 1;

/// Contents of `resources.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreState {
    /// State file version
    pub version: u32,

    /// Last modified timestamp
    pub updated_at: DateTime<Utc>,

    /// Resources in creation order
    pub resources: Vec<StoredResource>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            updated_at: Utc::now(),
            resources: Vec::new(),
        }
    }
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource with the given type and name in a resource group
    pub fn find(
        &self,
        resource_group: &str,
        resource_type: ResourceType,
        name: &str,
    ) -> Option<&StoredResource> {
        self.resources.iter().find(|r| {
            r.resource_group == resource_group && r.resource_type == resource_type && r.name == name
        })
    }

    pub fn find_by_id(&self, resource_id: &str) -> Option<&StoredResource> {
        self.resources
            .iter()
            .find(|r| r.resource.resource_id == resource_id)
    }

    pub fn in_group<'a>(&'a self, resource_group: &'a str) -> impl Iterator<Item = &'a StoredResource> {
        self.resources
            .iter()
            .filter(move |r| r.resource_group == resource_group)
    }

    pub fn push(&mut self, resource: StoredResource) {
        self.resources.push(resource);
        self.updated_at = Utc::now();
    }
}

/// One persisted resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResource {
    pub resource_group: String,
    pub resource_type: ResourceType,
    pub name: String,

    /// Snapshot returned to callers
    pub resource: DeployedResource,

    /// Subnet names, for virtual networks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subnets: Vec<String>,

    pub created_at: DateTime<Utc>,
}

/// Reads and writes the state directory
#[derive(Debug, Clone)]
pub struct ResourceStore {
    state_dir: PathBuf,
}

impl ResourceStore {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            state_dir: state_dir.as_ref().to_path_buf(),
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    fn state_path(&self) -> PathBuf {
        self.state_dir.join(STATE_FILE)
    }

    fn backup_path(&self) -> PathBuf {
        self.state_dir.join(STATE_BACKUP)
    }

    fn lock_path(&self) -> PathBuf {
        self.state_dir.join(LOCK_FILE)
    }

    async fn ensure_state_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.state_dir).await?;
        Ok(())
    }

    /// Load the current state, or an empty one if nothing was saved yet
    pub async fn load(&self) -> Result<StoreState> {
        let bytes = match fs::read(self.state_path()).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreState::new()),
            Err(e) => return Err(e.into()),
        };

        let state: StoreState = serde_json::from_slice(&bytes)?;
        if state.version > STATE_VERSION {
            return Err(LocalError::UnsupportedStateVersion {
                found: state.version,
                supported: STATE_VERSION,
            });
        }

        tracing::debug!(
            state_dir = %self.state_dir.display(),
            resources = state.resources.len(),
            "Resource store loaded"
        );
        Ok(state)
    }

    /// Replace the stored state
    ///
    /// The new contents go to a scratch file, the current `resources.json` is
    /// copied to the backup, then the scratch file is renamed into place. A
    /// failed write leaves `resources.json` untouched.
    pub async fn save(&self, state: &StoreState) -> Result<()> {
        self.ensure_state_dir().await?;

        let path = self.state_path();
        let scratch = self.state_dir.join(STATE_SCRATCH);
        fs::write(&scratch, serde_json::to_vec_pretty(state)?).await?;

        if fs::try_exists(&path).await? {
            fs::copy(&path, self.backup_path()).await?;
        }
        fs::rename(&scratch, &path).await?;

        tracing::debug!(
            state_dir = %self.state_dir.display(),
            resources = state.resources.len(),
            "Resource store saved"
        );
        Ok(())
    }

    /// Acquire exclusive access to the state directory
    pub async fn acquire_lock(&self) -> Result<StoreLock> {
        self.ensure_state_dir().await?;

        let lock_path = self.lock_path();
        self.clear_stale_lock(&lock_path).await?;

        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(LocalError::Locked {
                    holder: "another process".to_string(),
                    since: Utc::now().to_rfc3339(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let lock_info = LockInfo {
            holder: lock_holder(),
            acquired_at: Utc::now(),
        };
        file.write_all(&serde_json::to_vec_pretty(&lock_info)?).await?;
        file.flush().await?;

        tracing::debug!(holder = %lock_info.holder, "Resource store locked");
        Ok(StoreLock {
            lock_path,
            released: false,
        })
    }

    /// Remove `lock.json` if it is older than the stale window, fail if it is not
    ///
    /// A lock file that cannot be parsed (its writer died before finishing)
    /// is aged by its modification time.
    async fn clear_stale_lock(&self, lock_path: &Path) -> Result<()> {
        let content = match fs::read_to_string(lock_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let (holder, acquired_at) = match serde_json::from_str::<LockInfo>(&content) {
            Ok(info) => (info.holder, info.acquired_at),
            Err(_) => {
                let modified = match fs::metadata(lock_path).await {
                    Ok(metadata) => metadata.modified()?,
                    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
                    Err(e) => return Err(e.into()),
                };
                ("unknown".to_string(), DateTime::<Utc>::from(modified))
            }
        };

        if Utc::now().signed_duration_since(acquired_at) < TimeDelta::hours(STALE_LOCK_HOURS) {
            return Err(LocalError::Locked {
                holder,
                since: acquired_at.to_rfc3339(),
            });
        }

        tracing::warn!(%holder, since = %acquired_at, "Removing stale lock");
        remove_if_present(fs::remove_file(lock_path).await)
    }
}

fn remove_if_present(result: std::io::Result<()>) -> Result<()> {
    match result {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

fn lock_holder() -> String {
    let host = std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("HOST"))
        .unwrap_or_else(|_| "unknown".to_string());
    format!("{}:{}", host, std::process::id())
}

#[derive(Debug, Serialize, Deserialize)]
struct LockInfo {
    holder: String,
    acquired_at: DateTime<Utc>,
}

/// RAII guard for the state lock
#[derive(Debug)]
pub struct StoreLock {
    lock_path: PathBuf,
    released: bool,
}

impl StoreLock {
    pub async fn release(mut self) -> Result<()> {
        self.released = true;
        remove_if_present(fs::remove_file(&self.lock_path).await)?;
        tracing::debug!("Resource store unlocked");
        Ok(())
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = remove_if_present(std::fs::remove_file(&self.lock_path)) {
            tracing::warn!(error = %e, lock = %self.lock_path.display(), "Failed to remove lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn stored(name: &str) -> StoredResource {
        StoredResource {
            resource_group: "rg-test".to_string(),
            resource_type: ResourceType::StorageAccount,
            name: name.to_string(),
            resource: DeployedResource {
                resource_id: format!("/rg-test/{name}"),
                resource_type: ResourceType::StorageAccount.as_str().to_string(),
                region: "eastus".to_string(),
                tags: HashMap::new(),
            },
            subnets: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_empty_state() {
        let temp_dir = tempdir().unwrap();
        let store = ResourceStore::new(temp_dir.path().join(".landingzone"));

        let state = store.load().await.unwrap();
        assert!(state.resources.is_empty());
    }

    #[tokio::test]
    async fn test_save_load_and_backup() {
        let temp_dir = tempdir().unwrap();
        let store = ResourceStore::new(temp_dir.path());

        let mut state = StoreState::new();
        state.push(stored("sa1"));
        store.save(&state).await.unwrap();
        state.push(stored("sa2"));
        store.save(&state).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.resources.len(), 2);
        assert!(loaded.find("rg-test", ResourceType::StorageAccount, "sa2").is_some());
        assert!(temp_dir.path().join(STATE_BACKUP).exists());
    }

    #[tokio::test]
    async fn test_newer_state_version_is_rejected() {
        let temp_dir = tempdir().unwrap();
        let store = ResourceStore::new(temp_dir.path());

        let state = StoreState {
            version: STATE_VERSION + 1,
            ..StoreState::new()
        };
        store.save(&state).await.unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, LocalError::UnsupportedStateVersion { .. }));
    }

    #[tokio::test]
    async fn test_lock_is_exclusive_until_released() {
        let temp_dir = tempdir().unwrap();
        let store = ResourceStore::new(temp_dir.path());

        let lock = store.acquire_lock().await.unwrap();
        assert!(matches!(
            store.acquire_lock().await.unwrap_err(),
            LocalError::Locked { .. }
        ));

        lock.release().await.unwrap();
        store.acquire_lock().await.unwrap();
    }

    #[tokio::test]
    async fn test_lock_released_on_drop() {
        let temp_dir = tempdir().unwrap();
        let store = ResourceStore::new(temp_dir.path());

        drop(store.acquire_lock().await.unwrap());
        assert!(!temp_dir.path().join(LOCK_FILE).exists());
    }

    #[tokio::test]
    async fn test_backup_holds_previous_state() {
        let temp_dir = tempdir().unwrap();
        let store = ResourceStore::new(temp_dir.path());

        let mut state = StoreState::new();
        state.push(stored("sa1"));
        store.save(&state).await.unwrap();
        state.push(stored("sa2"));
        store.save(&state).await.unwrap();

        let backup = std::fs::read_to_string(temp_dir.path().join(STATE_BACKUP)).unwrap();
        let backup: StoreState = serde_json::from_str(&backup).unwrap();
        assert_eq!(backup.resources.len(), 1);
        assert!(!temp_dir.path().join(STATE_SCRATCH).exists());
    }

    #[tokio::test]
    async fn test_half_written_lock_blocks_until_stale() {
        let temp_dir = tempdir().unwrap();
        let store = ResourceStore::new(temp_dir.path());
        let lock_path = temp_dir.path().join(LOCK_FILE);
        std::fs::write(&lock_path, "").unwrap();

        assert!(matches!(
            store.acquire_lock().await.unwrap_err(),
            LocalError::Locked { .. }
        ));

        std::fs::File::options()
            .write(true)
            .open(&lock_path)
            .unwrap()
            .set_modified(std::time::SystemTime::now() - std::time::Duration::from_secs(2 * 3600))
            .unwrap();

        let lock = store.acquire_lock().await.unwrap();
        let content = std::fs::read_to_string(&lock_path).unwrap();
        assert!(serde_json::from_str::<LockInfo>(&content).is_ok());
        lock.release().await.unwrap();
        assert!(!lock_path.exists());
    }

    #[tokio::test]
    async fn test_stale_lock_is_replaced() {
        let temp_dir = tempdir().unwrap();
        let store = ResourceStore::new(temp_dir.path());

        let stale = LockInfo {
            holder: "crashed".to_string(),
            acquired_at: Utc::now() - TimeDelta::hours(2),
        };
        std::fs::write(
            temp_dir.path().join(LOCK_FILE),
            serde_json::to_string(&stale).unwrap(),
        )
        .unwrap();

        store.acquire_lock().await.unwrap();
    }
}
