//! Local resource group for landing zones
//!
//! A [`ResourceProvider`](landingzone::ResourceProvider) that keeps resources
//! in a JSON file instead of a cloud. Useful for trying out factories and for
//! exercising the tag-based reader without credentials.
//!
//! ```text
//! <state-dir>/
//! ├── resources.json          current resources and their tags
//! ├── resources.json.backup   previous version, rotated on every save
//! └── lock.json               held while a mutation is in progress
//! ```

pub mod error;
pub mod provider;
pub mod store;

pub use error::{LocalError, Result};
pub use provider::LocalResourceGroup;
pub use store::{ResourceStore, StoreLock, StoreState, StoredResource};
