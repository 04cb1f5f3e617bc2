//! Landing zone error types
//!
//! Two layers: [`CloudError`] is what a [`ResourceProvider`](crate::ResourceProvider)
//! reports for a single call, [`LandingZoneError`] is what the registry, builder,
//! reader and manager surface to their callers.

use crate::purpose::SubnetResourcePurpose;
use thiserror::Error;

/// Errors reported by a resource provider
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Resource already exists: {0}")]
    ResourceAlreadyExists(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid resource definition: {0}")]
    InvalidDefinition(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by landing zone operations
#[derive(Error, Debug)]
pub enum LandingZoneError {
    #[error("Unknown landing zone factory: {0}")]
    UnknownFactory(String),

    #[error("Factory '{factory}' does not support version '{version}'")]
    UnsupportedVersion { factory: String, version: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to create {resource_type} '{resource}': {source}")]
    ResourceCreation {
        resource: String,
        resource_type: String,
        #[source]
        source: CloudError,
    },

    #[error(
        "Virtual network {vnet_id} tags subnet '{subnet}' as {purpose}, but no such subnet exists"
    )]
    TagReconstruction {
        vnet_id: String,
        subnet: String,
        purpose: SubnetResourcePurpose,
    },

    #[error("Provider error: {0}")]
    Provider(#[from] CloudError),
}

impl LandingZoneError {
    /// Whether retrying the same request can succeed without changing it
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LandingZoneError::ResourceCreation { .. } | LandingZoneError::Provider(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LandingZoneError>;
