//! Tag vocabulary written on every landing zone resource
//!
//! Tags are the only place deployment metadata lives, so these keys are a
//! wire contract: readers of older deployments depend on them staying put.
//!
//! ## Tag Schema
//!
//! | Tag Key | Value |
//! |---------|-------|
//! | `landing-zone-id` | Landing zone identifier (ownership) |
//! | `landing-zone-purpose` | [`ResourcePurpose`] of the whole resource |
//! | `<SubnetResourcePurpose>` | Name of the subnet serving that purpose (VNets only) |

use crate::purpose::{ResourcePurpose, SubnetResourcePurpose};
use std::collections::HashMap;

/// Tag key for landing zone ownership
pub const TAG_LANDING_ZONE_ID: &str = "landing-zone-id";

/// Tag key for the resource-level purpose
pub const TAG_PURPOSE: &str = "landing-zone-purpose";

/// Tag set applied to one resource at creation time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: HashMap<String, String>,
}

impl TagSet {
    /// Ownership tags for the given landing zone
    pub fn owned_by(landing_zone_id: &str) -> Self {
        let mut tags = HashMap::new();
        tags.insert(TAG_LANDING_ZONE_ID.to_string(), landing_zone_id.to_string());
        Self { tags }
    }

    pub fn with_purpose(mut self, purpose: ResourcePurpose) -> Self {
        self.tags
            .insert(TAG_PURPOSE.to_string(), purpose.as_str().to_string());
        self
    }

    pub fn with_subnet_purpose(mut self, purpose: SubnetResourcePurpose, subnet: &str) -> Self {
        self.tags
            .insert(purpose.as_str().to_string(), subnet.to_string());
        self
    }

    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.tags
    }

    pub fn into_map(self) -> HashMap<String, String> {
        self.tags
    }
}

/// Landing zone that owns a resource, if tagged
pub fn landing_zone_id(tags: &HashMap<String, String>) -> Option<&str> {
    tags.get(TAG_LANDING_ZONE_ID).map(String::as_str)
}

/// Resource-level purpose; unknown values are treated as untagged
pub fn resource_purpose(tags: &HashMap<String, String>) -> Option<ResourcePurpose> {
    tags.get(TAG_PURPOSE).and_then(|v| v.parse().ok())
}

/// Keys whose values a deployment decides: ownership, purpose and every subnet purpose
pub fn managed_keys() -> impl Iterator<Item = &'static str> {
    [TAG_LANDING_ZONE_ID, TAG_PURPOSE]
        .into_iter()
        .chain(SubnetResourcePurpose::ALL.iter().map(|p| p.as_str()))
}

/// Every subnet purpose present as a tag key, with the subnet name it points at
pub fn subnet_purposes(
    tags: &HashMap<String, String>,
) -> impl Iterator<Item = (SubnetResourcePurpose, &str)> {
    SubnetResourcePurpose::ALL
        .iter()
        .filter_map(|purpose| tags.get(purpose.as_str()).map(|v| (*purpose, v.as_str())))
}
