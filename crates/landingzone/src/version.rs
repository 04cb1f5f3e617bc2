//! Landing zone definition versions

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Shape version a factory can produce
///
/// Open-ended: any string is a valid version, the constants are just the
/// values shipped factories know about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefinitionVersion(Cow<'static, str>);

impl DefinitionVersion {
    pub const V1: DefinitionVersion = DefinitionVersion(Cow::Borrowed("v1"));
    pub const V2: DefinitionVersion = DefinitionVersion(Cow::Borrowed("v2"));
    pub const V3: DefinitionVersion = DefinitionVersion(Cow::Borrowed("v3"));
    pub const V4: DefinitionVersion = DefinitionVersion(Cow::Borrowed("v4"));
    pub const V5: DefinitionVersion = DefinitionVersion(Cow::Borrowed("v5"));

    pub fn new(value: impl Into<String>) -> Self {
        Self(Cow::Owned(value.into()))
    }

    /// Versions defined by this crate
    pub fn known() -> Vec<DefinitionVersion> {
        vec![Self::V1, Self::V2, Self::V3, Self::V4, Self::V5]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for DefinitionVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DefinitionVersion {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DefinitionVersion {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
