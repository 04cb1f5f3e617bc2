//! Landing zone configuration
//!
//! Settings come from `landingzone.kdl`:
//!
//! ```kdl
//! resource-group "rg-dev" {
//!     region "eastus"
//!     subscription "00000000-0000-0000-0000-000000000000"
//! }
//! state-dir ".landingzone"
//! ```
//!
//! `LZ_RESOURCE_GROUP`, `LZ_REGION` and `LZ_SUBSCRIPTION_ID` override the
//! file.

pub mod discovery;
pub mod error;
pub mod parser;
pub mod settings;

pub use discovery::{CONFIG_FILENAME, CONFIG_PATH_ENV, find_config, find_config_from};
pub use error::{ConfigError, Result};
pub use parser::{parse_settings, parse_settings_file};
pub use settings::{DEFAULT_STATE_DIR, Settings};
