//! Configuration error types

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No landingzone.kdl found (set LZ_CONFIG_PATH or run inside a configured directory)")]
    NotFound,

    #[error("KDL parse error: {0}")]
    KdlParse(#[from] kdl::KdlError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
