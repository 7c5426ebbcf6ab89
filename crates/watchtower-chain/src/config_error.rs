use thiserror::Error;

/// Problems found while resolving [`crate::ChainConfigRaw`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("secret not provided: {0}")]
    MissingSecret(String),

    #[error("{0}")]
    InvalidConfig(String),
}
