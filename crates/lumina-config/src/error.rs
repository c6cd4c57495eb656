//! Error type for config persistence.

/// What went wrong while loading or saving `config.ron`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("could not read config file: {0}")]
    Read(#[source] std::io::Error),

    /// The config file or its directory could not be written.
    #[error("could not write config file: {0}")]
    Write(#[source] std::io::Error),

    /// The file exists but is not valid RON.
    #[error("config file is not valid RON: {0}")]
    Parse(#[source] ron::error::SpannedError),

    /// The settings could not be rendered as RON.
    #[error("could not serialize config: {0}")]
    Serialize(#[source] ron::Error),
}
