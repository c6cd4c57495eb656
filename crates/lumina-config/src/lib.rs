//! Runtime settings persisted to disk as RON, with CLI overrides via clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, InputConfig, RenderConfig, WindowConfig, default_config_dir,
};
pub use error::ConfigError;
