//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Command-line arguments. Anything given here wins over the values in
/// `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "lumina", about = "Generative light-ribbon visualization")]
pub struct CliArgs {
    /// Window width in logical pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height in logical pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start borderless fullscreen.
    #[arg(long)]
    pub fullscreen: bool,

    /// Index of the scene to start in.
    #[arg(long)]
    pub scene: Option<usize>,

    /// Log filter (error, warn, info, debug, trace, or a full directive).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Run with an uncapped present mode.
    #[arg(long)]
    pub no_vsync: bool,

    /// Skip the bloom post chain.
    #[arg(long)]
    pub no_bloom: bool,

    /// Config directory to use instead of the platform default.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Fold CLI flags into a loaded config. Flags that were not given
    /// leave the config untouched.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(width) = args.width {
            self.window.width = width;
        }
        if let Some(height) = args.height {
            self.window.height = height;
        }
        if args.fullscreen {
            self.window.fullscreen = true;
        }
        if args.no_vsync {
            self.window.vsync = false;
        }
        if args.no_bloom {
            self.render.bloom = false;
        }
        if let Some(level) = &args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WindowConfig;

    #[test]
    fn test_flags_override_their_fields_only() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs {
            width: Some(2560),
            no_bloom: true,
            ..CliArgs::default()
        });
        assert_eq!(config.window.width, 2560);
        assert!(!config.render.bloom);
        // Everything not named on the command line keeps its file value.
        assert_eq!(config.window.height, WindowConfig::default().height);
        assert!(config.window.vsync);
    }

    #[test]
    fn test_empty_args_change_nothing() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_no_vsync_and_fullscreen_are_one_way_switches() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs {
            no_vsync: true,
            fullscreen: true,
            ..CliArgs::default()
        });
        assert!(!config.window.vsync);
        assert!(config.window.fullscreen);
    }

    #[test]
    fn test_log_level_flag_reaches_debug_section() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs {
            log_level: Some("debug,wgpu=error".into()),
            ..CliArgs::default()
        });
        assert_eq!(config.debug.log_level, "debug,wgpu=error");
    }
}
