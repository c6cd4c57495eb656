use clap::Parser;
use lumina_config::{CliArgs, Config, default_config_dir};

fn main() {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .unwrap_or_else(|| default_config_dir().expect("no config directory on this platform"));

    let mut config = match Config::load_or_create(&config_dir) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("Config unusable ({err}), continuing with defaults");
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    lumina_log::init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    );

    if let Err(err) = lumina_app::run(config, args.scene.unwrap_or(0)) {
        tracing::error!("GPU initialization failed: {err}");
        std::process::exit(1);
    }
}
