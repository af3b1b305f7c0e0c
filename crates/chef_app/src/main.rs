mod platform;

use std::path::PathBuf;

use clap::Parser;

use platform::logging::LogDestination;

/// Guided, step-by-step cook mode in the terminal.
#[derive(Debug, Parser)]
#[command(name = "little-chef", version)]
struct Cli {
    /// Recipe file (RON).
    recipe: PathBuf,
    /// Config file (RON). Defaults apply when it does not exist.
    #[arg(long, default_value = "chef.ron")]
    config: PathBuf,
    /// Overrides the assistant base url from the config file.
    #[arg(long)]
    base_url: Option<String>,
    /// Overrides the log destination from the config file.
    #[arg(long, value_enum)]
    log: Option<LogDestination>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = platform::config::load_config(&cli.config)?;
    if let Some(base_url) = cli.base_url {
        config.assistant_base_url = base_url;
    }
    if let Some(destination) = cli.log {
        config.log_destination = destination;
    }

    platform::logging::initialize(config.log_destination);
    let recipe = platform::recipe_file::load_recipe(&cli.recipe)?;

    platform::app::run_app(&config, recipe)
}
