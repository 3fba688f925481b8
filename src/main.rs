use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use forestry::cli::commands;
use forestry::config::SimulationConfig;

#[derive(Parser)]
#[command(name = "forestry")]
#[command(about = "An interactive managed-forest simulation")]
#[command(version)]
struct Cli {
    /// Forest base names; each loads `<name>.csv` from the data directory
    forests: Vec<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Seed for the random tree factory (0 picks one at startup)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory holding `.csv` and `.db` forest files
    #[arg(short, long)]
    data_dir: Option<String>,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) => match SimulationConfig::from_file(Path::new(path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(dir) = cli.data_dir {
        config.data_directory = dir;
    }

    init_tracing(&config.log_level);

    if let Err(e) = commands::run_interactive(&config, &cli.forests) {
        eprintln!("Console error: {}", e);
        std::process::exit(1);
    }
}
