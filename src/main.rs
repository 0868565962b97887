use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use fyyur_trivia::config::ServerConfig;
use fyyur_trivia::error::DynError;
use fyyur_trivia::{seed, serve};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fyyur booking site and trivia API backed by SQLite")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the app selected by the config file over HTTP
    Serve {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,

        /// Port to listen on (overrides config file)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Load fixture data into empty tables
    Seed {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,

        /// Path to fixtures file (TOML format)
        #[arg(short, long)]
        fixtures: PathBuf,
    },
}

fn main() -> Result<(), DynError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let rt = tokio::runtime::Runtime::new()?;
    match args.command {
        Command::Serve { config, port } => {
            let mut config = ServerConfig::load(&config)?;
            if let Some(port) = port {
                config.port = port;
            }
            rt.block_on(serve::serve(config))
        }
        Command::Seed { config, fixtures } => {
            let config = ServerConfig::load(&config)?;
            let report = rt.block_on(seed::run_seed(&config, &fixtures))?;
            let total: usize = report.iter().map(|(_, n)| n).sum();
            info!(
                "Seeding {} finished: {} row(s) inserted",
                config.database_file.display(),
                total
            );
            Ok(())
        }
    }
}
