use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxwatch::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxwatch::AppCommand {
    fn from(cmd: Commands) -> fxwatch::AppCommand {
        match cmd {
            Commands::Watch {
                pair,
                api_key,
                interval,
            } => fxwatch::AppCommand::Watch {
                pair,
                api_key,
                interval_secs: interval,
            },
            Commands::Fetch { pair, api_key, all } => fxwatch::AppCommand::Fetch {
                pairs: pair,
                api_key,
                all,
            },
            Commands::Pairs => fxwatch::AppCommand::Pairs,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Watch a currency pair, refreshing on a fixed interval
    Watch {
        /// Currency pair to watch, e.g. EUR/USD
        #[arg(short, long)]
        pair: Option<String>,
        /// Alpha Vantage API key (falls back to FXWATCH_API_KEY, then the config file)
        #[arg(short = 'k', long)]
        api_key: Option<String>,
        /// Seconds between fetches
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Fetch the current rate once and exit
    Fetch {
        /// Currency pair to fetch; repeat the flag for several pairs
        #[arg(short, long)]
        pair: Vec<String>,
        /// Alpha Vantage API key (falls back to FXWATCH_API_KEY, then the config file)
        #[arg(short = 'k', long)]
        api_key: Option<String>,
        /// Fetch every supported pair
        #[arg(long)]
        all: bool,
    },
    /// List the supported currency pairs
    Pairs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxwatch::cli::setup::setup(),
        Some(cmd) => fxwatch::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
