use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use live_odds_pipeline::config::AppConfig;
use live_odds_pipeline::monitoring::logger;
use live_odds_pipeline::pipeline::Pipeline;

#[derive(Debug, Parser)]
#[command(name = "live-odds-pipeline", version, about = "Merge and present live match odds")]
struct Cli {
    /// Path to the TOML config (PIPELINE_CONFIG overrides it).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge the fetcher's document into the history file.
    Merge,
    /// Render the newest batch of the history file.
    Present,
    /// Merge, then present.
    Run {
        /// Repeat every cycle interval until Ctrl-C.
        #[arg(long)]
        continuous: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    logger::init_logging(&config.monitoring)?;

    tracing::info!(
        command = ?cli.command,
        input = %config.pipeline.input_path.display(),
        output = %config.pipeline.output_path.display(),
        "Live odds pipeline starting"
    );

    let pipeline = Pipeline::new(config);

    match cli.command {
        Command::Merge => {
            let outcome = pipeline.merge();
            println!("{}", outcome.summary);
        }
        Command::Present => {
            pipeline.present_latest(&mut std::io::stdout().lock())?;
        }
        Command::Run { continuous: false } => {
            pipeline.run_cycle(&mut std::io::stdout().lock())?;
        }
        Command::Run { continuous: true } => pipeline.run_continuous().await?,
    }

    Ok(())
}
