//! matchfeed: one-shot feed pipeline run for a selected data source.

use clap::Parser;
use tracing::{error, info};

use matchfeed::{config::Config, logging, pipeline, FeedSource, Secrets};

/// Fetch, enrich, seal and publish the live match feed once.
#[derive(Parser, Debug)]
#[command(name = "matchfeed")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Data source to run against.
    #[arg(value_enum)]
    source: FeedSource,

    /// Path to a configuration file.
    #[arg(short, long, env = "MATCHFEED_CONFIG_PATH")]
    config: Option<String>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    logging::init_logging(&config.logging)?;

    config.validate(args.source)?;
    let secrets = Secrets::from_env()?;

    match pipeline::run(&config, &secrets, args.source).await {
        Ok(report) => {
            info!(
                source = %args.source,
                matches = report.matches,
                stream_links = report.stream_links,
                elapsed_ms = report.elapsed.as_millis() as u64,
                "feed run completed"
            );
            Ok(())
        }
        Err(err) => {
            error!(source = %args.source, error = %err, "feed run failed");
            Err(err.into())
        }
    }
}
