use clap::Parser;
use climate_aggregator::cli::{init_logging, run, Cli};
use climate_aggregator::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref())?;
    run(cli).await
}
