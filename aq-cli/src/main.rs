//! aq-cli - Daily PM2.5 features and next-day prediction from the command line.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "aq-cli",
    version,
    about = "PM2.5 daily feature builder and next-day predictor"
)]
struct Cli {
    #[command(subcommand)]
    command: aq_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("{:?}", cli.command);
    aq_cmd::run(cli.command).await
}
