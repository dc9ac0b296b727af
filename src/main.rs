use account_service::cli::{self, Cli, Command};
use account_service::infrastructure::logging;
use account_service::AppConfig;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    logging::init_logging(&config.logging)?;

    match cli.command {
        Command::Serve => cli::serve::run(&config).await,
        Command::Keygen(args) => cli::keygen::run(&args),
    }
}
