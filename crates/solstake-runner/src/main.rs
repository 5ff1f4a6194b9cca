use anyhow::{Context, Result};
use clap::Parser;
use solstake_runner::{App, Cli};
use tracing::subscriber;
use tracing_subscriber::{prelude::*, EnvFilter, Registry};

const DEFAULT_LOG_FILTER: &str = "info,solstake=debug";

/// Logs go to stderr so command output on stdout stays pipeable.
fn init_tracing() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    subscriber::set_global_default(subscriber)
        .context("Failed to set global default tracing subscriber")
}

#[tokio::main]
async fn main() -> Result<()> {
    solstake_lib::env::load_dotenv();
    init_tracing()?;

    let cli = Cli::parse();
    let app = App::from_env()?;
    let output = app.run(cli.command).await?;
    println!("{output}");
    Ok(())
}
