use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;

use wlanvault::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    color_eyre::install()?;
    init_logging(cli.log_level.as_deref());

    info!("wlanvault starting");
    if let Err(err) = wlanvault::run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    Ok(())
}

/// Route tracing output to stderr so the tables on stdout stay clean.
fn init_logging(level: Option<&str>) {
    use tracing_subscriber::EnvFilter;

    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
