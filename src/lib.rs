pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod wlan;

use cli::Cli;
use error::VaultResult;

pub async fn run(cli: Cli) -> VaultResult<()> {
    app::run(cli).await
}
