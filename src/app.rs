use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cli::{AddArgs, Cli, Command, ConnectArgs, DeleteArgs, ShowArgs};
use crate::config::Config;
use crate::error::{VaultError, VaultResult};
use crate::output;
use crate::wlan::export::build_profile_xml;
use crate::wlan::source::{NetshSource, ProfileSource};
use crate::wlan::types::is_open_auth;
use crate::wlan::ProfileInfoResolver;

pub async fn run(cli: Cli) -> VaultResult<()> {
    let config = Config::new(cli.app_dir.clone(), Duration::from_secs(cli.timeout));
    let source: Arc<dyn ProfileSource> = Arc::new(NetshSource::new(&config));
    let resolver = ProfileInfoResolver::new(config, source.clone())?;

    match cli.command {
        Command::List => {
            let names = resolver.list_profiles().await?;
            output::print_profile_rows(&names, cli.json)
        }
        Command::Refresh => {
            let names = resolver.regenerate().await?;
            info!("profile list rebuilt, {} entries", names.len());
            output::print_profile_rows(&names, cli.json)
        }
        Command::Show(ShowArgs { name }) => {
            let detail = resolver.resolve_detail(&name).await;
            output::print_detail(&detail, cli.json)
        }
        Command::Delete(DeleteArgs { name }) => {
            resolver.delete_profile(&name).await?;
            println!("Deleted profile {name:?} (run `refresh` to update the list)");
            Ok(())
        }
        Command::Add(args) => add_profile(source.as_ref(), args).await,
        Command::Status => {
            let status = source.current_connection().await?;
            output::print_status(status.as_ref(), cli.json)
        }
        Command::Disconnect => disconnect(source.as_ref()).await,
        Command::Connect(ConnectArgs { name, interface }) => {
            source.connect(&name, &interface).await?;
            println!(
                "Connect request for {name:?} accepted \
                 (out-of-range networks may still be reported as successful)"
            );
            Ok(())
        }
    }
}

async fn add_profile(source: &dyn ProfileSource, args: AddArgs) -> VaultResult<()> {
    if !is_open_auth(&args.authentication) && args.key.is_none() {
        return Err(VaultError::InvalidInput(format!(
            "authentication {:?} requires --key",
            args.authentication
        )));
    }
    if !matches!(args.mode.as_str(), "auto" | "manual") {
        return Err(VaultError::InvalidInput(format!(
            "mode must be auto or manual, got {:?}",
            args.mode
        )));
    }

    let xml = build_profile_xml(
        &args.ssid,
        &args.mode,
        &args.authentication,
        &args.encryption,
        args.key.as_deref(),
    );
    source.add_profile(&xml).await?;
    println!(
        "Profile {:?} added (run `refresh` to update the list)",
        args.ssid
    );
    Ok(())
}

async fn disconnect(source: &dyn ProfileSource) -> VaultResult<()> {
    match source.current_connection().await? {
        Some(info) => {
            source.disconnect(&info.interface).await?;
            println!("Disconnected from {}", info.ssid);
        }
        None => println!("No network connected"),
    }
    Ok(())
}
