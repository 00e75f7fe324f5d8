use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// wlanvault — saved Wi-Fi profile and key manager for Windows
#[derive(Debug, Parser)]
#[command(name = "wlanvault", version, about, long_about = None)]
pub struct Cli {
    /// Application data directory (profile list and detail cache)
    #[arg(long, global = true)]
    pub app_dir: Option<PathBuf>,

    /// Timeout for OS tool invocations, in seconds
    #[arg(long, global = true, default_value_t = 15)]
    pub timeout: u64,

    /// Emit JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Log level filter (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List saved profile names (cached between runs)
    List,
    /// Rebuild the cached profile list from the system
    Refresh,
    /// Reveal SSID, authentication and key for one profile
    Show(ShowArgs),
    /// Delete a profile from the system and drop its cache artifacts
    Delete(DeleteArgs),
    /// Add a new profile to the system
    Add(AddArgs),
    /// Show the currently connected network
    Status,
    /// Disconnect from the current network
    Disconnect,
    /// Connect to a saved profile (the OS tool may report success even
    /// when the network is out of range)
    Connect(ConnectArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Profile name as printed by `list`
    pub name: String,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Profile name as printed by `list`
    pub name: String,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Network SSID (doubles as the profile name)
    pub ssid: String,

    /// Authentication mode
    #[arg(long, default_value = "WPA2PSK")]
    pub authentication: String,

    /// Encryption cipher
    #[arg(long, default_value = "AES")]
    pub encryption: String,

    /// Passphrase; required unless authentication is open
    #[arg(long)]
    pub key: Option<String>,

    /// Connection mode: auto or manual
    #[arg(long, default_value = "auto")]
    pub mode: String,
}

#[derive(Debug, Args)]
pub struct ConnectArgs {
    /// Profile name to connect to
    pub name: String,

    /// Wireless interface to use
    #[arg(long, default_value = "Wi-Fi")]
    pub interface: String,
}
