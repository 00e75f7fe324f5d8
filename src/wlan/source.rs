use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{VaultError, VaultResult};
use crate::wlan::parse;
use crate::wlan::types::ConnectionInfo;

/// The OS-level network-configuration facility, as consumed by the
/// resolver and the presentation layer. Injected so both can be driven
/// by a fake in tests.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Saved profile names, in the order the OS reports them.
    async fn enumerate(&self) -> VaultResult<Vec<String>>;

    /// Export every profile's structured file into `dest`, key material
    /// in clear text. One call covers all profiles.
    async fn export_all(&self, dest: &Path) -> VaultResult<()>;

    /// Raw textual detail for one profile.
    async fn query_detail(&self, name: &str, reveal_key: bool) -> VaultResult<String>;

    /// Raw textual detail for every profile in one call.
    async fn query_all_detail(&self, reveal_key: bool) -> VaultResult<String>;

    /// Remove the profile from the system.
    async fn delete(&self, name: &str) -> VaultResult<()>;

    /// Register a new profile from a structured document.
    async fn add_profile(&self, xml: &str) -> VaultResult<()>;

    /// The connected interface/SSID pair, if any.
    async fn current_connection(&self) -> VaultResult<Option<ConnectionInfo>>;

    /// Drop the connection on `interface`.
    async fn disconnect(&self, interface: &str) -> VaultResult<()>;

    /// Join the network saved under `name` via `interface`. The OS tool
    /// reports success even when the target is out of range; that is an
    /// upstream limitation, not corrected here.
    async fn connect(&self, name: &str, interface: &str) -> VaultResult<()>;
}

/// Production [`ProfileSource`] shelling out to `netsh wlan`.
///
/// Arguments are passed as separate argv entries, never through a shell,
/// so quoting-unsafe profile names reach the tool verbatim. Every
/// invocation is bounded by the configured timeout.
pub struct NetshSource {
    timeout: Duration,
    staging_file: PathBuf,
}

impl NetshSource {
    pub fn new(config: &Config) -> Self {
        Self {
            timeout: config.command_timeout,
            staging_file: config.staging_file(),
        }
    }

    async fn run(&self, args: &[String]) -> VaultResult<String> {
        debug!(?args, "invoking netsh");
        let invocation = Command::new("netsh").args(args).output();
        let output = tokio::time::timeout(self.timeout, invocation)
            .await
            .map_err(|_| VaultError::Timeout(self.timeout))?
            .map_err(|e| VaultError::CommandUnavailable(format!("failed to spawn netsh: {e}")))?;

        if !output.status.success() {
            // netsh reports most errors on stdout
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(VaultError::CommandFailed(format!(
                "netsh exited with {}: {}",
                output.status,
                detail.trim(),
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn wlan_args(tail: &[String]) -> Vec<String> {
    let mut args = vec!["wlan".to_owned()];
    args.extend_from_slice(tail);
    args
}

#[async_trait]
impl ProfileSource for NetshSource {
    async fn enumerate(&self) -> VaultResult<Vec<String>> {
        let output = self
            .run(&wlan_args(&["show".into(), "profiles".into()]))
            .await?;
        Ok(parse::parse_profile_names(&output))
    }

    async fn export_all(&self, dest: &Path) -> VaultResult<()> {
        self.run(&wlan_args(&[
            "export".into(),
            "profile".into(),
            "key=clear".into(),
            format!("folder={}", dest.display()),
        ]))
        .await?;
        Ok(())
    }

    async fn query_detail(&self, name: &str, reveal_key: bool) -> VaultResult<String> {
        let mut tail = vec!["show".into(), "profile".into(), format!("name={name}")];
        if reveal_key {
            tail.push("key=clear".into());
        }
        self.run(&wlan_args(&tail)).await
    }

    async fn query_all_detail(&self, reveal_key: bool) -> VaultResult<String> {
        let mut tail = vec!["show".into(), "profile".into(), "name=*".into()];
        if reveal_key {
            tail.push("key=clear".into());
        }
        self.run(&wlan_args(&tail)).await
    }

    async fn delete(&self, name: &str) -> VaultResult<()> {
        self.run(&wlan_args(&[
            "delete".into(),
            "profile".into(),
            format!("name={name}"),
        ]))
        .await?;
        Ok(())
    }

    async fn add_profile(&self, xml: &str) -> VaultResult<()> {
        tokio::fs::write(&self.staging_file, xml).await?;
        let result = self
            .run(&wlan_args(&[
                "add".into(),
                "profile".into(),
                format!("filename={}", self.staging_file.display()),
            ]))
            .await;
        if let Err(e) = tokio::fs::remove_file(&self.staging_file).await {
            warn!("failed to remove staging file: {e}");
        }
        result.map(|_| ())
    }

    async fn current_connection(&self) -> VaultResult<Option<ConnectionInfo>> {
        let output = self
            .run(&wlan_args(&["show".into(), "interfaces".into()]))
            .await?;
        Ok(parse::parse_interfaces(&output))
    }

    async fn disconnect(&self, interface: &str) -> VaultResult<()> {
        self.run(&wlan_args(&[
            "disconnect".into(),
            format!("interface={interface}"),
        ]))
        .await?;
        Ok(())
    }

    async fn connect(&self, name: &str, interface: &str) -> VaultResult<()> {
        self.run(&wlan_args(&[
            "connect".into(),
            format!("name={name}"),
            format!("interface={interface}"),
        ]))
        .await?;
        Ok(())
    }
}
