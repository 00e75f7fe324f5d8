use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use sha2::{Digest, Sha256};

use crate::error::{VaultError, VaultResult};

/// Cached enumeration of saved profile names, one per line.
pub const LIST_FILE: &str = "Saved Wifi list.txt";

/// Subdirectory of the app dir holding per-profile cache artifacts
/// (structured exports and flat detail files).
pub const CACHE_DIR: &str = "temp_";

const APP_DIR_NAME: &str = "wlanvault";

const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(15);

/// Runtime configuration for one resolver instance. Built once at startup
/// and passed down explicitly; there is no process-wide state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory owning the list file and the cache subdirectory.
    /// One resolver instance per directory; access is not synchronized.
    pub app_dir: PathBuf,

    /// Upper bound on a single OS command invocation.
    pub command_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_dir: default_app_dir(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

/// Standard app dir: `<local data dir>/wlanvault`
fn default_app_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

impl Config {
    pub fn new(app_dir: Option<PathBuf>, command_timeout: Duration) -> Self {
        Self {
            app_dir: app_dir.unwrap_or_else(default_app_dir),
            command_timeout,
        }
    }

    /// Create the app dir and cache subdirectory if missing.
    pub fn ensure_dirs(&self) -> VaultResult<()> {
        fs::create_dir_all(self.cache_dir()).map_err(|e| {
            VaultError::Config(format!(
                "failed to create {}: {e}",
                self.cache_dir().display()
            ))
        })
    }

    pub fn list_file(&self) -> PathBuf {
        self.app_dir.join(LIST_FILE)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.app_dir.join(CACHE_DIR)
    }

    /// Where the OS tool drops the structured export for `name`. The tool
    /// prefixes exported files with the interface name ("Wi-Fi" on stock
    /// installs); names the tool sanitizes differently simply miss this
    /// path and resolution falls through to the next strategy.
    pub fn export_file(&self, name: &str) -> PathBuf {
        self.cache_dir().join(format!("Wi-Fi-{name}.xml"))
    }

    /// Flat three-line detail cache for `name`, keyed by [`cache_key`]
    /// because raw profile names are not filesystem-safe.
    pub fn flat_cache_file(&self, name: &str) -> PathBuf {
        self.cache_dir().join(format!("{}.txt", cache_key(name)))
    }

    /// Scratch file used while handing a built profile XML to the OS tool.
    pub fn staging_file(&self) -> PathBuf {
        self.cache_dir().join("new-profile.xml")
    }
}

/// Stable filesystem-safe key for a profile name.
pub fn cache_key(name: &str) -> String {
    let digest = Sha256::digest(name.as_bytes());
    let mut key = String::with_capacity(digest.len() * 2);
    for byte in digest {
        key.push_str(&format!("{byte:02x}"));
    }
    key
}
