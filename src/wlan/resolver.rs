use std::io;
use std::sync::Arc;

use tokio::fs;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{VaultError, VaultResult};
use crate::wlan::export;
use crate::wlan::parse;
use crate::wlan::source::ProfileSource;
use crate::wlan::types::{is_open_auth, ProfileDetail, KEY_NONE, UNRESOLVED};

/// Resolves saved-profile security detail through an ordered chain of
/// extraction strategies, caching results under the app dir.
///
/// The chain exists because the OS tool's output is inconsistent for
/// profile names carrying special characters; each strategy degrades a
/// little further and the last one always produces *something* for the
/// caller to display. One instance owns its cache directory; operations
/// are sequential and not safe to interleave across instances.
pub struct ProfileInfoResolver {
    config: Config,
    source: Arc<dyn ProfileSource>,
}

impl ProfileInfoResolver {
    pub fn new(config: Config, source: Arc<dyn ProfileSource>) -> VaultResult<Self> {
        config.ensure_dirs()?;
        Ok(Self { config, source })
    }

    // ── Enumeration ──────────────────────────────────────────────────

    /// Names of all saved profiles, case-insensitively sorted ascending.
    /// The first call enumerates via the source and persists the list;
    /// later calls read the persisted file until [`Self::regenerate`]
    /// discards it. An OS failure degrades to an empty, persisted list.
    pub async fn list_profiles(&self) -> VaultResult<Vec<String>> {
        let list_file = self.config.list_file();
        if list_file.exists() {
            let raw = fs::read_to_string(&list_file).await?;
            return Ok(raw.lines().map(str::to_owned).collect());
        }

        let mut names = match self.source.enumerate().await {
            Ok(names) => names,
            Err(e) => {
                warn!("profile enumeration failed: {e}");
                Vec::new()
            }
        };
        names.sort_by_key(|name| name.to_lowercase());

        let mut payload = names.join("\n");
        if !payload.is_empty() {
            payload.push('\n');
        }
        fs::write(&list_file, payload).await?;
        Ok(names)
    }

    /// Discard the cached list and enumerate afresh. For callers that
    /// know system state changed (profile added or deleted).
    pub async fn regenerate(&self) -> VaultResult<Vec<String>> {
        let list_file = self.config.list_file();
        if list_file.exists() {
            fs::remove_file(&list_file).await?;
        }
        self.list_profiles().await
    }

    // ── Detail resolution ────────────────────────────────────────────

    /// Resolve SSID, authentication mode and key material for `name`.
    ///
    /// Strategies are tried in order; recoverable failures fall through,
    /// and total exhaustion yields the unresolved sentinel record rather
    /// than an error, so the caller always has a row to render.
    pub async fn resolve_detail(&self, name: &str) -> ProfileDetail {
        match self.from_export_file(name).await {
            Ok(Some(detail)) => return detail,
            Ok(None) => {}
            Err(e) => debug!("structured export for {name:?} unusable: {e}"),
        }

        match self.from_flat_cache(name).await {
            Ok(Some(detail)) => return detail,
            Ok(None) => {}
            Err(e) => debug!("flat cache for {name:?} unusable: {e}"),
        }

        match self.via_bulk_export(name).await {
            Ok(Some(detail)) => return detail,
            Ok(None) => debug!("bulk export did not produce a file for {name:?}"),
            Err(e) => debug!("bulk export failed for {name:?}: {e}"),
        }

        match self.via_query(name).await {
            Ok(detail) => return detail,
            Err(e) => debug!("single-profile query for {name:?} failed: {e}"),
        }

        match self.via_bulk_scan(name).await {
            Ok(detail) => return detail,
            Err(e) => warn!("all resolution strategies exhausted for {name:?}: {e}"),
        }

        // Not persisted: only successful resolutions enter the cache.
        ProfileDetail::unresolved(name)
    }

    /// Strategy 1: a structured export already sits in the cache dir.
    async fn from_export_file(&self, name: &str) -> VaultResult<Option<ProfileDetail>> {
        let path = self.config.export_file(name);
        if !path.exists() {
            return Ok(None);
        }
        let xml = fs::read_to_string(&path).await?;
        let (ssid, authentication, key) = export::parse_profile_export(&xml)?;
        Ok(Some(ProfileDetail {
            profile_name: name.to_owned(),
            ssid,
            authentication,
            key,
        }))
    }

    /// Strategy 2: flat cache written by a prior successful resolution.
    async fn from_flat_cache(&self, name: &str) -> VaultResult<Option<ProfileDetail>> {
        let path = self.config.flat_cache_file(name);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).await?;
        let mut lines = raw.lines();
        let ssid = next_cache_line(&mut lines, "ssid")?;
        let authentication = next_cache_line(&mut lines, "authentication")?;
        let key_slot = next_cache_line(&mut lines, "key")?;

        let key = if key_slot == KEY_NONE || key_slot == UNRESOLVED || is_open_auth(authentication)
        {
            None
        } else {
            Some(key_slot.to_owned())
        };
        Ok(Some(ProfileDetail {
            profile_name: name.to_owned(),
            ssid: ssid.to_owned(),
            authentication: authentication.to_owned(),
            key,
        }))
    }

    /// Strategy 3: refresh every structured export in one call, cheaper
    /// than per-profile queries when many rows get resolved, then retry
    /// strategy 1.
    async fn via_bulk_export(&self, name: &str) -> VaultResult<Option<ProfileDetail>> {
        self.source.export_all(&self.config.cache_dir()).await?;
        self.from_export_file(name).await
    }

    /// Strategy 4: single-profile query with the key revealed.
    async fn via_query(&self, name: &str) -> VaultResult<ProfileDetail> {
        let output = self.source.query_detail(name, true).await?;
        let (ssid, authentication, key) = parse::parse_single_profile(&output)?;
        let slot = key.clone().unwrap_or_else(|| KEY_NONE.to_owned());
        self.persist_flat_cache(name, &ssid, &authentication, &slot)
            .await;
        Ok(ProfileDetail {
            profile_name: name.to_owned(),
            ssid,
            authentication,
            key,
        })
    }

    /// Strategy 5: scan the all-profiles dump for `name`'s section. Key
    /// material is not retrievable here; ssid and authentication are.
    async fn via_bulk_scan(&self, name: &str) -> VaultResult<ProfileDetail> {
        let output = self.source.query_all_detail(true).await?;
        let (ssid, authentication) = parse::find_profile_block(&output, name)?;
        self.persist_flat_cache(name, &ssid, &authentication, UNRESOLVED)
            .await;
        Ok(ProfileDetail {
            profile_name: name.to_owned(),
            ssid,
            authentication,
            key: None,
        })
    }

    /// Best-effort: a cache write failure downgrades to a warning and
    /// the resolved detail is still returned.
    async fn persist_flat_cache(&self, name: &str, ssid: &str, authentication: &str, key_slot: &str) {
        let payload = format!("{ssid}\n{authentication}\n{key_slot}\n");
        if let Err(e) = fs::write(self.config.flat_cache_file(name), payload).await {
            warn!("failed to write detail cache for {name:?}: {e}");
        }
    }

    // ── Deletion ─────────────────────────────────────────────────────

    /// Delete the profile from the system, then drop its cache artifacts.
    /// Cleanup runs regardless of the delete outcome; the outcome itself
    /// is surfaced to the caller.
    pub async fn delete_profile(&self, name: &str) -> VaultResult<()> {
        let result = self.source.delete(name).await;

        for path in [
            self.config.export_file(name),
            self.config.flat_cache_file(name),
        ] {
            match fs::remove_file(&path).await {
                Ok(()) => debug!("removed cache artifact {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!("failed to remove {}: {e}", path.display()),
            }
        }

        result
    }
}

fn next_cache_line<'a>(
    lines: &mut std::str::Lines<'a>,
    field: &str,
) -> VaultResult<&'a str> {
    lines
        .next()
        .ok_or_else(|| VaultError::Parse(format!("flat cache is missing the {field} line")))
}
