use std::fmt;

use serde::Serialize;

/// Slot value stored in the flat detail cache when a profile has no key
/// material (open networks). Kept byte-compatible with prior runs.
pub const KEY_NONE: &str = "*None*";

/// Sentinel for fields no resolution strategy could produce. Shown
/// verbatim by the presentation layer instead of surfacing an error.
pub const UNRESOLVED: &str = "*Unable to find*";

/// Resolved security detail for one saved profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileDetail {
    pub profile_name: String,
    pub ssid: String,
    pub authentication: String,
    /// `None` when the network is open or the key was not retrievable.
    pub key: Option<String>,
}

impl ProfileDetail {
    /// The record returned when every resolution strategy is exhausted.
    /// Never persisted to the detail cache.
    pub fn unresolved(name: &str) -> Self {
        Self {
            profile_name: name.to_owned(),
            ssid: name.to_owned(),
            authentication: UNRESOLVED.to_owned(),
            key: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.authentication != UNRESOLVED
    }
}

impl fmt::Display for ProfileDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (ssid {}, {}, key {})",
            self.profile_name,
            self.ssid,
            self.authentication,
            self.key.as_deref().unwrap_or("-"),
        )
    }
}

/// Open networks carry no key material. The structured export spells the
/// mode `open`, the textual query `Open`; both must agree.
pub fn is_open_auth(authentication: &str) -> bool {
    authentication.trim().eq_ignore_ascii_case("open")
}

/// The currently connected interface/network pair, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionInfo {
    pub interface: String,
    pub ssid: String,
}

impl fmt::Display for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.ssid, self.interface)
    }
}
