//! Line-oriented parsers for the text output of the OS wireless tool.
//!
//! The tool prints aligned `key : value` tables whose alignment padding
//! varies between fields and OS builds. Splitting on the first ` : `
//! (space-colon-space) keeps values containing bare colons intact; lines
//! that match no expected key are skipped so headers, separators and
//! localised noise never cause an error.

use crate::error::{VaultError, VaultResult};
use crate::wlan::types::{is_open_auth, ConnectionInfo};

/// Split a `key : value` line on the first ` : ` separator, falling back
/// to a trailing ` :` for empty values. Both parts are trimmed.
pub fn split_kv(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_end();
    if let Some(idx) = line.find(" : ") {
        let key = line[..idx].trim();
        let value = line[idx + 3..].trim();
        return Some((key, value));
    }
    if let Some(stripped) = line.strip_suffix(" :") {
        return Some((stripped.trim(), ""));
    }
    None
}

/// Drop one pair of surrounding double quotes, as printed around SSID
/// values in the per-profile query output.
fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Extract saved profile names from the profile enumeration output.
///
/// ```text
/// User profiles
/// -------------
///     All User Profile     : HomeNet
///     All User Profile     : Cafe Corner
/// ```
pub fn parse_profile_names(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(split_kv)
        .filter(|(key, _)| *key == "All User Profile")
        .map(|(_, value)| value.to_owned())
        .collect()
}

/// Extract (ssid, authentication, key) from a single-profile query with
/// key material revealed. The profile `Name` field doubles as the SSID on
/// this path, matching what the tool reports for ordinary names. A
/// secured profile whose `Key Content` line is missing (key redacted, or
/// output garbled by a hostile name) is a parse failure so the caller can
/// fall through to the next strategy.
pub fn parse_single_profile(output: &str) -> VaultResult<(String, String, Option<String>)> {
    let mut name = None;
    let mut authentication = None;
    let mut key_content = None;

    for line in output.lines() {
        let Some((key, value)) = split_kv(line) else {
            continue;
        };
        match key {
            "Name" if name.is_none() => name = Some(strip_quotes(value).to_owned()),
            "Authentication" if authentication.is_none() => {
                authentication = Some(value.to_owned());
            }
            "Key Content" if key_content.is_none() => key_content = Some(value.to_owned()),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| VaultError::Parse("profile query output has no Name".into()))?;
    let authentication = authentication
        .ok_or_else(|| VaultError::Parse("profile query output has no Authentication".into()))?;

    if is_open_auth(&authentication) {
        return Ok((name, authentication, None));
    }
    let key = key_content
        .ok_or_else(|| VaultError::Parse("secured profile query output has no Key Content".into()))?;
    Ok((name, authentication, Some(key)))
}

/// Locate `name`'s section in the all-profiles dump and extract
/// (ssid, authentication) from it. Used for names the tool cannot
/// unambiguously delimit in a single-profile query; key material is not
/// retrievable on this path.
///
/// The section starts at the profile's own `Name` line (or, failing an
/// exact match, the first line mentioning the raw name) and ends at the
/// next profile's `Name` header.
pub fn find_profile_block(output: &str, name: &str) -> VaultResult<(String, String)> {
    let lines: Vec<&str> = output.lines().collect();

    let start = lines
        .iter()
        .position(|line| matches!(split_kv(line), Some(("Name", value)) if value == name))
        .or_else(|| lines.iter().position(|line| line.contains(name)))
        .ok_or_else(|| {
            VaultError::Parse(format!("profile {name:?} not found in bulk output"))
        })?;

    let mut ssid = None;
    let mut authentication = None;

    for line in &lines[start + 1..] {
        let Some((key, value)) = split_kv(line) else {
            continue;
        };
        match key {
            // Next profile's header: stop scanning.
            "Name" => break,
            "SSID name" if ssid.is_none() => ssid = Some(strip_quotes(value).to_owned()),
            "Authentication" if authentication.is_none() => {
                authentication = Some(value.to_owned());
            }
            _ => {}
        }
    }

    match (ssid, authentication) {
        (Some(ssid), Some(authentication)) => Ok((ssid, authentication)),
        _ => Err(VaultError::Parse(format!(
            "bulk output section for {name:?} is missing SSID name or Authentication"
        ))),
    }
}

/// Extract the first connected interface/SSID pair from the interface
/// status output, or `None` when nothing is connected.
pub fn parse_interfaces(output: &str) -> Option<ConnectionInfo> {
    let mut interface: Option<&str> = None;
    let mut connected = false;

    for line in output.lines() {
        let Some((key, value)) = split_kv(line) else {
            continue;
        };
        match key {
            "Name" => {
                interface = Some(value);
                connected = false;
            }
            "State" => connected = value == "connected",
            // Exact match: the BSSID line must not satisfy this arm.
            "SSID" if connected => {
                return Some(ConnectionInfo {
                    interface: interface?.to_owned(),
                    ssid: value.to_owned(),
                });
            }
            _ => {}
        }
    }

    None
}
