//! Reading and writing the OS tool's structured per-profile export files.
//!
//! The export schema is fixed and flat enough that the relevant elements
//! are extracted by tag scanning, the same way every other tool output is
//! parsed in this crate. Values are entity-escaped by the exporter, so
//! both directions go through the escape helpers below.

use crate::error::{VaultError, VaultResult};
use crate::wlan::types::is_open_auth;

/// Text content of the first `<tag>...</tag>` pair, children included.
fn tag_text<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(&xml[start..end])
}

/// Extract (ssid, authentication, key) from a structured export document.
///
/// The SSID is the `<name>` nested under `<SSIDConfig>/<SSID>` — the
/// document's top-level `<name>` is the profile name and may differ.
/// A secured profile without `<keyMaterial>` is malformed; an open one
/// legitimately has none.
pub fn parse_profile_export(xml: &str) -> VaultResult<(String, String, Option<String>)> {
    let ssid_config = tag_text(xml, "SSIDConfig")
        .and_then(|cfg| tag_text(cfg, "SSID"))
        .ok_or_else(|| VaultError::MalformedExport("missing SSIDConfig/SSID element".into()))?;
    let ssid = tag_text(ssid_config, "name")
        .ok_or_else(|| VaultError::MalformedExport("missing SSID name element".into()))?;

    let authentication = tag_text(xml, "authentication")
        .ok_or_else(|| VaultError::MalformedExport("missing authentication element".into()))?;

    let key = if is_open_auth(authentication) {
        None
    } else {
        let material = tag_text(xml, "keyMaterial").ok_or_else(|| {
            VaultError::MalformedExport("secured profile is missing keyMaterial".into())
        })?;
        Some(unescape_xml(material))
    };

    Ok((unescape_xml(ssid), unescape_xml(authentication), key))
}

/// Build a profile document the OS tool accepts for `add profile`.
/// Open authentication omits the shared-key block entirely.
pub fn build_profile_xml(
    ssid: &str,
    connection_mode: &str,
    authentication: &str,
    encryption: &str,
    key: Option<&str>,
) -> String {
    let ssid = escape_xml(ssid);
    let mut xml = format!(
        "<?xml version=\"1.0\"?>\n\
         <WLANProfile xmlns=\"http://www.microsoft.com/networking/WLAN/profile/v1\">\n\
         \t<name>{ssid}</name>\n\
         \t<SSIDConfig>\n\
         \t\t<SSID>\n\
         \t\t\t<name>{ssid}</name>\n\
         \t\t</SSID>\n\
         \t</SSIDConfig>\n\
         \t<connectionType>ESS</connectionType>\n\
         \t<connectionMode>{mode}</connectionMode>\n\
         \t<MSM>\n\
         \t\t<security>\n\
         \t\t\t<authEncryption>\n\
         \t\t\t\t<authentication>{auth}</authentication>\n\
         \t\t\t\t<encryption>{enc}</encryption>\n\
         \t\t\t\t<useOneX>false</useOneX>\n\
         \t\t\t</authEncryption>\n",
        mode = escape_xml(connection_mode),
        auth = escape_xml(authentication),
        enc = escape_xml(encryption),
    );

    if let Some(key) = key.filter(|_| !is_open_auth(authentication)) {
        xml.push_str(&format!(
            "\t\t\t<sharedKey>\n\
             \t\t\t\t<keyType>passPhrase</keyType>\n\
             \t\t\t\t<protected>false</protected>\n\
             \t\t\t\t<keyMaterial>{}</keyMaterial>\n\
             \t\t\t</sharedKey>\n",
            escape_xml(key),
        ));
    }

    xml.push_str("\t\t</security>\n\t</MSM>\n</WLANProfile>\n");
    xml
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Resolve the five named entities plus decimal/hex character references.
/// A bare or unknown `&` is passed through unchanged.
fn unescape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];
        let Some(end) = rest.find(';') else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };
        let entity = &rest[1..end];
        let replacement = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse::<u32>().ok()))
                .and_then(char::from_u32),
        };
        match replacement {
            Some(c) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const WPA2_EXPORT: &str = r#"<?xml version="1.0"?>
<WLANProfile xmlns="http://www.microsoft.com/networking/WLAN/profile/v1">
	<name>HomeNet</name>
	<SSIDConfig>
		<SSID>
			<hex>486F6D654E6574</hex>
			<name>HomeNet</name>
		</SSID>
	</SSIDConfig>
	<connectionType>ESS</connectionType>
	<connectionMode>auto</connectionMode>
	<MSM>
		<security>
			<authEncryption>
				<authentication>WPA2PSK</authentication>
				<encryption>AES</encryption>
				<useOneX>false</useOneX>
			</authEncryption>
			<sharedKey>
				<keyType>passPhrase</keyType>
				<protected>false</protected>
				<keyMaterial>hunter2 pass</keyMaterial>
			</sharedKey>
		</security>
	</MSM>
</WLANProfile>
"#;

    const OPEN_EXPORT: &str = r#"<?xml version="1.0"?>
<WLANProfile xmlns="http://www.microsoft.com/networking/WLAN/profile/v1">
	<name>Library</name>
	<SSIDConfig>
		<SSID>
			<name>Library</name>
		</SSID>
	</SSIDConfig>
	<connectionType>ESS</connectionType>
	<connectionMode>manual</connectionMode>
	<MSM>
		<security>
			<authEncryption>
				<authentication>open</authentication>
				<encryption>none</encryption>
				<useOneX>false</useOneX>
			</authEncryption>
		</security>
	</MSM>
</WLANProfile>
"#;

    #[test]
    fn parses_secured_export() {
        let (ssid, auth, key) = parse_profile_export(WPA2_EXPORT).unwrap();
        assert_eq!(ssid, "HomeNet");
        assert_eq!(auth, "WPA2PSK");
        assert_eq!(key.as_deref(), Some("hunter2 pass"));
    }

    #[test]
    fn open_export_yields_no_key() {
        let (ssid, auth, key) = parse_profile_export(OPEN_EXPORT).unwrap();
        assert_eq!(ssid, "Library");
        assert_eq!(auth, "open");
        assert_eq!(key, None);
    }

    #[test]
    fn ssid_comes_from_ssidconfig_not_profile_name() {
        let xml = WPA2_EXPORT.replacen("<name>HomeNet</name>", "<name>Renamed profile</name>", 1);
        let (ssid, _, _) = parse_profile_export(&xml).unwrap();
        assert_eq!(ssid, "HomeNet");
    }

    #[test]
    fn entity_escaped_values_are_unescaped() {
        let xml = WPA2_EXPORT
            .replace("<name>HomeNet</name>", "<name>Caf&#233; &amp; Bar</name>")
            .replace(
                "<keyMaterial>hunter2 pass</keyMaterial>",
                "<keyMaterial>a&lt;b&gt;&quot;c&quot;</keyMaterial>",
            );
        let (ssid, _, key) = parse_profile_export(&xml).unwrap();
        assert_eq!(ssid, "Café & Bar");
        assert_eq!(key.as_deref(), Some("a<b>\"c\""));
    }

    #[test]
    fn missing_ssid_is_malformed() {
        let xml = "<WLANProfile><MSM><security><authEncryption>\
                   <authentication>open</authentication>\
                   </authEncryption></security></MSM></WLANProfile>";
        assert!(matches!(
            parse_profile_export(xml),
            Err(VaultError::MalformedExport(_))
        ));
    }

    #[test]
    fn missing_authentication_is_malformed() {
        let xml = "<WLANProfile><SSIDConfig><SSID><name>X</name></SSID></SSIDConfig></WLANProfile>";
        assert!(matches!(
            parse_profile_export(xml),
            Err(VaultError::MalformedExport(_))
        ));
    }

    #[test]
    fn secured_export_without_key_material_is_malformed() {
        let xml = WPA2_EXPORT.replace("<keyMaterial>hunter2 pass</keyMaterial>", "");
        assert!(matches!(
            parse_profile_export(&xml),
            Err(VaultError::MalformedExport(_))
        ));
    }

    // -- building ---------------------------------------------------------

    #[test]
    fn built_profile_round_trips_through_the_parser() {
        let xml = build_profile_xml("Café & Bar", "auto", "WPA2PSK", "AES", Some("p<a>ss"));
        let (ssid, auth, key) = parse_profile_export(&xml).unwrap();
        assert_eq!(ssid, "Café & Bar");
        assert_eq!(auth, "WPA2PSK");
        assert_eq!(key.as_deref(), Some("p<a>ss"));
    }

    #[test]
    fn open_profile_omits_shared_key_block() {
        let xml = build_profile_xml("Library", "manual", "open", "none", None);
        assert!(!xml.contains("sharedKey"));
        let (_, auth, key) = parse_profile_export(&xml).unwrap();
        assert_eq!(auth, "open");
        assert_eq!(key, None);
    }

    #[test]
    fn open_profile_ignores_stray_key() {
        let xml = build_profile_xml("Library", "auto", "open", "none", Some("ignored"));
        assert!(!xml.contains("ignored"));
    }

    // -- escaping ---------------------------------------------------------

    #[test]
    fn unescape_handles_numeric_references() {
        assert_eq!(unescape_xml("&#65;&#x42;"), "AB");
    }

    #[test]
    fn unescape_passes_bare_ampersand_through() {
        assert_eq!(unescape_xml("a & b &bogus; c"), "a & b &bogus; c");
    }

    #[test]
    fn escape_then_unescape_is_identity() {
        let raw = "a<b>&\"c\"'d' ☕";
        assert_eq!(unescape_xml(&escape_xml(raw)), raw);
    }
}
