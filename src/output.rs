//! Rendering for the CLI: aligned text tables on stdout, or JSON when
//! requested. Detail columns stay blank in the list view; they fill in
//! per profile via `show`.

use serde_json::json;

use crate::error::VaultResult;
use crate::wlan::types::{ConnectionInfo, ProfileDetail};

pub fn print_profile_rows(names: &[String], json_output: bool) -> VaultResult<()> {
    if json_output {
        let rows: Vec<_> = names.iter().map(|name| json!({ "name": name })).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    print_headings();
    for name in names {
        println!("{name:<32} {:<24} {:<18}", "", "");
    }
    Ok(())
}

pub fn print_detail(detail: &ProfileDetail, json_output: bool) -> VaultResult<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(detail)?);
        return Ok(());
    }

    print_headings();
    println!(
        "{:<32} {:<24} {:<18} {}",
        detail.profile_name,
        detail.ssid,
        detail.authentication,
        detail.key.as_deref().unwrap_or(""),
    );
    Ok(())
}

pub fn print_status(status: Option<&ConnectionInfo>, json_output: bool) -> VaultResult<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    match status {
        Some(info) => println!("Connected to {} (interface {})", info.ssid, info.interface),
        None => println!("No network connected"),
    }
    Ok(())
}

fn print_headings() {
    println!(
        "{:<32} {:<24} {:<18} {}",
        "Wifi Name", "SSID", "Authentication", "Password"
    );
    println!("{}", "-".repeat(88));
}
