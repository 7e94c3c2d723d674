use crate::devices::RadioInfo;
use anyhow::{bail, Context};
use serde_json::Value;
use tokio::process::Command;

/// Query the active Wi-Fi radio session via system_profiler. `Ok(None)`
/// means the tool ran but no interface has a current network; a tool failure
/// is an error for the handler boundary to report.
pub async fn collect() -> anyhow::Result<Option<RadioInfo>> {
    let output = Command::new("system_profiler")
        .args(["SPAirPortDataType", "-json"])
        .output()
        .await
        .context("failed to run system_profiler")?;
    if !output.status.success() {
        bail!("system_profiler exited with {}", output.status);
    }
    let data: Value = serde_json::from_slice(&output.stdout)
        .context("unparseable system_profiler output")?;
    Ok(extract_active_network(&data))
}

/// Walk the SPAirPortDataType tree for the first interface with a current
/// network. Field shapes vary between macOS releases, so every lookup
/// degrades to "Unknown" instead of failing.
pub fn extract_active_network(data: &Value) -> Option<RadioInfo> {
    let cards = data.get("SPAirPortDataType")?.as_array()?;
    let active = cards
        .iter()
        .filter_map(|card| card.get("spairport_airport_interfaces")?.as_array())
        .flatten()
        .find_map(|iface| iface.get("spairport_current_network_information"))?;

    let channel_raw =
        field_string(active, "spairport_network_channel").unwrap_or_else(unknown);
    // The raw channel reads like "52 (5GHz, 80MHz)"; the dashboard wants the
    // leading number on its own.
    let channel = channel_raw
        .split(' ')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(unknown);
    let security = field_string(active, "spairport_security_mode")
        .map(|s| s.trim_start_matches("spairport_security_mode_").to_string())
        .unwrap_or_else(unknown);

    Some(RadioInfo {
        ssid: field_string(active, "_name").unwrap_or_else(unknown),
        channel,
        channel_raw,
        security,
        phymode: field_string(active, "spairport_network_phymode").unwrap_or_else(unknown),
        signal: field_string(active, "spairport_signal_noise").unwrap_or_else(unknown),
        rate: field_string(active, "spairport_network_rate").unwrap_or_else(unknown),
    })
}

fn unknown() -> String {
    "Unknown".to_string()
}

fn field_string(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_active_network_fields() {
        let data = json!({
            "SPAirPortDataType": [{
                "spairport_airport_interfaces": [
                    { "_name": "en1" },
                    {
                        "_name": "en0",
                        "spairport_current_network_information": {
                            "_name": "HOME_NET",
                            "spairport_network_channel": "52 (5GHz, 80MHz)",
                            "spairport_security_mode": "spairport_security_mode_wpa3_personal",
                            "spairport_network_phymode": "802.11ax",
                            "spairport_signal_noise": "-52 dBm / -90 dBm",
                            "spairport_network_rate": 864
                        }
                    }
                ]
            }]
        });
        let radio = extract_active_network(&data).expect("active network");
        assert_eq!(radio.ssid, "HOME_NET");
        assert_eq!(radio.channel, "52");
        assert_eq!(radio.channel_raw, "52 (5GHz, 80MHz)");
        assert_eq!(radio.security, "wpa3_personal");
        assert_eq!(radio.rate, "864");
    }

    #[test]
    fn no_active_session_yields_none() {
        let data = json!({
            "SPAirPortDataType": [{
                "spairport_airport_interfaces": [{ "_name": "en0" }]
            }]
        });
        assert!(extract_active_network(&data).is_none());
    }

    #[test]
    fn missing_fields_degrade_to_unknown() {
        let data = json!({
            "SPAirPortDataType": [{
                "spairport_airport_interfaces": [{
                    "spairport_current_network_information": { "_name": "BARE_NET" }
                }]
            }]
        });
        let radio = extract_active_network(&data).expect("active network");
        assert_eq!(radio.ssid, "BARE_NET");
        assert_eq!(radio.channel, "Unknown");
        assert_eq!(radio.security, "Unknown");
    }
}
