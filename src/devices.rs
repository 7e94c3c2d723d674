use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A network participant as reported to the dashboard. Registry members keep
/// their declared diagnostic figures; transient clients carry only the
/// observed fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: DeviceCategory,
    pub brand: Vendor,
    pub ip_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub status: DeviceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dwn: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ping: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devices: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceCategory {
    #[serde(rename = "ROUTER")]
    Router,
    #[serde(rename = "ACCESS_PT")]
    AccessPoint,
    #[serde(rename = "CLIENT")]
    Client,
    #[serde(rename = "SWITCH")]
    Switch,
}

/// Brand derived from the MAC prefix. Best-effort only; a wrong guess is
/// harmless and never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vendor {
    #[serde(rename = "APPLE")]
    Apple,
    #[serde(rename = "GOOGLE")]
    Google,
    #[serde(rename = "ATT")]
    Att,
    #[serde(rename = "OTHER")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceStatus {
    #[serde(rename = "NOMINAL")]
    Nominal,
    #[serde(rename = "SUB-OPTIMAL")]
    SubOptimal,
    #[serde(rename = "WARNING")]
    Warning,
    #[serde(rename = "OFFLINE")]
    Offline,
}

/// Output of one full reconciliation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub clients: Vec<Device>,
    pub infra: Vec<Device>,
}

/// Last measured throughput/latency figures. Field names match the wire
/// contract the dashboard polls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedTestResult {
    pub dwn: f64,
    pub up: f64,
    pub ping: f64,
    #[serde(rename = "lastRun")]
    pub last_run: i64,
    #[serde(rename = "isRunning")]
    pub is_running: bool,
}

impl Default for SpeedTestResult {
    fn default() -> Self {
        Self {
            dwn: 0.0,
            up: 0.0,
            ping: 0.0,
            last_run: 0,
            is_running: false,
        }
    }
}

impl SpeedTestResult {
    pub fn completed(dwn: f64, up: f64, ping: f64) -> Self {
        Self {
            dwn,
            up,
            ping,
            last_run: Utc::now().timestamp_millis(),
            is_running: false,
        }
    }
}

/// Host machine facts served on /api/hostinfo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostInfo {
    pub platform: String,
    pub arch: String,
    #[serde(rename = "cpuCount")]
    pub cpu_count: usize,
    #[serde(rename = "memPercent")]
    pub mem_percent: String,
    pub uptime: String,
    #[serde(rename = "localIp")]
    pub local_ip: String,
}

/// Active Wi-Fi radio metadata served on /api/sysinfo. Every field is
/// best-effort; absent tool output degrades to "Unknown".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadioInfo {
    pub ssid: String,
    pub channel: String,
    #[serde(rename = "channelRaw")]
    pub channel_raw: String,
    pub security: String,
    pub phymode: String,
    pub signal: String,
    pub rate: String,
}
