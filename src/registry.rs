use crate::devices::{Device, DeviceCategory, DeviceStatus, Vendor};
use crate::mac::normalize_mac;
use std::collections::HashMap;
use std::sync::RwLock;

/// Placeholder served in place of an address for a member not seen in the
/// current pass. The dashboard renders it verbatim.
const IP_OFFLINE: &str = "OFFLINE";

/// Static declaration of one infrastructure node. The diagnostic figures are
/// the declared capacities shown on the dashboard dials, not live readings.
struct InfraDef {
    key: &'static str,
    name: &'static str,
    category: DeviceCategory,
    brand: Vendor,
    /// Fixed address, if the node has one we can probe. Only the gateway does.
    declared_ip: Option<&'static str>,
    /// Hardware address used as the reconciliation key.
    mac: Option<&'static str>,
    location: &'static str,
    /// Status a member takes when it shows up in a scan. Not uniform: the
    /// mesh main has known link-quality issues even when reachable.
    observed_status: DeviceStatus,
    dwn: u32,
    up: u32,
    ping: u32,
    health: u32,
    devices: u32,
    gateway: bool,
}

const INFRA_DEFS: &[InfraDef] = &[
    InfraDef {
        key: "RT01",
        name: "ATT_FIBER_MAIN",
        category: DeviceCategory::Router,
        brand: Vendor::Att,
        declared_ip: Some("192.168.1.254"),
        mac: None,
        location: "MAIN",
        observed_status: DeviceStatus::Nominal,
        dwn: 940,
        up: 920,
        ping: 12,
        health: 98,
        devices: 14,
        gateway: true,
    },
    InfraDef {
        key: "RT02",
        name: "GOOG_WIFI_MAIN",
        category: DeviceCategory::Router,
        brand: Vendor::Google,
        declared_ip: None,
        mac: Some("B8:7B:D4:B8:07:25"),
        location: "MAIN",
        observed_status: DeviceStatus::SubOptimal,
        dwn: 450,
        up: 380,
        ping: 24,
        health: 85,
        devices: 22,
        gateway: false,
    },
    InfraDef {
        key: "AP02",
        name: "GOOG_WIFI_NODE",
        category: DeviceCategory::AccessPoint,
        brand: Vendor::Google,
        declared_ip: None,
        mac: Some("B8:7B:D4:B8:01:C1"),
        location: "NODE",
        observed_status: DeviceStatus::Nominal,
        dwn: 320,
        up: 280,
        ping: 31,
        health: 80,
        devices: 11,
        gateway: false,
    },
];

/// The closed set of known infrastructure nodes. Static fields never change;
/// the published live view is replaced wholesale by each reconciliation pass.
pub struct InfrastructureRegistry {
    /// Canonical MAC -> index into INFRA_DEFS, built once at construction.
    by_mac: HashMap<String, usize>,
    live: RwLock<Vec<Device>>,
}

impl InfrastructureRegistry {
    pub fn new() -> Self {
        let by_mac = INFRA_DEFS
            .iter()
            .enumerate()
            .filter_map(|(i, def)| def.mac.map(|m| (normalize_mac(m), i)))
            .collect();
        let registry = Self {
            by_mac,
            live: RwLock::new(Vec::new()),
        };
        let baseline = registry.baseline();
        registry.publish(baseline);
        registry
    }

    /// Fresh working view for a reconciliation pass: every member OFFLINE
    /// with its observed address cleared, so nothing stale leaks forward.
    /// The gateway keeps its declared address; that is what we probe.
    pub fn baseline(&self) -> Vec<Device> {
        INFRA_DEFS
            .iter()
            .map(|def| Device {
                id: def.key.to_string(),
                name: def.name.to_string(),
                category: def.category,
                brand: def.brand,
                ip_address: def.declared_ip.unwrap_or(IP_OFFLINE).to_string(),
                mac_address: def.mac.map(normalize_mac),
                location: Some(def.location.to_string()),
                status: DeviceStatus::Offline,
                dwn: Some(def.dwn),
                up: Some(def.up),
                ping: Some(def.ping),
                health: Some(def.health),
                devices: Some(def.devices),
            })
            .collect()
    }

    /// Reverse lookup by canonical hardware address. Membership is closed, so
    /// the map never changes after construction.
    pub fn resolve(&self, canonical_mac: &str) -> Option<usize> {
        self.by_mac.get(canonical_mac).copied()
    }

    pub fn observed_status(&self, index: usize) -> DeviceStatus {
        INFRA_DEFS[index].observed_status
    }

    /// The primary gateway member and its declared probe address.
    pub fn gateway(&self) -> Option<(usize, &'static str)> {
        INFRA_DEFS
            .iter()
            .enumerate()
            .find(|(_, def)| def.gateway)
            .and_then(|(i, def)| def.declared_ip.map(|ip| (i, ip)))
    }

    /// Replace the published view with a completed pass's output.
    pub fn publish(&self, view: Vec<Device>) {
        *self.live.write().unwrap() = view;
    }

    /// Defensive copy of the last published view.
    pub fn snapshot(&self) -> Vec<Device> {
        self.live.read().unwrap().clone()
    }
}

impl Default for InfrastructureRegistry {
    fn default() -> Self {
        Self::new()
    }
}
