use crate::devices::{Device, DeviceCategory, DeviceStatus, ScanReport};
use crate::mac::{classify_vendor, normalize_mac};
use crate::neighbors::{parse_neighbor_table, NeighborEntry};
use crate::registry::InfrastructureRegistry;
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs one reconciliation pass per call: read the neighbor table, merge it
/// against the registry, probe the gateway, publish the finished view.
pub struct ScanEngine {
    registry: Arc<InfrastructureRegistry>,
    probe_deadline: Duration,
}

impl ScanEngine {
    pub fn new(registry: Arc<InfrastructureRegistry>, probe_deadline: Duration) -> Self {
        Self {
            registry,
            probe_deadline,
        }
    }

    pub async fn scan(&self) -> anyhow::Result<ScanReport> {
        let output = Command::new("arp")
            .arg("-a")
            .output()
            .await
            .context("failed to run arp")?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let entries = parse_neighbor_table(&stdout);
        debug!(entries = entries.len(), "parsed neighbor table");

        // The probe only ever affects the gateway member, and a miss is
        // routine (the upstream router drops ICMP under load), so failure
        // must not abort the pass.
        let gateway_reachable = self.probe_gateway().await;

        let report = reconcile(&self.registry, &entries, gateway_reachable);
        self.registry.publish(report.infra.clone());
        Ok(report)
    }

    /// One bounded ICMP echo against the gateway's declared address.
    async fn probe_gateway(&self) -> bool {
        let Some((_, gateway_ip)) = self.registry.gateway() else {
            return false;
        };
        let deadline_secs = self.probe_deadline.as_secs().max(1);
        let ping = Command::new("ping")
            .args(["-c", "1", "-t", &deadline_secs.to_string(), gateway_ip])
            .output();

        // Belt and suspenders on top of ping's own -t deadline.
        match tokio::time::timeout(self.probe_deadline + Duration::from_secs(1), ping).await {
            Ok(Ok(output)) => output.status.success(),
            Ok(Err(e)) => {
                warn!("gateway probe failed to run: {}", e);
                false
            }
            Err(_) => {
                debug!(gateway = gateway_ip, "gateway probe timed out");
                false
            }
        }
    }
}

/// Merge parsed neighbor entries against the registry. Pure so the pass is
/// testable without a live neighbor table.
///
/// Known hardware addresses update the matching member's address and status;
/// unknown ones become transient clients with fresh sequential identifiers.
/// Duplicate rows for one member are idempotent aside from last-wins on the
/// address. The gateway probe result is applied after the merge and only to
/// the gateway member.
pub fn reconcile(
    registry: &InfrastructureRegistry,
    entries: &[NeighborEntry],
    gateway_reachable: bool,
) -> ScanReport {
    let mut infra = registry.baseline();
    let mut clients = Vec::new();
    let mut id_counter = 1u32;

    for entry in entries {
        let canonical = normalize_mac(&entry.mac_address);
        if let Some(idx) = registry.resolve(&canonical) {
            infra[idx].ip_address = entry.ip_address.clone();
            infra[idx].status = registry.observed_status(idx);
        } else {
            let fragment: String = canonical.chars().take(5).collect();
            clients.push(Device {
                id: format!("CLNT_{:03}", id_counter),
                name: format!("DEVICE-{}", fragment),
                category: DeviceCategory::Client,
                brand: classify_vendor(&canonical),
                ip_address: entry.ip_address.clone(),
                mac_address: Some(canonical),
                location: None,
                status: DeviceStatus::Nominal,
                dwn: None,
                up: None,
                ping: None,
                health: None,
                devices: None,
            });
            id_counter += 1;
        }
    }

    if gateway_reachable {
        if let Some((idx, _)) = registry.gateway() {
            infra[idx].status = DeviceStatus::Nominal;
        }
    }

    ScanReport { clients, infra }
}
