use crate::devices::HostInfo;
use std::net::UdpSocket;
use sysinfo::System;

/// Read-through of OS facilities for the /api/hostinfo panel. No caching;
/// the figures are cheap to collect on every poll.
pub fn collect() -> HostInfo {
    let mut sys = System::new();
    sys.refresh_memory();
    sys.refresh_cpu();

    let total = sys.total_memory();
    let used = sys.used_memory();
    let mem_percent = if total > 0 {
        (used as f64 / total as f64) * 100.0
    } else {
        0.0
    };

    let uptime = System::uptime();
    let days = uptime / 86_400;
    let hours = (uptime % 86_400) / 3_600;

    HostInfo {
        platform: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu_count: sys.cpus().len(),
        mem_percent: format!("{:.1}", mem_percent),
        uptime: format!("{}d {}h", days, hours),
        local_ip: local_ip(),
    }
}

/// Routable local address via the connected-UDP-socket trick; no packet is
/// actually sent. Falls back to loopback when the host has no route.
fn local_ip() -> String {
    UdpSocket::bind("0.0.0.0:0")
        .and_then(|socket| {
            socket.connect("8.8.8.8:80")?;
            socket.local_addr()
        })
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|_| "127.0.0.1".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_produces_plausible_figures() {
        let info = collect();
        assert!(info.cpu_count >= 1);
        assert!(!info.platform.is_empty());
        assert!(info.uptime.contains('d'));
        let mem: f64 = info.mem_percent.parse().unwrap();
        assert!((0.0..=100.0).contains(&mem));
    }
}
