use crate::devices::SpeedTestResult;
use anyhow::{bail, Context};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

/// Outcome of a trigger request. A rejection is not an error; it just means
/// a measurement is already in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunRequest {
    Started,
    AlreadyRunning,
}

/// Holds the last-known-good throughput/latency figures and enforces that at
/// most one measurement runs at a time. Reads never block on a measurement.
pub struct SpeedTestCache {
    result: RwLock<SpeedTestResult>,
}

impl SpeedTestCache {
    pub fn new() -> Self {
        Self {
            result: RwLock::new(SpeedTestResult::default()),
        }
    }

    pub fn snapshot(&self) -> SpeedTestResult {
        self.result.read().unwrap().clone()
    }

    /// Flip the running flag on. Returns false without side effects if a run
    /// is already in flight; the check and the set share one write lock, so
    /// two concurrent triggers can never both start.
    pub fn begin_run(&self) -> bool {
        let mut result = self.result.write().unwrap();
        if result.is_running {
            return false;
        }
        result.is_running = true;
        true
    }

    /// Replace the whole cached result with a completed measurement. A
    /// missing ping average keeps the previous cached value.
    pub fn complete_run(&self, dwn: f64, up: f64, ping: Option<f64>) {
        let mut result = self.result.write().unwrap();
        let ping = ping.unwrap_or(result.ping);
        *result = SpeedTestResult::completed(dwn, up, ping);
    }

    /// Clear the running flag after a failed measurement, leaving the
    /// previous figures untouched.
    pub fn abort_run(&self) {
        self.result.write().unwrap().is_running = false;
    }

    /// Start a measurement in the background unless one is already running.
    /// Returns immediately either way.
    pub fn trigger_run(self: &Arc<Self>) -> RunRequest {
        if !self.begin_run() {
            debug!("speed test trigger rejected: already running");
            return RunRequest::AlreadyRunning;
        }
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            cache.run_measurement().await;
        });
        RunRequest::Started
    }

    async fn run_measurement(&self) {
        info!("speed test starting");
        match measure().await {
            Ok((dwn, up, ping)) => {
                self.complete_run(dwn, up, ping);
                info!(
                    dwn_mbps = dwn,
                    up_mbps = up,
                    ping_ms = ping,
                    "speed test completed"
                );
            }
            Err(e) => {
                // Keep the last-known-good figures; the failure is visible
                // only here and in the is_running transition.
                error!("speed test failed: {:#}", e);
                self.abort_run();
            }
        }
    }
}

impl Default for SpeedTestCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one full measurement: throughput from networkQuality, latency from a
/// short ping burst.
async fn measure() -> anyhow::Result<(f64, f64, Option<f64>)> {
    // networkQuality is a built-in macOS tool; -c for machine-readable JSON,
    // -s for sequential up/down so the readings do not contend.
    let output = Command::new("networkQuality")
        .args(["-c", "-s"])
        .output()
        .await
        .context("failed to run networkQuality")?;
    if !output.status.success() {
        bail!(
            "networkQuality exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    let (dwn, up) = parse_network_quality(&String::from_utf8_lossy(&output.stdout))?;

    let ping = match Command::new("ping").args(["-c", "4", "8.8.8.8"]).output().await {
        Ok(out) => parse_ping_average(&String::from_utf8_lossy(&out.stdout)),
        Err(e) => {
            warn!("latency probe failed to run: {}", e);
            None
        }
    };

    Ok((dwn, up, ping))
}

/// Extract download/upload throughput from networkQuality JSON and convert
/// bits per second to Mbps, two decimal places.
pub fn parse_network_quality(stdout: &str) -> anyhow::Result<(f64, f64)> {
    let data: serde_json::Value =
        serde_json::from_str(stdout).context("unparseable networkQuality output")?;
    let dl = data
        .get("dl_throughput")
        .and_then(|v| v.as_f64())
        .context("networkQuality output missing dl_throughput")?;
    let ul = data
        .get("ul_throughput")
        .and_then(|v| v.as_f64())
        .context("networkQuality output missing ul_throughput")?;
    Ok((to_mbps(dl), to_mbps(ul)))
}

fn to_mbps(bits_per_sec: f64) -> f64 {
    (bits_per_sec / 1_000_000.0 * 100.0).round() / 100.0
}

/// Pull the average out of ping's `round-trip min/avg/max/stddev = a/b/c/d ms`
/// summary line. Absent or reshaped output is expected and yields None.
pub fn parse_ping_average(stdout: &str) -> Option<f64> {
    let line = stdout.lines().find(|l| l.contains("min/avg/max"))?;
    let values = line.split('=').nth(1)?;
    let avg = values.split('/').nth(1)?.trim();
    let avg: f64 = avg.parse().ok()?;
    Some((avg * 100.0).round() / 100.0)
}

/// Kick off a measurement at startup and again on a fixed period, regardless
/// of read traffic.
pub fn start_scheduler(cache: Arc<SpeedTestCache>, period: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            // First tick fires immediately.
            interval.tick().await;
            if cache.trigger_run() == RunRequest::AlreadyRunning {
                debug!("scheduled speed test skipped: previous run still in flight");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_network_quality_json() {
        let stdout = r#"{"dl_throughput": 123456789, "ul_throughput": 23456789, "dl_responsiveness": 512}"#;
        let (dwn, up) = parse_network_quality(stdout).unwrap();
        assert_eq!(dwn, 123.46);
        assert_eq!(up, 23.46);
    }

    #[test]
    fn rejects_malformed_throughput_output() {
        assert!(parse_network_quality("not json").is_err());
        assert!(parse_network_quality(r#"{"dl_throughput": 1}"#).is_err());
    }

    #[test]
    fn parses_ping_summary_average() {
        let stdout = "\
4 packets transmitted, 4 packets received, 0.0% packet loss\n\
round-trip min/avg/max/stddev = 10.193/12.345/15.220/1.903 ms\n";
        assert_eq!(parse_ping_average(stdout), Some(12.35));
    }

    #[test]
    fn missing_summary_line_yields_none() {
        assert_eq!(parse_ping_average("request timeout for icmp_seq 0\n"), None);
    }
}
