use clap::Parser;
use lan_telemetry::registry::InfrastructureRegistry;
use lan_telemetry::scanner::ScanEngine;
use lan_telemetry::speedtest::{self, SpeedTestCache};
use lan_telemetry::web::{start_web_server, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "lan-telemetry")]
#[command(about = "Telemetry backend for the home network dashboard", long_about = None)]
struct Cli {
    /// Port for the dashboard API
    #[arg(short, long, default_value = "3001")]
    port: u16,

    /// Minutes between scheduled speed test runs
    #[arg(long, default_value = "10")]
    speedtest_interval: u64,

    /// Deadline in seconds for the gateway reachability probe
    #[arg(long, default_value = "1")]
    probe_deadline: u64,

    /// Path to store log files
    #[arg(short, long, default_value = "logs")]
    log_dir: PathBuf,
}

/// Host utilities the service shells out to. A missing one degrades the
/// matching endpoint rather than stopping the process.
const HOST_TOOLS: &[&str] = &["arp", "ping", "networkQuality", "system_profiler"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging
    std::fs::create_dir_all(&cli.log_dir)?;
    let file_appender =
        RollingFileAppender::new(Rotation::HOURLY, &cli.log_dir, "lan-telemetry.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(fmt::layer().with_writer(std::io::stdout))
        .with(fmt::layer().json().with_writer(non_blocking))
        .init();

    info!("Starting LAN Telemetry");
    info!("API: http://localhost:{}", cli.port);
    info!("Speed test interval: {}m", cli.speedtest_interval);

    for tool in HOST_TOOLS {
        if which::which(tool).is_err() {
            warn!("host utility '{}' not found; its endpoint will degrade", tool);
        }
    }

    let registry = Arc::new(InfrastructureRegistry::new());
    let speedtest = Arc::new(SpeedTestCache::new());

    // First measurement fires immediately, then on the fixed period,
    // independent of any read traffic.
    speedtest::start_scheduler(
        speedtest.clone(),
        Duration::from_secs(cli.speedtest_interval * 60),
    );

    let state = Arc::new(AppState {
        scanner: ScanEngine::new(registry, Duration::from_secs(cli.probe_deadline)),
        speedtest,
    });

    start_web_server(state, cli.port).await
}
