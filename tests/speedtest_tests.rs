use lan_telemetry::speedtest::SpeedTestCache;
use std::sync::Arc;
use std::thread;

#[test]
fn begin_run_is_single_flight() {
    let cache = SpeedTestCache::new();
    assert!(cache.begin_run());
    assert!(!cache.begin_run());
    cache.abort_run();
    assert!(cache.begin_run());
}

#[test]
fn concurrent_triggers_start_exactly_one_run() {
    let cache = Arc::new(SpeedTestCache::new());
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let cache = cache.clone();
            thread::spawn(move || cache.begin_run())
        })
        .collect();

    let started = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|&started| started)
        .count();
    assert_eq!(started, 1);
    assert!(cache.snapshot().is_running);
}

#[test]
fn failed_run_preserves_cached_figures() {
    let cache = SpeedTestCache::new();
    assert!(cache.begin_run());
    cache.complete_run(123.45, 23.45, Some(12.3));
    let before = cache.snapshot();

    assert!(cache.begin_run());
    cache.abort_run();

    let after = cache.snapshot();
    assert!(!after.is_running);
    assert_eq!(after.dwn, before.dwn);
    assert_eq!(after.up, before.up);
    assert_eq!(after.ping, before.ping);
    assert_eq!(after.last_run, before.last_run);
}

#[test]
fn completed_run_replaces_whole_result() {
    let cache = SpeedTestCache::new();
    assert!(cache.begin_run());
    cache.complete_run(940.0, 920.0, Some(11.9));

    let result = cache.snapshot();
    assert!(!result.is_running);
    assert_eq!(result.dwn, 940.0);
    assert_eq!(result.up, 920.0);
    assert_eq!(result.ping, 11.9);
    assert!(result.last_run > 0);
}

#[test]
fn missing_ping_average_keeps_previous_value() {
    let cache = SpeedTestCache::new();
    assert!(cache.begin_run());
    cache.complete_run(500.0, 400.0, Some(20.0));

    assert!(cache.begin_run());
    cache.complete_run(510.0, 410.0, None);

    let result = cache.snapshot();
    assert_eq!(result.dwn, 510.0);
    assert_eq!(result.ping, 20.0);
}

#[test]
fn trigger_rejection_leaves_cache_untouched() {
    let cache = SpeedTestCache::new();
    assert!(cache.begin_run());
    cache.complete_run(100.0, 50.0, Some(10.0));

    assert!(cache.begin_run());
    let during = cache.snapshot();
    assert!(during.is_running);
    // A second begin while running is rejected and changes nothing.
    assert!(!cache.begin_run());
    assert_eq!(cache.snapshot().dwn, during.dwn);
    assert_eq!(cache.snapshot().ping, during.ping);
}
