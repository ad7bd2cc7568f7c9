use std::time::{Duration, Instant};

/// Render a `Duration` with automatic unit scaling, e.g. `1.94ms` or `2.34s`.
pub fn fmt_duration(d: Duration) -> String {
    format!("{d:.2?}")
}

/// Warn when the time since `start` exceeds `threshold`.
pub fn log_if_slow(start: Instant, threshold: Duration, target: &str) {
    let elapsed = start.elapsed();
    if elapsed > threshold {
        tracing::warn!(
            target_url = target,
            duration = fmt_duration(elapsed),
            threshold = fmt_duration(threshold),
            "slow portal request"
        );
    }
}
