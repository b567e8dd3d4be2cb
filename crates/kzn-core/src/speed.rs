//! Human-readable transfer rates.

use std::time::Duration;

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Formats a byte rate as a fixed-width string: `KiB/s` up to 1 MiB/s, `MiB/s` above.
///
/// The numeric part is right-aligned in six columns with two decimals, so
/// 1 048 577 B/s renders as `"  1.00MiB/s"`.
pub fn format_speed(bytes_per_sec: f64) -> String {
    if bytes_per_sec > MIB {
        format!("{:6.2}MiB/s", bytes_per_sec / MIB)
    } else {
        format!("{:6.2}KiB/s", bytes_per_sec / KIB)
    }
}

/// Average rate in bytes per second (0 if no time elapsed).
pub fn average_rate(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    bytes as f64 / secs
}
