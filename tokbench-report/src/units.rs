//! Unit Formatting

use tokbench_core::BYTES_PER_MIB;

/// Render seconds in the largest unit that keeps the value ≥ 1
///
/// `≥ 1 s` → seconds with 3 decimals, `≥ 1 ms` → milliseconds with 3
/// decimals, otherwise microseconds with 1 decimal. Each lower threshold is
/// inclusive.
pub fn format_time(seconds: f64) -> String {
    if seconds >= 1.0 {
        format!("{:.3} s", seconds)
    } else if seconds >= 0.001 {
        format!("{:.3} ms", seconds * 1_000.0)
    } else {
        format!("{:.1} μs", seconds * 1_000_000.0)
    }
}

/// Throughput in MiB/s, `None` when `seconds` is zero, negative or not finite
pub fn throughput_mib_per_sec(text_length: usize, seconds: f64) -> Option<f64> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return None;
    }
    Some(text_length as f64 / seconds / BYTES_PER_MIB)
}

/// Throughput as `"{:.1} MiB/s"`, or `"n/a"` when undefined
pub fn format_throughput(text_length: usize, seconds: f64) -> String {
    match throughput_mib_per_sec(text_length, seconds) {
        Some(mib) => format!("{:.1} MiB/s", mib),
        None => "n/a".to_string(),
    }
}

/// Memory as `"{:.1} MB"`
pub fn format_memory(megabytes: f64) -> String {
    format!("{:.1} MB", megabytes)
}

/// Ratio as `"{:.1}x"`, or `"n/a"` when undefined
pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.1}x", r),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_boundaries() {
        assert_eq!(format_time(0.0005), "500.0 μs");
        assert_eq!(format_time(0.001), "1.000 ms");
        assert_eq!(format_time(0.9999), "999.900 ms");
        assert_eq!(format_time(1.0), "1.000 s");
    }

    #[test]
    fn test_format_time_small_and_large() {
        assert_eq!(format_time(4.1e-6), "4.1 μs");
        assert_eq!(format_time(0.0), "0.0 μs");
        assert_eq!(format_time(12.5), "12.500 s");
    }

    #[test]
    fn test_throughput() {
        assert_eq!(format_throughput(1024 * 1024, 1.0), "1.0 MiB/s");
        assert_eq!(format_throughput(4500, 175.4e-6), "24.5 MiB/s");
    }

    #[test]
    fn test_throughput_guarded() {
        assert_eq!(throughput_mib_per_sec(100, 0.0), None);
        assert_eq!(throughput_mib_per_sec(100, -1.0), None);
        assert_eq!(throughput_mib_per_sec(100, f64::NAN), None);
        assert_eq!(format_throughput(100, 0.0), "n/a");
    }

    #[test]
    fn test_memory_and_ratio() {
        assert_eq!(format_memory(0.05), "0.1 MB");
        assert_eq!(format_memory(-0.3), "-0.3 MB");
        assert_eq!(format_ratio(Some(2.0)), "2.0x");
        assert_eq!(format_ratio(None), "n/a");
    }
}
