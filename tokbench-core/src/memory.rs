//! Process Memory Sampling
//!
//! Resident set size is read from `/proc/self/statm` on Linux. Other
//! platforms report 0.0, which keeps memory columns defined but uninformative.

/// Bytes in one mebibyte
pub const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Source of resident-memory readings
///
/// Readings reflect live process state and may go down between samples.
pub trait MemorySampler: Send + Sync {
    /// Current resident memory of the process, in MiB
    fn resident_megabytes(&self) -> f64;

    /// Best-effort hint to return freed memory before a sample
    fn settle(&self) {}
}

/// Samples the current process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessMemory;

impl MemorySampler for ProcessMemory {
    fn resident_megabytes(&self) -> f64 {
        resident_bytes().map_or(0.0, |bytes| bytes as f64 / BYTES_PER_MIB)
    }

    fn settle(&self) {
        #[cfg(all(target_os = "linux", target_env = "gnu"))]
        {
            // SAFETY: malloc_trim only releases free heap pages back to the OS.
            unsafe {
                libc::malloc_trim(0);
            }
        }
    }
}

#[cfg(target_os = "linux")]
fn resident_bytes() -> Option<u64> {
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    let pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
    Some(pages * page_size())
}

#[cfg(not(target_os = "linux"))]
fn resident_bytes() -> Option<u64> {
    None
}

#[cfg(target_os = "linux")]
fn page_size() -> u64 {
    // SAFETY: sysconf has no preconditions.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 { size as u64 } else { 4096 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_non_negative() {
        let sampler = ProcessMemory;
        sampler.settle();
        assert!(sampler.resident_megabytes() >= 0.0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_reports_resident_set() {
        assert!(ProcessMemory.resident_megabytes() > 0.0);
    }
}
