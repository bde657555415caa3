//! System Metadata Collection
//!
//! Collects the facts a reader needs to interpret the figures: crate version,
//! UTC timestamp, OS, architecture, CPU model and core count, plus the run
//! parameters. The CPU model is read from `/proc/cpuinfo` and degrades to
//! "Unknown" on other platforms.

use crate::config::RunConfig;
use chrono::Utc;
use tokbench_report::{ReportMeta, RunParameters, SystemInfo};

/// Build report metadata for a run
pub fn build_report_meta(run: &RunConfig) -> ReportMeta {
    let system = SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu: get_cpu_model().unwrap_or_else(|| "Unknown".to_string()),
        cpu_cores: num_cpus(),
    };

    ReportMeta {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        system,
        parameters: RunParameters {
            encoding: run.encoding.clone(),
            iterations: run.params.iterations,
            warmup_iterations: run.params.warmup_iterations,
        },
    }
}

/// Get CPU model name from /proc/cpuinfo (Linux only)
fn get_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("model name"))
                    .and_then(|l| l.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Overrides, TokbenchConfig};

    #[test]
    fn test_meta_carries_run_parameters() {
        let overrides = Overrides {
            iterations: Some(20),
            ..Default::default()
        };
        let run = RunConfig::resolve(&TokbenchConfig::default(), &overrides).unwrap();
        let meta = build_report_meta(&run);

        assert_eq!(meta.parameters.iterations, 20);
        assert_eq!(meta.parameters.warmup_iterations, 10);
        assert_eq!(meta.parameters.encoding, "cl100k_base");
        assert_eq!(meta.system.os, std::env::consts::OS);
        assert!(meta.system.cpu_cores >= 1);
        assert!(!meta.version.is_empty());
    }
}
