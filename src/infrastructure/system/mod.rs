//! Host statistics for the `.alive` status block

use sysinfo::System;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Snapshot of host memory and OS type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostStats {
    pub os_type: String,
    pub free_mb: u64,
    pub total_mb: u64,
}

impl HostStats {
    /// Collect live stats from the host
    pub fn collect() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();

        Self {
            os_type: os_type(std::env::consts::OS),
            free_mb: to_mb(sys.available_memory()),
            total_mb: to_mb(sys.total_memory()),
        }
    }
}

/// Kernel name in the form `uname -s` reports it
pub fn os_type(os: &str) -> String {
    match os {
        "linux" => "Linux".to_string(),
        "macos" => "Darwin".to_string(),
        "windows" => "Windows_NT".to_string(),
        "freebsd" => "FreeBSD".to_string(),
        other => other.to_string(),
    }
}

/// Whole megabytes, rounded down
fn to_mb(bytes: u64) -> u64 {
    bytes / BYTES_PER_MB
}
