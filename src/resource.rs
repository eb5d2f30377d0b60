//! Resource probe: available memory and scrypt throughput on this host.
//!
//! Both queries are process-wide and idempotent, so each is cached behind a
//! `OnceLock` the first time it's asked for — on contended first access,
//! duplicate measurements are acceptable (SPEC_FULL.md §9).

use std::sync::OnceLock;
use std::time::Instant;

use sysinfo::System;

use crate::config::{SALT_LEN, THROUGHPUT_PROBE_LOG_N};
use crate::error::ScryptError;
use crate::kdf::derive_subkeys;

static AVAILABLE_MEMORY: OnceLock<Option<u64>> = OnceLock::new();
static TOTAL_MEMORY: OnceLock<Option<u64>> = OnceLock::new();
static SCRYPT_THROUGHPUT: OnceLock<Option<f64>> = OnceLock::new();

/// Reports total physical memory in bytes, used by the `maxmemfrac` budget.
pub fn total_memory() -> Result<u64, ScryptError> {
    (*TOTAL_MEMORY.get_or_init(|| {
        let mut system = System::new();
        system.refresh_memory();
        let total = system.total_memory();
        (total > 0).then_some(total)
    }))
    .ok_or(ScryptError::MemoryLimit)
}

/// Reports available physical memory in bytes.
///
/// Prefers the OS's own "available" accounting over raw total memory; if a
/// platform only exposes total memory, a conservative fraction of it is used
/// instead of treating the whole machine as available.
pub fn available_memory() -> Result<u64, ScryptError> {
    (*AVAILABLE_MEMORY.get_or_init(probe_available_memory)).ok_or(ScryptError::MemoryLimit)
}

fn probe_available_memory() -> Option<u64> {
    let mut system = System::new();
    system.refresh_memory();

    let available = system.available_memory();
    if available > 0 {
        return Some(available);
    }

    let total = system.total_memory();
    if total > 0 {
        // No distinct "available" counter on this platform; be conservative.
        return Some(total / 2);
    }

    None
}

/// Estimates scrypt throughput on this host, in cost-parameter "operations" per second.
///
/// Times a minimal scrypt invocation (`logN = THROUGHPUT_PROBE_LOG_N`, `r = p = 1`)
/// and extrapolates; if the measured duration is too small to be trustworthy,
/// it retries once at a larger cost.
pub fn scrypt_throughput() -> Result<f64, ScryptError> {
    (*SCRYPT_THROUGHPUT.get_or_init(measure_throughput)).ok_or(ScryptError::Clock)
}

fn measure_throughput() -> Option<f64> {
    const NOISE_FLOOR_SECS: f64 = 0.005;

    for log_n in [THROUGHPUT_PROBE_LOG_N, THROUGHPUT_PROBE_LOG_N + 2] {
        let start = Instant::now();
        let ops = 4u64 * (1u64 << log_n);
        if derive_subkeys(b"throughput-probe", &[0u8; SALT_LEN], log_n, 1, 1).is_err() {
            return None;
        }
        let elapsed = start.elapsed().as_secs_f64();
        if elapsed >= NOISE_FLOOR_SECS {
            return Some(ops as f64 / elapsed);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_memory_is_positive() {
        assert!(available_memory().unwrap() > 0);
    }

    #[test]
    fn scrypt_throughput_is_positive() {
        assert!(scrypt_throughput().unwrap() > 0.0);
    }
}
