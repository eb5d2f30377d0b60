//! Picks scrypt cost parameters from a resource budget, or validates explicit ones.
//!
//! Three independent checks fall out of the same two formulas:
//!
//! - `working_set(r, log_n) = 128 * r * 2^log_n` bytes of scratch scrypt will allocate.
//! - `op_count(r, p, log_n) = 4 * r * p * 2^log_n` scrypt's approximate unit of work.
//!
//! Encryption with no explicit parameters searches for the largest `logN`
//! fitting both limits; encryption with explicit parameters just checks them;
//! decryption always just checks them (the parameters come from the header).

use crate::config::{DEFAULT_MAXMEMFRAC, DEFAULT_P, DEFAULT_R, LOG_N_MAX, LOG_N_MIN, MEMLIMIT_FLOOR};
use crate::error::ScryptError;
use crate::resource;

/// The caller-supplied resource budget (`-M`, `-m`, `-t`).
#[derive(Clone, Copy, Debug)]
pub struct Budget {
    /// Explicit memory cap in bytes; 0 means "no explicit cap".
    pub maxmem: u64,
    /// Fraction of physical memory to consider, already normalized (see `normalize_maxmemfrac`).
    pub maxmemfrac: f64,
    /// Time cap in seconds; 0 effectively means "accept whatever throughput allows in 0s",
    /// i.e. the smallest feasible working set.
    pub maxtime: f64,
}

impl Default for Budget {
    fn default() -> Self {
        Self { maxmem: 0, maxmemfrac: DEFAULT_MAXMEMFRAC, maxtime: 0.0 }
    }
}

/// Normalizes a caller-supplied `maxmemfrac`: `0.0` means "use the default",
/// and anything above the default snaps down to it. See SPEC_FULL.md §9.
pub fn normalize_maxmemfrac(maxmemfrac: f64) -> f64 {
    if maxmemfrac <= 0.0 || maxmemfrac > DEFAULT_MAXMEMFRAC {
        DEFAULT_MAXMEMFRAC
    } else {
        maxmemfrac
    }
}

/// `memlimit = min(nonzero of: maxmem, maxmemfrac * physical_memory, available_memory)`,
/// floored at `MEMLIMIT_FLOOR`.
pub fn memlimit(budget: &Budget) -> Result<u64, ScryptError> {
    let available = resource::available_memory()?;
    let maxmemfrac = normalize_maxmemfrac(budget.maxmemfrac);

    let mut candidates = Vec::with_capacity(3);
    if budget.maxmem > 0 {
        candidates.push(budget.maxmem);
    }
    if maxmemfrac > 0.0 {
        let total = resource::total_memory()?;
        #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let frac_bytes = (total as f64 * maxmemfrac) as u64;
        candidates.push(frac_bytes);
    }
    candidates.push(available);

    let limit = candidates.into_iter().min().unwrap_or(available);
    Ok(limit.max(MEMLIMIT_FLOOR))
}

/// `opslimit = maxtime * scrypt_throughput`.
pub fn opslimit(budget: &Budget) -> Result<f64, ScryptError> {
    let throughput = resource::scrypt_throughput()?;
    Ok(budget.maxtime * throughput)
}

fn working_set(r: u32, log_n: u8) -> u128 {
    128u128 * u128::from(r) * (1u128 << log_n)
}

fn op_count(r: u32, p: u32, log_n: u8) -> u128 {
    4u128 * u128::from(r) * u128::from(p) * (1u128 << log_n)
}

/// Chooses `(logN, r, p)` for encryption when the caller supplied no explicit
/// parameters: `r = 8`, `p = 1`, and the largest feasible `logN` in `[10, 40]`.
pub fn pick_params(budget: &Budget) -> Result<(u8, u32, u32), ScryptError> {
    let memlimit = memlimit(budget)?;
    let opslimit = opslimit(budget)?;

    let mut chosen = LOG_N_MIN;
    for log_n in LOG_N_MIN..=LOG_N_MAX {
        if working_set(DEFAULT_R, log_n) <= u128::from(memlimit) && op_count(DEFAULT_R, DEFAULT_P, log_n) <= opslimit_as_u128(opslimit) {
            chosen = log_n;
        } else {
            break;
        }
    }

    Ok((chosen, DEFAULT_R, DEFAULT_P))
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn opslimit_as_u128(opslimit: f64) -> u128 {
    if opslimit <= 0.0 { 0 } else if opslimit.is_infinite() { u128::MAX } else { opslimit as u128 }
}

/// Validates an explicit `(logN, r, p)` triple for the encrypt path.
/// `force` bypasses both the memory and time checks.
pub fn validate_encrypt(budget: &Budget, log_n: u8, r: u32, p: u32, force: bool) -> Result<(), ScryptError> {
    if force {
        return Ok(());
    }

    let memlimit = memlimit(budget)?;
    let opslimit = opslimit_as_u128(opslimit(budget)?);

    if working_set(r, log_n) > u128::from(memlimit) {
        return Err(ScryptError::Param(format!("working set for logN={log_n}, r={r} exceeds memory budget")));
    }
    if op_count(r, p, log_n) > opslimit {
        return Err(ScryptError::Param(format!("operation count for logN={log_n}, r={r}, p={p} exceeds time budget")));
    }

    Ok(())
}

/// Validates the `(logN, r, p)` parsed from a header before decrypting.
/// `force` bypasses both checks. Errors distinguish "too much memory" from
/// "too slow", per SPEC_FULL.md §7.
pub fn validate_decrypt(budget: &Budget, log_n: u8, r: u32, p: u32, force: bool) -> Result<(), ScryptError> {
    if force {
        return Ok(());
    }

    let memlimit = memlimit(budget)?;
    let opslimit = opslimit_as_u128(opslimit(budget)?);

    if working_set(r, log_n) > u128::from(memlimit) {
        return Err(ScryptError::TooBig);
    }
    if op_count(r, p, log_n) > opslimit {
        return Err(ScryptError::TooSlow);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_zero_becomes_default() {
        assert_eq!(normalize_maxmemfrac(0.0), DEFAULT_MAXMEMFRAC);
    }

    #[test]
    fn normalize_above_default_snaps_down() {
        assert_eq!(normalize_maxmemfrac(0.9), DEFAULT_MAXMEMFRAC);
    }

    #[test]
    fn normalize_within_range_is_untouched() {
        assert_eq!(normalize_maxmemfrac(0.25), 0.25);
    }

    #[test]
    fn pick_params_stays_within_default_bounds() {
        let budget = Budget { maxmem: 64 * 1024 * 1024, maxmemfrac: DEFAULT_MAXMEMFRAC, maxtime: 5.0 };
        let (log_n, r, p) = pick_params(&budget).unwrap();
        assert!((LOG_N_MIN..=LOG_N_MAX).contains(&log_n));
        assert_eq!(r, DEFAULT_R);
        assert_eq!(p, DEFAULT_P);
    }

    #[test]
    fn explicit_params_over_memory_budget_fail_without_force() {
        let budget = Budget { maxmem: 1024, maxmemfrac: DEFAULT_MAXMEMFRAC, maxtime: 1000.0 };
        assert!(validate_encrypt(&budget, 30, 8, 1, false).is_err());
    }

    #[test]
    fn force_bypasses_memory_and_time_checks() {
        let budget = Budget { maxmem: 1024, maxmemfrac: DEFAULT_MAXMEMFRAC, maxtime: 0.0 };
        assert!(validate_encrypt(&budget, 30, 8, 1, true).is_ok());
    }

    #[test]
    fn decrypt_validation_distinguishes_too_big_from_too_slow() {
        let tiny_memory = Budget { maxmem: 1024, maxmemfrac: DEFAULT_MAXMEMFRAC, maxtime: 1000.0 };
        assert!(matches!(validate_decrypt(&tiny_memory, 30, 8, 1, false), Err(ScryptError::TooBig)));

        let tiny_time = Budget { maxmem: 0, maxmemfrac: DEFAULT_MAXMEMFRAC, maxtime: 0.0 };
        assert!(matches!(validate_decrypt(&tiny_time, 20, 8, 1, false), Err(ScryptError::TooSlow)));
    }
}
