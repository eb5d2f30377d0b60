//! Application configuration and container-format constants.
//!
//! This module defines the core constants used throughout the application, including:
//! - The fixed binary layout of the container header
//! - scrypt parameter ranges and clamps
//! - Application limits (chunk size, memory floor)
//! - The application name used in user-facing output
//!
//! These constants ensure consistency across the codebase and serve as the single
//! source of truth for the file format. There is no external configuration file
//! and no environment variables beyond the ones named on the `--passphrase env:NAME`
//! command line (see `passphrase.rs`) — that absence is deliberate, not an oversight.

/// The application name used in user-facing output and prompts.
pub const APP_NAME: &str = "scryptbox";

/// Magic bytes identifying a container produced by this format.
///
/// Six ASCII bytes rather than a numeric constant so the header is recognizable
/// by eye in a hex dump, matching the wire format this crate is interoperable with.
pub const MAGIC: &[u8; 6] = b"scrypt";

/// The only header version this implementation writes or reads.
pub const CURRENT_VERSION: u8 = 0;

/// Length of the random salt stored in the header, in bytes.
pub const SALT_LEN: usize = 32;

/// Size of the header checksum field (truncated SHA-256), in bytes.
///
/// 16 bytes is enough to catch accidental corruption; it is not a security
/// boundary by itself (the header HMAC is), just a very cheap "not a scrypt file" filter.
pub const HEADER_CHECKSUM_LEN: usize = 16;

/// Size of the header HMAC field, in bytes.
pub const HEADER_HMAC_LEN: usize = 32;

/// Total size of the fixed-layout header, in bytes.
///
/// `6 (magic) + 1 (version) + 1 (logN) + 4 (r) + 4 (p) + 32 (salt) + 16 (checksum) + 32 (hmac)`.
pub const HEADER_LEN: usize = 96;

/// Offset of the header checksum field within the header.
pub const HEADER_CHECKSUM_OFFSET: usize = 48;

/// Offset of the header HMAC field within the header; also the length of the
/// HMAC'd prefix (bytes `[0, 64)` are what both the checksum and the HMAC cover).
pub const HEADER_HMAC_OFFSET: usize = 64;

/// Size of the trailing whole-file authentication tag, in bytes.
pub const FINAL_TAG_LEN: usize = 32;

/// Length of the two scrypt-derived subkeys combined (`enc_key ‖ hmac_key`), in bytes.
pub const DERIVED_KEY_LEN: usize = 64;

/// Length of a single derived subkey (`enc_key` or `hmac_key`), in bytes.
pub const SUBKEY_LEN: usize = 32;

/// Lower bound of the accepted/selectable `logN` range.
///
/// Below this the working set is small enough that scrypt's memory-hardness
/// stops being meaningful against a determined attacker.
pub const LOG_N_MIN: u8 = 10;

/// Upper bound of the accepted/selectable `logN` range, matching the field's own
/// width constraints — `N = 2^40` is already far beyond any practical budget.
pub const LOG_N_MAX: u8 = 40;

/// Default scrypt block size factor `r` used when parameters are auto-selected.
pub const DEFAULT_R: u32 = 8;

/// Default scrypt parallelism factor `p` used when parameters are auto-selected.
pub const DEFAULT_P: u32 = 1;

/// Floor under the computed memory budget, in bytes.
///
/// Keeps `memlimit` well-defined even when the resource probe reports an
/// implausibly small amount of available memory.
pub const MEMLIMIT_FLOOR: u64 = 1024 * 1024;

/// Default fraction of physical memory considered when `maxmemfrac` is unset.
///
/// Also the clamp ceiling: any caller-supplied fraction greater than this snaps
/// down to it (see `tuner::normalize_maxmemfrac`).
pub const DEFAULT_MAXMEMFRAC: f64 = 0.5;

/// Size of data chunks streamed between input and output during encrypt/decrypt, in bytes.
///
/// Large enough to amortize syscall overhead, small enough to keep peak memory
/// use independent of file size.
pub const CHUNK_SIZE: usize = 256 * 1024;

/// Cost parameter used by the resource probe's throughput benchmark.
///
/// Deliberately tiny: the benchmark exists to calibrate ops/sec, not to do real work.
pub const THROUGHPUT_PROBE_LOG_N: u8 = 10;

/// Minimum required passphrase length accepted on encryption.
///
/// A very small floor — scrypt's cost parameters, not passphrase-length policy,
/// are this tool's primary defense against guessing.
pub const PASSPHRASE_MIN_LENGTH: usize = 1;
