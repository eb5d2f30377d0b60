//! Global memory allocator configuration.
//!
//! `mimalloc` is a meaningfully faster allocator than the system default for
//! the large, short-lived chunk buffers the stream codec allocates per run.

use mimalloc::MiMalloc;

/// The global allocator instance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
