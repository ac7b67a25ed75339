/// Use mimalloc as the global allocator for all binaries.
/// Faster than glibc malloc for the per-worker buffers and the
/// generator's formatting scratch, with better thread-local caching.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod aggregate;
pub mod common;
pub mod engine;
pub mod generate;
pub mod parse;
pub mod plan;
pub mod scan;
pub mod split;
pub mod verify;

pub use aggregate::{FinalResult, PartialResult};
pub use engine::{ScanError, scan_and_sum, scan_and_sum_with, scan_slice};
pub use scan::{ScanConfig, Strategy};
