use std::io::{self, Read};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::aggregate::{FinalResult, reduce};
use crate::common::io::{PositionedRead, advise_sequential, map_file, open_noatime};
use crate::plan::{ByteRange, plan};
use crate::scan::{ScanConfig, Strategy, process, process_mapped};

/// Errors that abort a scan. Malformed records are never errors.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot open '{}'", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("read failed in range starting at byte {offset}")]
    Read {
        offset: u64,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("cannot start worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

fn validate(cfg: &ScanConfig) -> Result<(), ScanError> {
    if cfg.workers == 0 {
        return Err(ScanError::InvalidConfig("worker count must be at least 1"));
    }
    if cfg.buffer_size == 0 {
        return Err(ScanError::InvalidConfig("buffer size must be at least 1 byte"));
    }
    Ok(())
}

/// Sum both columns of `path` and count its records with `workers` workers
/// and default settings otherwise.
pub fn scan_and_sum(path: impl AsRef<Path>, workers: usize) -> Result<FinalResult, ScanError> {
    scan_and_sum_with(path, &ScanConfig::default().with_workers(workers))
}

/// Sum both columns of `path` and count its records.
///
/// The file is split into `cfg.workers` byte ranges, one worker per range
/// on a dedicated pool. Partials are reduced in range order, so repeated
/// runs with the same settings give bit-identical sums. The first I/O
/// error aborts the run.
pub fn scan_and_sum_with(
    path: impl AsRef<Path>,
    cfg: &ScanConfig,
) -> Result<FinalResult, ScanError> {
    validate(cfg)?;
    let path = path.as_ref();
    let open_err = |source| ScanError::Open {
        path: path.to_path_buf(),
        source,
    };

    let file = open_noatime(path).map_err(open_err)?;
    let meta = file.metadata().map_err(open_err)?;

    // Pipes and other special files have no usable length: read them whole.
    if !meta.file_type().is_file() {
        let mut data = Vec::new();
        let mut reader = file;
        reader
            .read_to_end(&mut data)
            .map_err(|source| ScanError::Read { offset: 0, source })?;
        return scan_slice(&data, cfg);
    }

    let len = meta.len();
    if len == 0 {
        debug!(path = %path.display(), "empty input");
        return Ok(FinalResult::default());
    }

    let ranges = plan(len, cfg.workers);
    let pool = build_pool(cfg.workers)?;

    if cfg.strategy == Strategy::Mmap {
        match map_file(&file) {
            Ok(map) => {
                debug!(bytes = len, workers = cfg.workers, "scanning memory map");
                return Ok(pool.install(|| run_mapped(&map, &ranges, cfg)));
            }
            Err(e) => warn!(error = %e, "mmap failed, falling back to positioned reads"),
        }
    }

    debug!(
        bytes = len,
        workers = cfg.workers,
        buffer_size = cfg.buffer_size,
        "scanning with positioned reads"
    );
    advise_sequential(&file, len);
    pool.install(|| run_positioned(&file, &ranges, cfg))
}

/// Scan an in-memory copy of a file with the same partitioning as a file scan.
pub fn scan_slice(data: &[u8], cfg: &ScanConfig) -> Result<FinalResult, ScanError> {
    validate(cfg)?;
    if data.is_empty() {
        return Ok(FinalResult::default());
    }
    let ranges = plan(data.len() as u64, cfg.workers);
    let pool = build_pool(cfg.workers)?;
    match cfg.strategy {
        Strategy::Mmap => Ok(pool.install(|| run_mapped(data, &ranges, cfg))),
        Strategy::PositionedRead => pool.install(|| run_positioned(data, &ranges, cfg)),
    }
}

fn build_pool(workers: usize) -> Result<rayon::ThreadPool, ScanError> {
    Ok(rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("fpoints-worker-{}", i))
        .build()?)
}

fn log_worker(index: usize, range: ByteRange, count: u64) {
    debug!(
        worker = index,
        offset = range.offset,
        len = range.len,
        records = count,
        "worker finished"
    );
}

/// One job per range; `with_max_len(1)` keeps rayon from batching ranges
/// onto one thread. The indexed collect keeps partials in range order.
fn run_positioned<R: PositionedRead + ?Sized>(
    reader: &R,
    ranges: &[ByteRange],
    cfg: &ScanConfig,
) -> Result<FinalResult, ScanError> {
    let partials = ranges
        .par_iter()
        .with_max_len(1)
        .enumerate()
        .map(|(i, &range)| {
            let partial = process(reader, range, cfg.buffer_size, cfg.sign).map_err(|source| {
                ScanError::Read {
                    offset: range.offset,
                    source,
                }
            })?;
            log_worker(i, range, partial.count);
            Ok(partial)
        })
        .collect::<Result<Vec<_>, ScanError>>()?;
    Ok(reduce(partials))
}

fn run_mapped(data: &[u8], ranges: &[ByteRange], cfg: &ScanConfig) -> FinalResult {
    let partials: Vec<_> = ranges
        .par_iter()
        .with_max_len(1)
        .enumerate()
        .map(|(i, &range)| {
            let partial = process_mapped(data, range, cfg.sign);
            log_worker(i, range, partial.count);
            partial
        })
        .collect();
    reduce(partials)
}
