/// A contiguous span of file bytes assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ByteRange {
    pub offset: u64,
    pub len: u64,
}

impl ByteRange {
    #[inline]
    pub fn new(offset: u64, len: u64) -> Self {
        ByteRange { offset, len }
    }

    /// Exclusive end offset.
    #[inline]
    pub fn end(&self) -> u64 {
        self.offset + self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Number of workers to use when the caller does not say.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Divide `file_size` bytes into `workers` contiguous ranges.
///
/// Every range but the last is `file_size / workers` bytes; the last also
/// takes the `file_size % workers` remainder, so the ranges cover
/// `[0, file_size)` exactly. When `workers > file_size` the leading ranges
/// are empty. `workers` of 0 is treated as 1.
pub fn plan(file_size: u64, workers: usize) -> Vec<ByteRange> {
    let workers = workers.max(1) as u64;
    let chunk = file_size / workers;
    let rem = file_size % workers;

    (0..workers)
        .map(|i| {
            let len = if i + 1 == workers { chunk + rem } else { chunk };
            ByteRange::new(i * chunk, len)
        })
        .collect()
}
