use std::io;

use crate::aggregate::PartialResult;
use crate::common::io::{PositionedRead, read_full_at};
use crate::parse::{SignMode, parse_with};
use crate::plan::{ByteRange, default_workers};
use crate::split::{Lines, split_record};

use super::stitch::{first_owned_offset, owned_span};

/// Default per-worker read buffer (64KB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Bytes read per step once a worker is past its range end and only
/// needs the rest of its last record.
const TAIL_PROBE: usize = 256;

/// How a worker gets at the bytes of its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Bounded positioned reads (`pread`) of `buffer_size` bytes.
    #[default]
    PositionedRead,
    /// Scan a slice of a read-only memory map of the whole file.
    Mmap,
}

/// Parameters for one scan. One implementation serves every combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub workers: usize,
    pub buffer_size: usize,
    pub strategy: Strategy,
    pub sign: SignMode,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            workers: default_workers(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            strategy: Strategy::default(),
            sign: SignMode::default(),
        }
    }
}

impl ScanConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_sign(mut self, sign: SignMode) -> Self {
        self.sign = sign;
        self
    }
}

/// Parse one line and fold it in. Lines without a comma are skipped.
#[inline(always)]
fn accumulate(acc: &mut PartialResult, line: &[u8], sign: SignMode) {
    if let Some((x, y)) = split_record(line) {
        acc.add(parse_with(x, sign), parse_with(y, sign));
    }
}

/// Sum every record in `data`, including a final unterminated one.
pub fn sum_records(data: &[u8], sign: SignMode) -> PartialResult {
    let mut acc = PartialResult::default();
    let mut lines = Lines::new(data);
    for (_, line) in lines.by_ref() {
        accumulate(&mut acc, line, sign);
    }
    accumulate(&mut acc, lines.remainder(), sign);
    acc
}

/// Scan the records owned by `range` out of an in-memory copy of the file.
pub fn process_mapped(data: &[u8], range: ByteRange, sign: SignMode) -> PartialResult {
    sum_records(&data[owned_span(data, range)], sign)
}

/// Scan the records owned by `range` with bounded positioned reads.
///
/// The read buffer holds `buffer_size` bytes. An unterminated tail at the
/// end of one read is moved to the front of the buffer and completed by
/// the next read; a record longer than the buffer grows it. Reads stop at
/// `range.end()` until the worker only needs the rest of its last record,
/// which it finishes in small steps. Input ending before `range.end()` is
/// reported as `UnexpectedEof`.
pub fn process<R: PositionedRead + ?Sized>(
    reader: &R,
    range: ByteRange,
    buffer_size: usize,
    sign: SignMode,
) -> io::Result<PartialResult> {
    let mut acc = PartialResult::default();
    let mut buf = vec![0u8; buffer_size.max(1)];

    let Some(begin) = first_owned_offset(reader, range, &mut buf)? else {
        return Ok(acc);
    };
    let end = range.end();

    let mut pos = begin;
    let mut carry = 0usize;
    loop {
        if carry == buf.len() {
            let grown = buf.len() * 2;
            buf.resize(grown, 0);
        }
        let space = buf.len() - carry;
        let want = if pos < end {
            space.min((end - pos).min(usize::MAX as u64) as usize)
        } else {
            space.min(TAIL_PROBE)
        };

        let n = read_full_at(reader, &mut buf[carry..carry + want], pos)?;
        if n == 0 && pos < end {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("input ended at byte {} before range end {}", pos, end),
            ));
        }

        let filled = carry + n;
        let base = pos - carry as u64;
        pos += n as u64;

        let data = &buf[..filled];
        let mut lines = Lines::new(data);
        for (start, line) in lines.by_ref() {
            if base + start as u64 >= end {
                return Ok(acc);
            }
            accumulate(&mut acc, line, sign);
        }

        let tail = lines.position();
        if base + tail as u64 >= end {
            return Ok(acc);
        }
        if n == 0 {
            accumulate(&mut acc, lines.remainder(), sign);
            return Ok(acc);
        }

        buf.copy_within(tail..filled, 0);
        carry = filled - tail;
    }
}
