//! Ownership of records that straddle a partition boundary.
//!
//! A record belongs to the worker whose range holds its first byte. A
//! record starts at `p` when `p == 0` or byte `p - 1` is a newline, so a
//! worker whose range is `[offset, end)` owns exactly the records whose
//! preceding newline lies in `[offset - 1, end - 1)`. It skips everything
//! up to and including the first such newline, and it finishes its last
//! record by reading past `end` up to the next newline (or EOF). The next
//! worker skips those same bytes, so each record is parsed exactly once.

use std::io;
use std::ops::Range;

use memchr::memchr;

use crate::common::io::{PositionedRead, read_full_at};
use crate::plan::ByteRange;

/// File offset of the first record owned by `range`, or `None` when no
/// record starts inside it. Never reads past `range.end() - 1`.
///
/// `buf` is scratch space; its length bounds each read.
pub fn first_owned_offset<R: PositionedRead + ?Sized>(
    reader: &R,
    range: ByteRange,
    buf: &mut [u8],
) -> io::Result<Option<u64>> {
    if range.is_empty() || buf.is_empty() {
        return Ok(None);
    }
    if range.offset == 0 {
        return Ok(Some(0));
    }

    let mut pos = range.offset - 1;
    let limit = range.end() - 1;
    while pos < limit {
        let want = buf.len().min((limit - pos) as usize);
        let n = read_full_at(reader, &mut buf[..want], pos)?;
        if n == 0 {
            return Ok(None);
        }
        if let Some(i) = memchr(b'\n', &buf[..n]) {
            return Ok(Some(pos + i as u64 + 1));
        }
        pos += n as u64;
    }
    Ok(None)
}

/// Byte span of `data` holding exactly the records owned by `range`.
/// `data` is the whole file. The span may end past `range.end()` to
/// finish the last record; it is empty when `range` owns nothing.
pub fn owned_span(data: &[u8], range: ByteRange) -> Range<usize> {
    let len = data.len();
    let start = (range.offset as usize).min(len);
    let end = (range.end() as usize).min(len);
    if start >= end {
        return end..end;
    }

    let begin = if start == 0 {
        0
    } else {
        match memchr(b'\n', &data[start - 1..end - 1]) {
            Some(i) => start + i,
            None => return end..end,
        }
    };

    let stop = match memchr(b'\n', &data[end - 1..]) {
        Some(i) => end + i,
        None => len,
    };
    begin..stop
}
