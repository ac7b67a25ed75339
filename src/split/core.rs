use memchr::memchr;

/// Forward, single-pass iterator over newline-terminated lines in a buffer.
///
/// Each item is `(start, line)` where `start` is the index of the line's
/// first byte within the buffer and `line` excludes the `\n`. Bytes after
/// the last newline are never yielded; they are left in [`Lines::remainder`]
/// so the caller can carry them into the next read or treat them as the
/// final unterminated record.
pub struct Lines<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Lines<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Lines { data, pos: 0 }
    }

    /// Index of the first byte not yet consumed.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Unterminated tail after the last newline yielded so far.
    #[inline]
    pub fn remainder(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a [u8]);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let start = self.pos;
        let nl = memchr(b'\n', &self.data[start..])?;
        self.pos = start + nl + 1;
        Some((start, &self.data[start..start + nl]))
    }
}

/// Split a record at its first comma into the X and Y fields.
/// Returns `None` for a line without a comma (blank or malformed).
#[inline]
pub fn split_record(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let comma = memchr(b',', line)?;
    Some((&line[..comma], &line[comma + 1..]))
}
