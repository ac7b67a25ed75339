use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::aggregate::FinalResult;

/// Expected totals from a `points-verify.txt` file: `<sumX>,<sumY>,<count>\n`
/// with both sums rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Checksum {
    pub sum_x: f64,
    pub sum_y: f64,
    pub count: u64,
}

impl Checksum {
    /// Checksum for a set of totals, sums rounded to cents.
    pub fn from_totals(sum_x: f64, sum_y: f64, count: u64) -> Self {
        Checksum {
            sum_x: (sum_x * 100.0).round() / 100.0,
            sum_y: (sum_y * 100.0).round() / 100.0,
            count,
        }
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2},{:.2},{}", self.sum_x, self.sum_y, self.count)
    }
}

/// A value compared during verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    SumX,
    SumY,
    Count,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::SumX => write!(f, "first column sum"),
            Field::SumY => write!(f, "second column sum"),
            Field::Count => write!(f, "record count"),
        }
    }
}

/// Problems reading or parsing a checksum file.
#[derive(Debug, Error)]
pub enum ChecksumError {
    #[error("cannot read checksum file '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("checksum must have 3 comma-separated fields, found {0}")]
    FieldCount(usize),
    #[error("invalid {field} in checksum: '{value}'")]
    Number { field: Field, value: String },
}

/// Engine output disagreeing with the checksum.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", self.describe())]
pub struct Mismatch {
    pub field: Field,
    pub expected: f64,
    pub actual: f64,
}

impl Mismatch {
    fn describe(&self) -> String {
        let diff = self.actual - self.expected;
        match self.field {
            Field::Count => format!(
                "expected {} to be {}, got {} (off by {})",
                self.field, self.expected as u64, self.actual as u64, diff as i64
            ),
            _ => format!(
                "expected {} to be {:.2}, got {:.2} (off by {:.2})",
                self.field, self.expected, self.actual, diff
            ),
        }
    }
}

/// Parse the contents of a checksum file. Surrounding whitespace and the
/// trailing newline are ignored.
pub fn parse_checksum(text: &str) -> Result<Checksum, ChecksumError> {
    let parts: Vec<&str> = text.trim().split(',').collect();
    if parts.len() != 3 {
        return Err(ChecksumError::FieldCount(parts.len()));
    }

    let number = |field: Field, value: &str| ChecksumError::Number {
        field,
        value: value.to_string(),
    };
    let sum_x = parts[0]
        .trim()
        .parse::<f64>()
        .map_err(|_| number(Field::SumX, parts[0]))?;
    let sum_y = parts[1]
        .trim()
        .parse::<f64>()
        .map_err(|_| number(Field::SumY, parts[1]))?;
    let count = parts[2]
        .trim()
        .parse::<u64>()
        .map_err(|_| number(Field::Count, parts[2]))?;

    Ok(Checksum { sum_x, sum_y, count })
}

/// Read and parse a checksum file.
pub fn read_checksum(path: &Path) -> Result<Checksum, ChecksumError> {
    let text = std::fs::read_to_string(path).map_err(|source| ChecksumError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_checksum(&text)
}

/// Round to cents the way the checksum was written.
#[inline]
fn cents(v: f64) -> i64 {
    (v * 100.0).round() as i64
}

/// Compare engine output with a checksum: exact count, sums equal after
/// rounding to cents. Fields are checked count first, then X, then Y.
pub fn verify(result: &FinalResult, expected: &Checksum) -> Result<(), Mismatch> {
    if result.count != expected.count {
        return Err(Mismatch {
            field: Field::Count,
            expected: expected.count as f64,
            actual: result.count as f64,
        });
    }
    if cents(result.sum_x) != cents(expected.sum_x) {
        return Err(Mismatch {
            field: Field::SumX,
            expected: expected.sum_x,
            actual: result.sum_x,
        });
    }
    if cents(result.sum_y) != cents(expected.sum_y) {
        return Err(Mismatch {
            field: Field::SumY,
            expected: expected.sum_y,
            actual: result.sum_y,
        });
    }
    Ok(())
}
