use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::verify::Checksum;

/// Lower bound of generated values.
pub const MIN_VALUE: f64 = -99.99;
/// Upper bound of generated values.
pub const MAX_VALUE: f64 = 99.99;

/// Default number of generated lines (~1.2GB of text).
pub const DEFAULT_LINES: u64 = 100_000_000;

#[derive(Debug, Clone)]
pub struct GenConfig {
    pub lines: u64,
    /// Fixed seed for reproducible output; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GenConfig {
    fn default() -> Self {
        GenConfig {
            lines: DEFAULT_LINES,
            seed: None,
        }
    }
}

/// Format `v` with two decimals into `text` and return the value the text
/// reads back as, so the sums match what a reader of the file will see.
#[inline]
fn two_decimals(text: &mut String, v: f64) -> f64 {
    text.clear();
    let _ = write!(text, "{:.2}", v);
    text.parse().unwrap_or(v)
}

/// Write `cfg.lines` records to `out` and return their checksum.
///
/// X is uniform in `[MIN_VALUE, MAX_VALUE)`, Y is uniform in
/// `[X, MAX_VALUE)`. Both are rounded to two decimals before summing.
pub fn generate<W: Write>(out: &mut W, cfg: &GenConfig) -> io::Result<Checksum> {
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut sum_x = 0.0f64;
    let mut sum_y = 0.0f64;
    let mut x_text = String::with_capacity(16);
    let mut y_text = String::with_capacity(16);

    for _ in 0..cfg.lines {
        let x = MIN_VALUE + rng.random::<f64>() * (MAX_VALUE - MIN_VALUE);
        let y = x + rng.random::<f64>() * (MAX_VALUE - x);
        sum_x += two_decimals(&mut x_text, x);
        sum_y += two_decimals(&mut y_text, y);

        out.write_all(x_text.as_bytes())?;
        out.write_all(b",")?;
        out.write_all(y_text.as_bytes())?;
        out.write_all(b"\n")?;
    }

    Ok(Checksum::from_totals(sum_x, sum_y, cfg.lines))
}

/// Generate the points file and its checksum file.
pub fn write_files(points: &Path, verify: &Path, cfg: &GenConfig) -> io::Result<Checksum> {
    let mut out = BufWriter::with_capacity(1024 * 1024, File::create(points)?);
    let checksum = generate(&mut out, cfg)?;
    out.flush()?;

    let mut vf = File::create(verify)?;
    writeln!(vf, "{}", checksum)?;
    Ok(checksum)
}
