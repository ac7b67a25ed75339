use std::fmt;

/// Worker-local sums and record count for one partition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PartialResult {
    pub sum_x: f64,
    pub sum_y: f64,
    pub count: u64,
}

impl PartialResult {
    /// Fold one parsed record into the accumulators.
    #[inline(always)]
    pub fn add(&mut self, x: f64, y: f64) {
        self.sum_x += x;
        self.sum_y += y;
        self.count += 1;
    }
}

/// Column sums and record count for a whole file.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FinalResult {
    pub sum_x: f64,
    pub sum_y: f64,
    pub count: u64,
}

/// Same layout as the checksum file: `<sumX>,<sumY>,<count>`, sums to cents.
impl fmt::Display for FinalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2},{:.2},{}", self.sum_x, self.sum_y, self.count)
    }
}

/// Reduce partial results in iteration order.
///
/// Floating-point addition is not associative, so callers pass partials in
/// worker-index order to get the same bits on every run.
pub fn reduce<I>(partials: I) -> FinalResult
where
    I: IntoIterator<Item = PartialResult>,
{
    partials
        .into_iter()
        .fold(FinalResult::default(), |mut acc, p| {
            acc.sum_x += p.sum_x;
            acc.sum_y += p.sum_y;
            acc.count += p.count;
            acc
        })
}
