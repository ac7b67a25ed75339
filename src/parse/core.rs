/// How a leading sign byte is treated by the field parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignMode {
    /// A leading `-` negates the value; a leading `+` is accepted.
    #[default]
    Signed,
    /// The sign byte is dropped like any other non-digit byte, so `-3.00`
    /// parses as `3.00`. Matches the legacy points parser bit for bit.
    Unsigned,
}

/// Parse a decimal field (`[spaces][-+]digits[.digits]`) into an f64.
/// Leading ASCII spaces are skipped before the sign is looked at.
///
/// Digit accumulation, not a general float parser: integer digits are folded
/// with `result * 10 + digit`, fractional digits are added as
/// `digit * place` with `place` divided by ten for each one. Bytes that are
/// neither digits nor `.` are skipped, so malformed input degrades to a
/// partial value (an empty field yields 0.0) instead of an error.
#[inline]
pub fn parse_field(bytes: &[u8]) -> f64 {
    let start = bytes
        .iter()
        .position(|&b| b != b' ')
        .unwrap_or(bytes.len());
    let bytes = &bytes[start..];
    match bytes.first() {
        Some(b'-') => -parse_field_unsigned(&bytes[1..]),
        Some(b'+') => parse_field_unsigned(&bytes[1..]),
        _ => parse_field_unsigned(bytes),
    }
}

/// Parse a decimal field ignoring any sign byte.
#[inline]
pub fn parse_field_unsigned(bytes: &[u8]) -> f64 {
    let mut result = 0.0f64;
    let mut place = 1.0f64;
    let mut fraction = false;

    for &b in bytes {
        if b == b'.' {
            fraction = true;
            continue;
        }
        let digit = b.wrapping_sub(b'0');
        if digit > 9 {
            continue;
        }
        if fraction {
            place /= 10.0;
            result += digit as f64 * place;
        } else {
            result = result * 10.0 + digit as f64;
        }
    }
    result
}

/// Parse a field according to `mode`.
#[inline(always)]
pub fn parse_with(bytes: &[u8], mode: SignMode) -> f64 {
    match mode {
        SignMode::Signed => parse_field(bytes),
        SignMode::Unsigned => parse_field_unsigned(bytes),
    }
}
