use super::*;
use crate::aggregate::FinalResult;

fn result(sum_x: f64, sum_y: f64, count: u64) -> FinalResult {
    FinalResult { sum_x, sum_y, count }
}

// ── parse_checksum ──────────────────────────────────────────────────

#[test]
fn test_parse_checksum() {
    let c = parse_checksum("-1.50,6.50,2\n").unwrap();
    assert_eq!(c, Checksum { sum_x: -1.5, sum_y: 6.5, count: 2 });
}

#[test]
fn test_parse_checksum_no_newline() {
    let c = parse_checksum("12345.67,-0.01,100000000").unwrap();
    assert_eq!(c.count, 100_000_000);
    assert_eq!(c.sum_y, -0.01);
}

#[test]
fn test_parse_checksum_wrong_field_count() {
    assert!(matches!(parse_checksum("1.00,2.00\n"), Err(ChecksumError::FieldCount(2))));
    assert!(matches!(parse_checksum(""), Err(ChecksumError::FieldCount(1))));
}

#[test]
fn test_parse_checksum_bad_number() {
    match parse_checksum("1.00,abc,3\n") {
        Err(ChecksumError::Number { field, value }) => {
            assert_eq!(field, Field::SumY);
            assert_eq!(value, "abc");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_parse_checksum_fractional_count_rejected() {
    assert!(matches!(
        parse_checksum("1,2,3.5"),
        Err(ChecksumError::Number { field: Field::Count, .. })
    ));
}

#[test]
fn test_read_checksum_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("points-verify.txt");
    std::fs::write(&path, "4.50,6.50,2\n").unwrap();
    let c = read_checksum(&path).unwrap();
    assert_eq!(c, Checksum { sum_x: 4.5, sum_y: 6.5, count: 2 });
}

#[test]
fn test_read_checksum_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_checksum(&dir.path().join("nope.txt")).unwrap_err();
    assert!(matches!(err, ChecksumError::Io { .. }));
    assert!(err.to_string().contains("nope.txt"));
}

// ── verify ──────────────────────────────────────────────────────────

#[test]
fn test_verify_exact_match() {
    let c = Checksum { sum_x: -1.5, sum_y: 6.5, count: 2 };
    assert!(verify(&result(-1.5, 6.5, 2), &c).is_ok());
}

#[test]
fn test_verify_within_rounding() {
    let c = Checksum { sum_x: 10.0, sum_y: 20.01, count: 5 };
    assert!(verify(&result(10.004, 20.0149, 5), &c).is_ok());
}

#[test]
fn test_verify_count_checked_first() {
    let c = Checksum { sum_x: 1.0, sum_y: 1.0, count: 3 };
    let err = verify(&result(9.0, 9.0, 4), &c).unwrap_err();
    assert_eq!(err.field, Field::Count);
    assert_eq!(
        err.to_string(),
        "expected record count to be 3, got 4 (off by 1)"
    );
}

#[test]
fn test_verify_sum_x_mismatch() {
    let c = Checksum { sum_x: 4.5, sum_y: 6.5, count: 2 };
    let err = verify(&result(-1.5, 6.5, 2), &c).unwrap_err();
    assert_eq!(err.field, Field::SumX);
    assert_eq!(
        err.to_string(),
        "expected first column sum to be 4.50, got -1.50 (off by -6.00)"
    );
}

#[test]
fn test_verify_sum_y_mismatch() {
    let c = Checksum { sum_x: 1.0, sum_y: 2.0, count: 1 };
    let err = verify(&result(1.0, 2.02, 1), &c).unwrap_err();
    assert_eq!(err.field, Field::SumY);
    assert_eq!(err.expected, 2.0);
    assert_eq!(err.actual, 2.02);
}

#[test]
fn test_mismatch_is_std_error() {
    let c = Checksum { sum_x: 1.0, sum_y: 2.0, count: 1 };
    let err: Box<dyn std::error::Error> = Box::new(verify(&result(1.0, 2.5, 1), &c).unwrap_err());
    assert!(err.source().is_none());
    assert_eq!(
        err.to_string(),
        "expected second column sum to be 2.00, got 2.50 (off by 0.50)"
    );
}

// ── Checksum ────────────────────────────────────────────────────────

#[test]
fn test_checksum_from_totals_rounds_to_cents() {
    let c = Checksum::from_totals(1.23456, -7.891, 9);
    assert_eq!(c.to_string(), "1.23,-7.89,9");
}

#[test]
fn test_checksum_display_parses_back() {
    let c = Checksum { sum_x: -2.25, sum_y: 100.5, count: 7 };
    assert_eq!(parse_checksum(&c.to_string()).unwrap(), c);
}
