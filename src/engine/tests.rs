use super::*;
use crate::aggregate::FinalResult;
use crate::generate::{GenConfig, write_files};
use crate::parse::SignMode;
use crate::scan::{ScanConfig, Strategy};
use crate::verify::verify;
use std::path::PathBuf;

fn write_temp(dir: &tempfile::TempDir, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, data).unwrap();
    path
}

fn all_configs(workers: usize) -> Vec<ScanConfig> {
    let base = ScanConfig::default().with_workers(workers).with_buffer_size(16);
    vec![
        base.clone(),
        base.clone().with_strategy(Strategy::Mmap),
        base.with_buffer_size(64 * 1024),
    ]
}

#[test]
fn test_scan_example_signed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "points.txt", b"1.50,2.50\n-3.00,4.00\n");
    let r = scan_and_sum(&path, 2).unwrap();
    assert_eq!((r.sum_x, r.sum_y, r.count), (-1.5, 6.5, 2));
}

#[test]
fn test_scan_example_unsigned() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "points.txt", b"1.50,2.50\n-3.00,4.00\n");
    let cfg = ScanConfig::default().with_workers(2).with_sign(SignMode::Unsigned);
    let r = scan_and_sum_with(&path, &cfg).unwrap();
    assert_eq!((r.sum_x, r.sum_y, r.count), (4.5, 6.5, 2));
}

#[test]
fn test_scan_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "empty.txt", b"");
    for cfg in all_configs(4) {
        assert_eq!(scan_and_sum_with(&path, &cfg).unwrap(), FinalResult::default());
    }
}

#[test]
fn test_scan_malformed_line_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "points.txt", b"1.00,2.00\n42\n3.00,4.00\n");
    for workers in [1, 2, 3, 8] {
        for cfg in all_configs(workers) {
            let r = scan_and_sum_with(&path, &cfg).unwrap();
            assert_eq!((r.sum_x, r.sum_y, r.count), (4.0, 6.0, 2), "{:?}", cfg);
        }
    }
}

#[test]
fn test_scan_more_workers_than_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "points.txt", b"1,2\n");
    for cfg in all_configs(16) {
        let r = scan_and_sum_with(&path, &cfg).unwrap();
        assert_eq!((r.sum_x, r.sum_y, r.count), (1.0, 2.0, 1));
    }
}

#[test]
fn test_scan_missing_file_is_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = scan_and_sum(dir.path().join("missing.txt"), 2).unwrap_err();
    assert!(matches!(err, ScanError::Open { .. }));
    assert!(err.to_string().contains("missing.txt"));
}

#[test]
fn test_scan_rejects_zero_workers() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "points.txt", b"1,2\n");
    let err = scan_and_sum(&path, 0).unwrap_err();
    assert!(matches!(err, ScanError::InvalidConfig(_)));
}

#[test]
fn test_scan_rejects_zero_buffer() {
    let cfg = ScanConfig::default().with_buffer_size(0);
    let err = scan_slice(b"1,2\n", &cfg).unwrap_err();
    assert!(matches!(err, ScanError::InvalidConfig(_)));
}

#[test]
fn test_scan_generated_file_verifies() {
    let dir = tempfile::tempdir().unwrap();
    let points = dir.path().join("points.txt");
    let verify_path = dir.path().join("points-verify.txt");
    let checksum = write_files(
        &points,
        &verify_path,
        &GenConfig {
            lines: 20_000,
            seed: Some(11),
        },
    )
    .unwrap();

    for workers in [1, 2, 4, 16] {
        for cfg in all_configs(workers) {
            let r = scan_and_sum_with(&points, &cfg).unwrap();
            assert!(verify(&r, &checksum).is_ok(), "{:?}: {}", cfg, r);
        }
    }
}

#[test]
fn test_scan_is_bit_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let points = dir.path().join("points.txt");
    let verify_path = dir.path().join("points-verify.txt");
    write_files(
        &points,
        &verify_path,
        &GenConfig {
            lines: 5_000,
            seed: Some(5),
        },
    )
    .unwrap();

    let cfg = ScanConfig::default().with_workers(8).with_buffer_size(512);
    let first = scan_and_sum_with(&points, &cfg).unwrap();
    for _ in 0..5 {
        let again = scan_and_sum_with(&points, &cfg).unwrap();
        assert_eq!(again.sum_x.to_bits(), first.sum_x.to_bits());
        assert_eq!(again.sum_y.to_bits(), first.sum_y.to_bits());
        assert_eq!(again.count, first.count);
    }

    let mapped = scan_and_sum_with(&points, &cfg.clone().with_strategy(Strategy::Mmap)).unwrap();
    assert_eq!(mapped.sum_x.to_bits(), first.sum_x.to_bits());
    assert_eq!(mapped.sum_y.to_bits(), first.sum_y.to_bits());
}

#[test]
fn test_scan_slice_matches_file_scan() {
    let data = b"0.10,0.20\n0.30,-0.40\n5,6";
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "points.txt", data);
    let cfg = ScanConfig::default().with_workers(3).with_buffer_size(4);
    let from_file = scan_and_sum_with(&path, &cfg).unwrap();
    let from_slice = scan_slice(data, &cfg).unwrap();
    assert_eq!(from_file, from_slice);
    assert_eq!(from_file.count, 3);
}

#[cfg(unix)]
#[test]
fn test_scan_fifo_matches_regular_file() {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let data: &[u8] = b"1.50,2.50\n-3.00,4.00\n5,6";
    let dir = tempfile::tempdir().unwrap();
    let regular = write_temp(&dir, "points.txt", data);
    let fifo = dir.path().join("points.fifo");
    let c_path = CString::new(fifo.as_os_str().as_bytes()).unwrap();
    assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) }, 0);

    let cfg = ScanConfig::default().with_workers(3).with_buffer_size(4);
    // Opening a FIFO blocks until both ends are open, so feed it from a thread
    let writer = {
        let fifo = fifo.clone();
        std::thread::spawn(move || std::fs::write(&fifo, data))
    };
    let from_fifo = scan_and_sum_with(&fifo, &cfg).unwrap();
    writer.join().unwrap().unwrap();

    let from_file = scan_and_sum_with(&regular, &cfg).unwrap();
    assert_eq!(from_fifo, from_file);
    assert_eq!((from_fifo.sum_x, from_fifo.sum_y, from_fifo.count), (3.5, 12.5, 3));
}
