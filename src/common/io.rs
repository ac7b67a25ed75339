use std::fs::File;
use std::io;
use std::path::Path;

#[cfg(target_os = "linux")]
use std::sync::atomic::{AtomicBool, Ordering};

use memmap2::{Mmap, MmapOptions};

/// Track whether O_NOATIME is supported to avoid repeated failed open() attempts.
/// After the first EPERM, we never try O_NOATIME again.
#[cfg(target_os = "linux")]
static NOATIME_SUPPORTED: AtomicBool = AtomicBool::new(true);

/// Open a file with O_NOATIME on Linux to avoid atime inode writes.
/// Caches whether O_NOATIME works to avoid double-open on every call.
#[cfg(target_os = "linux")]
pub fn open_noatime(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    if NOATIME_SUPPORTED.load(Ordering::Relaxed) {
        match std::fs::OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NOATIME)
            .open(path)
        {
            Ok(f) => return Ok(f),
            Err(ref e) if e.raw_os_error() == Some(libc::EPERM) => {
                // O_NOATIME requires file ownership or CAP_FOWNER
                NOATIME_SUPPORTED.store(false, Ordering::Relaxed);
            }
            Err(e) => return Err(e),
        }
    }
    File::open(path)
}

#[cfg(not(target_os = "linux"))]
pub fn open_noatime(path: &Path) -> io::Result<File> {
    File::open(path)
}

/// Hint the kernel that `file` will be read front to back.
/// Positioned reads from several workers still benefit: each worker's
/// range is itself sequential.
#[cfg(target_os = "linux")]
pub fn advise_sequential(file: &File, len: u64) {
    use std::os::unix::io::AsRawFd;
    unsafe {
        libc::posix_fadvise(
            file.as_raw_fd(),
            0,
            len as libc::off_t,
            libc::POSIX_FADV_SEQUENTIAL,
        );
    }
}

#[cfg(not(target_os = "linux"))]
pub fn advise_sequential(_file: &File, _len: u64) {}

/// Map a whole file read-only with HUGEPAGE + WILLNEED hints.
///
/// No MAP_POPULATE: it synchronously faults every 4KB page before the
/// HUGEPAGE hint can take effect. Callers must not map empty files.
pub fn map_file(file: &File) -> io::Result<Mmap> {
    // SAFETY: read-only mapping of a file we do not write. Truncation by
    // another process while mapped is outside what this tool supports.
    let mmap = unsafe { MmapOptions::new().map(file)? };
    #[cfg(target_os = "linux")]
    {
        // HUGEPAGE must come first, before any page faults occur.
        if mmap.len() >= 2 * 1024 * 1024 {
            let _ = mmap.advise(memmap2::Advice::HugePage);
        }
        let _ = mmap.advise(memmap2::Advice::WillNeed);
    }
    Ok(mmap)
}

/// Reads at an absolute offset without touching any shared cursor, so one
/// handle can be shared by every worker.
pub trait PositionedRead: Sync {
    /// Read up to `buf.len()` bytes starting at `offset`.
    /// Returns 0 at end of input.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize>;
}

impl PositionedRead for File {
    #[cfg(unix)]
    #[inline]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        std::os::unix::fs::FileExt::read_at(self, buf, offset)
    }

    #[cfg(windows)]
    #[inline]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        std::os::windows::fs::FileExt::seek_read(self, buf, offset)
    }
}

/// In-memory input, used for mapped files and in tests.
impl PositionedRead for [u8] {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        let start = usize::try_from(offset)
            .unwrap_or(usize::MAX)
            .min(self.len());
        let n = buf.len().min(self.len() - start);
        buf[..n].copy_from_slice(&self[start..start + n]);
        Ok(n)
    }
}

/// Read as many bytes as possible into buf at `offset`, retrying on
/// partial reads. Returns fewer than `buf.len()` bytes only at EOF.
/// Fast path: regular file reads usually return the full buffer on the first call.
#[inline]
pub fn read_full_at<R: PositionedRead + ?Sized>(
    reader: &R,
    buf: &mut [u8],
    offset: u64,
) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read_at(&mut buf[total..], offset + total as u64) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}
