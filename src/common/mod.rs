pub mod io;


/// Reset SIGPIPE to default behavior (SIG_DFL) so `fpoints | head` exits
/// quietly like other Unix tools. Rust sets SIGPIPE to SIG_IGN by default.
/// This must be called at the start of main().
#[inline]
pub fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

/// Format an IO error message without the "(os error N)" suffix.
/// Rust's Display impl adds " (os error 2)" after the OS message.
pub fn io_error_msg(e: &std::io::Error) -> String {
    if let Some(raw) = e.raw_os_error() {
        let os_err = std::io::Error::from_raw_os_error(raw);
        let msg = format!("{}", os_err);
        msg.replace(&format!(" (os error {})", raw), "")
    } else {
        format!("{}", e)
    }
}

/// Parse a byte size such as `65536`, `64K` or `2M` (binary multiples).
pub fn parse_size(s: &str) -> Result<usize, String> {
    let s = s.trim();
    let (digits, mult) = match s.as_bytes().last() {
        Some(b'K' | b'k') => (&s[..s.len() - 1], 1024),
        Some(b'M' | b'm') => (&s[..s.len() - 1], 1024 * 1024),
        Some(b'G' | b'g') => (&s[..s.len() - 1], 1024 * 1024 * 1024),
        _ => (s, 1),
    };
    let n = digits
        .parse::<usize>()
        .map_err(|_| format!("invalid size: '{}'", s))?;
    let size = n
        .checked_mul(mult)
        .ok_or_else(|| format!("size too large: '{}'", s))?;
    if size == 0 {
        return Err("size must be at least 1 byte".to_string());
    }
    Ok(size)
}

/// Render an error and its causes as `outer: inner: ...`. I/O causes are
/// formatted with [`io_error_msg`].
pub fn error_chain_msg(err: &anyhow::Error) -> String {
    err.chain()
        .map(|cause| match cause.downcast_ref::<std::io::Error>() {
            Some(e) => io_error_msg(e),
            None => cause.to_string(),
        })
        .collect::<Vec<_>>()
        .join(": ")
}

/// Install the stderr tracing subscriber used by the binaries.
/// `RUST_LOG` wins when set; otherwise `verbose` selects debug or warn.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
