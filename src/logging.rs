//! Logging setup with sane defaults.

use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber for binaries and scripts built
/// on the kernel.
///
/// Respects `RUST_LOG`; defaults to `info`. Calling it twice is harmless:
/// the second installation attempt is ignored.
pub fn enable_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_logging_is_idempotent() {
        enable_logging();
        enable_logging();
    }
}
