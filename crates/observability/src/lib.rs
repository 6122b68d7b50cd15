//! Tracing/logging setup shared by the binaries.

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Initialize process-wide tracing with [`DEFAULT_FILTER`].
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(DEFAULT_FILTER);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
