//! Runtime configuration.

/// Runtime configuration options.
#[derive(Clone, Copy, Debug)]
pub struct RuntimeConfig {
    /// Emit development diagnostics (readonly writes, invalid targets).
    pub dev_warnings: bool,
    /// Allocation count after which `maybe_collect` runs a collection.
    pub gc_threshold: usize,
    /// Diagnostics kept for `Runtime::warnings`. Later ones are only logged.
    pub warning_buffer: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            dev_warnings: true,
            gc_threshold: 100_000,
            warning_buffer: 256,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by `RX_DEV_WARNINGS`, `RX_GC_THRESHOLD` and
    /// `RX_WARNING_BUFFER`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = std::env::var("RX_DEV_WARNINGS") {
            config.dev_warnings = !(v == "0" || v.eq_ignore_ascii_case("false"));
        }
        if let Some(n) = std::env::var("RX_GC_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.gc_threshold = n;
        }
        if let Some(n) = std::env::var("RX_WARNING_BUFFER")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.warning_buffer = n;
        }
        config
    }
}
