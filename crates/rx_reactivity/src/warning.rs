//! Development diagnostics.

use crate::runtime::Runtime;

impl Runtime {
    /// Emit a non-fatal diagnostic. Nothing happens when dev warnings are off.
    pub(crate) fn warn(&mut self, message: String) {
        if !self.config.dev_warnings {
            return;
        }
        tracing::warn!(target: "rx_reactivity", "{message}");
        if self.warnings.len() < self.config.warning_buffer {
            self.warnings.push(message);
        }
    }

    /// Diagnostics emitted so far, up to `RuntimeConfig::warning_buffer`.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}
