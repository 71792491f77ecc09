//! Checker options and cancellation.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckerOptions {
    /// Check reference sites on the rayon pool. Diagnostics are identical
    /// either way.
    pub parallel: bool,
    /// Warn about name-valued companions that match no declared type.
    pub report_unresolved_companion_names: bool,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            report_unresolved_companion_names: false,
        }
    }
}

/// Shared flag the host sets to abandon the remaining reference sites.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
