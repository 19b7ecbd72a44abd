#![forbid(unsafe_code)]

//! Cache configuration.

/// Configuration for a [`BindContext`](crate::context::BindContext).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindConfig {
    /// Sweep reclaimable entries automatically as the caches grow.
    /// When disabled, entries are only removed by explicit `sweep`,
    /// `forget_*` or `clear` calls.
    /// Default: true.
    pub auto_sweep: bool,

    /// Number of cached callbacks a binder may hold before its first
    /// automatic sweep. After each sweep the threshold is re-armed at
    /// `max(sweep_floor, 2 * live_entries)`, which keeps sweeping amortised
    /// O(1) per bind.
    /// Default: 64.
    pub sweep_floor: usize,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            auto_sweep: true,
            sweep_floor: 64,
        }
    }
}

impl BindConfig {
    /// Configuration that never sweeps on its own.
    #[must_use]
    pub fn manual() -> Self {
        Self {
            auto_sweep: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_sweep_floor(mut self, floor: usize) -> Self {
        self.sweep_floor = floor.max(1);
        self
    }
}
