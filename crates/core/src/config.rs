//! Session configuration - tunable constants handed in by the caller

use crate::types::{
    AutoShift, BANNER_MS, DEFAULT_ARR, DEFAULT_BAG_LOOKAHEAD, DEFAULT_DAS, LOCK_DELAY_MS,
    SOFT_DROP_INTERVAL_MS,
};

/// Everything a [`GameSession`](crate::GameSession) can be tuned with.
///
/// DAS and ARR are expected to be clamped to at least 1 by the caller;
/// [`SessionConfig::auto_shift`] clamps again so a zero can never reach the
/// repeat predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    /// Frames a horizontal control is held before auto-repeat starts.
    pub das: u32,
    /// Frames between auto-repeated shifts.
    pub arr: u32,
    /// Minimum number of queued pieces kept by the bag.
    pub bag_lookahead: usize,
    pub lock_delay_ms: f64,
    pub soft_drop_interval_ms: f64,
    pub banner_ms: f64,
    pub seed: u32,
}

impl SessionConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn auto_shift(&self) -> AutoShift {
        AutoShift::new(self.das, self.arr)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            das: DEFAULT_DAS,
            arr: DEFAULT_ARR,
            bag_lookahead: DEFAULT_BAG_LOOKAHEAD,
            lock_delay_ms: LOCK_DELAY_MS,
            soft_drop_interval_ms: SOFT_DROP_INTERVAL_MS,
            banner_ms: BANNER_MS,
            seed: 1,
        }
    }
}
