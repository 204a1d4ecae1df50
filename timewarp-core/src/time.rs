//! ## timewarp-core::time
//! **Clocks feeding the speed ramp**
//!
//! The store only ever asks "what time is it in milliseconds"; live sessions
//! answer from tokio's monotonic [`Instant`], replays from a [`VirtualClock`]
//! that moves only when told to.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::time::Instant;

/// Source of the current instant, in milliseconds from an arbitrary origin.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> f64;
}

/// Monotonic clock anchored at construction. Follows tokio's clock, so it
/// pauses and auto-advances with `tokio::time::pause`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1_000.0
    }
}

/// Replay clock: the ramp's real time only moves when a driver advances it.
///
/// Clones share the same counter, so the store and the replay loop see one
/// timeline. Time saturates at `u64::MAX` ns rather than wrapping.
#[derive(Clone, Debug, Default)]
pub struct VirtualClock {
    offset: Arc<AtomicU64>,
}

impl VirtualClock {
    pub fn new(start_ns: u64) -> Self {
        Self {
            offset: Arc::new(AtomicU64::new(start_ns)),
        }
    }

    #[inline]
    pub fn now_ns(&self) -> u64 {
        self.offset.load(Ordering::Acquire)
    }

    #[inline]
    pub fn advance(&self, ns: u64) {
        // The closure always returns Some, so the update cannot fail.
        let _ = self
            .offset
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |now| {
                Some(now.saturating_add(ns))
            });
    }

    /// Moves time forward by one frame of `ms` milliseconds. Non-positive and
    /// NaN intervals leave the clock untouched.
    pub fn advance_ms(&self, ms: f64) {
        if ms > 0.0 {
            self.advance((ms * 1_000_000.0).round() as u64);
        }
    }
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> f64 {
        self.now_ns() as f64 / 1_000_000.0
    }
}
