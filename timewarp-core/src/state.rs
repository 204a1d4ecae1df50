//! Warp session state.
//!
//! A [`WarpState`] is never mutated after it has been published by the store;
//! every transition produces a fresh value behind a fresh `Arc`, which is what
//! lets readers detect changes by pointer identity.

use serde::Serialize;

use crate::period::PeriodKey;
use crate::projector::RewardProjector;

/// Parameters captured once when a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WarpSnapshot {
    pub stake_amount: f64,
    /// Real pending rewards at session start; simulated rewards add to this.
    pub snapshot_rewards: f64,
    pub target_seconds: u64,
    pub period_key: PeriodKey,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarpState {
    pub is_warping: bool,
    /// Simulated seconds, clamped to the snapshot's target.
    pub simulated_elapsed: f64,
    pub real_start_ms: f64,
    /// Clock reading of the last integrated frame.
    pub last_frame_ms: f64,
    pub snapshot: Option<WarpSnapshot>,
    pub finished: bool,
}

impl WarpState {
    pub const IDLE: WarpState = WarpState {
        is_warping: false,
        simulated_elapsed: 0.0,
        real_start_ms: 0.0,
        last_frame_ms: 0.0,
        snapshot: None,
        finished: false,
    };

    pub(crate) fn started(snapshot: WarpSnapshot, now_ms: f64) -> Self {
        Self {
            is_warping: true,
            simulated_elapsed: 0.0,
            real_start_ms: now_ms,
            last_frame_ms: now_ms,
            snapshot: Some(snapshot),
            finished: false,
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.is_warping
    }

    /// Target of the active session, `0` when idle.
    pub fn target_seconds(&self) -> u64 {
        self.snapshot.map_or(0, |s| s.target_seconds)
    }

    /// Baseline plus projected rewards for this state, `0` when idle.
    pub fn simulated_rewards(&self, projector: &RewardProjector) -> f64 {
        match &self.snapshot {
            Some(s) => {
                s.snapshot_rewards + projector.additional(s.stake_amount, self.simulated_elapsed)
            }
            None => 0.0,
        }
    }
}

impl Default for WarpState {
    fn default() -> Self {
        Self::IDLE
    }
}
