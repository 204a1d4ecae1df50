//! ## timewarp-core::adapter
//! **Many readers, one store, refresh on change only**
//!
//! A [`WarpReader`] belongs to one consumer (a HUD line, a progress bar, a
//! reward ticker). Its store subscription only raises a dirty flag; the
//! consumer polls when it is ready to draw and gets a [`WarpView`] back only if
//! the store published a different state since the last poll. Change is
//! decided by `Arc` identity, never by comparing fields.
//!
//! A [`WarpView`] derives every value from the single state it wraps, so
//! reading elapsed time and rewards from one view can never mix two frames.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::format;
use crate::projector::RewardProjector;
use crate::state::{WarpSnapshot, WarpState};
use crate::store::{Subscription, WarpStore};

#[derive(Debug, Clone)]
pub struct WarpView {
    state: Arc<WarpState>,
    projector: RewardProjector,
}

impl WarpView {
    pub fn new(state: Arc<WarpState>, projector: RewardProjector) -> Self {
        Self { state, projector }
    }

    pub fn is_warping(&self) -> bool {
        self.state.is_warping
    }

    pub fn simulated_elapsed(&self) -> f64 {
        self.state.simulated_elapsed
    }

    pub fn finished(&self) -> bool {
        self.state.finished
    }

    pub fn target_seconds(&self) -> u64 {
        self.state.target_seconds()
    }

    pub fn snapshot(&self) -> Option<&WarpSnapshot> {
        self.state.snapshot.as_ref()
    }

    pub fn simulated_rewards(&self) -> f64 {
        self.state.simulated_rewards(&self.projector)
    }

    /// Completed fraction of the session, 0.0 to 1.0.
    pub fn progress(&self) -> f64 {
        format::progress(self.state.simulated_elapsed, self.target_seconds())
    }

    pub fn state(&self) -> &Arc<WarpState> {
        &self.state
    }

    /// Whether both views wrap the very same published state.
    pub fn same_state(&self, other: &WarpView) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

pub struct WarpReader {
    store: WarpStore,
    dirty: Arc<AtomicBool>,
    last: Option<Arc<WarpState>>,
    _subscription: Subscription,
}

impl WarpReader {
    pub fn new(store: WarpStore) -> Self {
        let dirty = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&dirty);
        let subscription = store.subscribe(move || flag.store(true, Ordering::Release));
        Self {
            store,
            dirty,
            last: None,
            _subscription: subscription,
        }
    }

    /// Returns a view when the store published a new state since the last
    /// call. The first call always returns one.
    pub fn poll(&mut self) -> Option<WarpView> {
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return None;
        }
        let current = self.store.get_snapshot();
        if let Some(last) = &self.last {
            if Arc::ptr_eq(last, &current) {
                return None;
            }
        }
        self.last = Some(Arc::clone(&current));
        Some(WarpView::new(current, self.store.settings().projector))
    }

    /// View of the state last returned by `poll`, or of the current state if
    /// `poll` has not yet been called.
    pub fn current(&self) -> WarpView {
        match &self.last {
            Some(state) => WarpView::new(Arc::clone(state), self.store.settings().projector),
            None => self.store.view(),
        }
    }
}
