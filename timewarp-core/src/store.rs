//! ## timewarp-core::store
//! **Warp state container and frame loop**
//!
//! ```text
//!   Idle ──start──▶ Warping ──tick*──▶ Warping ──tick(target)──▶ Finished
//!    ▲                 │                                           │
//!    └──────stop───────┴────────────────stop───────────────────────┘
//! ```
//!
//! `Finished` still reports `is_warping`; it is left only through `stop`.
//!
//! Every scheduled tick carries the generation it was scheduled for. `start`
//! and `stop` bump the generation, so a tick that fires after being
//! superseded finds a mismatch and does nothing, whether or not the scheduler
//! managed to cancel it. Listeners run with no lock held and may call back
//! into the store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use opentelemetry::KeyValue;
use parking_lot::Mutex;
use tracing::{debug, trace};

use timewarp_config::{IntegrationMode, TimeWarpConfig};
use timewarp_telemetry::{EventLogger, MetricsRecorder};

use crate::adapter::{WarpReader, WarpView};
use crate::error::WarpError;
use crate::period::PeriodKey;
use crate::projector::RewardProjector;
use crate::ramp::SpeedRamp;
use crate::scheduler::{FrameScheduler, FrameToken};
use crate::state::{WarpSnapshot, WarpState};
use crate::time::Clock;

pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Tunables of a store, normally derived from [`TimeWarpConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpSettings {
    pub ramp: SpeedRamp,
    pub projector: RewardProjector,
    /// Nominal frame duration used by fixed-step integration.
    pub frame_seconds: f64,
    pub integration: IntegrationMode,
}

impl Default for WarpSettings {
    fn default() -> Self {
        Self {
            ramp: SpeedRamp::DEFAULT,
            projector: RewardProjector::default(),
            frame_seconds: 1.0 / 60.0,
            integration: IntegrationMode::FixedStep,
        }
    }
}

impl From<&TimeWarpConfig> for WarpSettings {
    fn from(config: &TimeWarpConfig) -> Self {
        Self {
            ramp: SpeedRamp::from(&config.ramp),
            projector: RewardProjector::new(config.engine.annual_rate_percent),
            frame_seconds: config.engine.frame_seconds(),
            integration: config.engine.integration,
        }
    }
}

struct Inner {
    state: Arc<WarpState>,
    pending: Option<FrameToken>,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: BTreeMap<u64, Listener>,
}

struct Shared {
    inner: Mutex<Inner>,
    listeners: Mutex<Listeners>,
    generation: AtomicU64,
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn FrameScheduler>,
    settings: WarpSettings,
    metrics: Option<Arc<MetricsRecorder>>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Some(token) = self.inner.get_mut().pending.take() {
            self.scheduler.cancel(token);
        }
    }
}

/// Cloneable handle to one warp store. Clones share state.
#[derive(Clone)]
pub struct WarpStore {
    shared: Arc<Shared>,
}

impl WarpStore {
    pub fn new(clock: Arc<dyn Clock>, scheduler: Arc<dyn FrameScheduler>) -> Self {
        Self::with_settings(clock, scheduler, WarpSettings::default(), None)
    }

    pub fn with_settings(
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn FrameScheduler>,
        settings: WarpSettings,
        metrics: Option<Arc<MetricsRecorder>>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: Arc::new(WarpState::IDLE),
                    pending: None,
                }),
                listeners: Mutex::new(Listeners::default()),
                generation: AtomicU64::new(0),
                clock,
                scheduler,
                settings,
                metrics,
            }),
        }
    }

    pub fn settings(&self) -> &WarpSettings {
        &self.shared.settings
    }

    /// Starts a session, replacing any session in progress. Unknown period
    /// keys and non-finite amounts leave the store untouched.
    pub fn start(&self, stake_amount: f64, period_key: &str, current_rewards: f64) {
        if let Err(err) = self.try_start(stake_amount, period_key, current_rewards) {
            debug!(%err, "Ignoring warp start");
        }
    }

    /// Like [`WarpStore::start`], reporting why a start was ignored.
    pub fn try_start(
        &self,
        stake_amount: f64,
        period_key: &str,
        current_rewards: f64,
    ) -> Result<(), WarpError> {
        let period: PeriodKey = period_key.parse()?;
        if !stake_amount.is_finite() {
            return Err(WarpError::InvalidAmount {
                field: "stake amount",
                value: stake_amount,
            });
        }
        if !current_rewards.is_finite() {
            return Err(WarpError::InvalidAmount {
                field: "current rewards",
                value: current_rewards,
            });
        }

        let snapshot = WarpSnapshot {
            stake_amount,
            snapshot_rewards: current_rewards,
            target_seconds: period.seconds(),
            period_key: period,
        };

        let shared = &self.shared;
        let superseded = {
            let mut inner = shared.inner.lock();
            let generation = shared.generation.fetch_add(1, Ordering::AcqRel) + 1;
            let superseded = inner.pending.take();
            inner.state = Arc::new(WarpState::started(snapshot, shared.clock.now_ms()));
            inner.pending = Some(Shared::schedule_tick(shared, generation));
            superseded
        };
        if let Some(token) = superseded {
            shared.scheduler.cancel(token);
        }

        if let Some(metrics) = &shared.metrics {
            metrics.sessions_started.inc();
        }
        EventLogger::log_event(
            "warp_started",
            vec![
                KeyValue::new("period", period.key()),
                KeyValue::new("stake_amount", stake_amount),
                KeyValue::new("snapshot_rewards", current_rewards),
            ],
        );

        shared.notify();
        Ok(())
    }

    /// Cancels the frame loop and returns to idle. Stopping an idle store
    /// changes nothing and notifies no one.
    pub fn stop(&self) {
        let shared = &self.shared;
        let cancelled = {
            let mut inner = shared.inner.lock();
            if inner.state.is_idle() && inner.pending.is_none() {
                return;
            }
            shared.generation.fetch_add(1, Ordering::AcqRel);
            inner.state = Arc::new(WarpState::IDLE);
            inner.pending.take()
        };
        if let Some(token) = cancelled {
            shared.scheduler.cancel(token);
        }

        if let Some(metrics) = &shared.metrics {
            metrics.sessions_stopped.inc();
        }
        EventLogger::log_event("warp_stopped", Vec::new());

        shared.notify();
    }

    /// Current state. The returned `Arc` is replaced, never mutated, on change.
    pub fn get_snapshot(&self) -> Arc<WarpState> {
        Arc::clone(&self.shared.inner.lock().state)
    }

    /// Baseline plus projected rewards, `0` when idle.
    pub fn get_simulated_rewards(&self) -> f64 {
        self.view().simulated_rewards()
    }

    /// Derived view over the current state.
    pub fn view(&self) -> WarpView {
        WarpView::new(self.get_snapshot(), self.shared.settings.projector)
    }

    /// Change-detecting reader for one consumer.
    pub fn reader(&self) -> WarpReader {
        WarpReader::new(self.clone())
    }

    /// Registers `listener` to run after every state change. The registration
    /// lives as long as the returned [`Subscription`].
    #[must_use = "dropping the subscription unsubscribes the listener"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut listeners = self.shared.listeners.lock();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.insert(id, Arc::new(listener));
        Subscription {
            shared: Arc::downgrade(&self.shared),
            id: Some(id),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.shared.listeners.lock().entries.len()
    }

    /// Whether a frame is currently scheduled.
    pub fn has_pending_frame(&self) -> bool {
        self.shared.inner.lock().pending.is_some()
    }
}

impl Shared {
    /// Must be called with `inner` locked so the token is recorded before the tick can run.
    fn schedule_tick(this: &Arc<Shared>, generation: u64) -> FrameToken {
        let weak = Arc::downgrade(this);
        this.scheduler.schedule_next(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                Shared::tick(&shared, generation);
            }
        }))
    }

    fn tick(this: &Arc<Shared>, generation: u64) {
        let (multiplier, elapsed, finished) = {
            let mut inner = this.inner.lock();
            if this.generation.load(Ordering::Acquire) != generation {
                trace!(generation, "Discarding superseded frame");
                return;
            }
            inner.pending = None;

            let current = Arc::clone(&inner.state);
            let Some(snapshot) = current.snapshot.as_ref() else {
                return;
            };
            if current.finished {
                return;
            }

            let now = this.clock.now_ms();
            let multiplier = this.settings.ramp.multiplier(now - current.real_start_ms);
            let step_seconds = match this.settings.integration {
                IntegrationMode::FixedStep => this.settings.frame_seconds,
                IntegrationMode::MeasuredDelta => {
                    ((now - current.last_frame_ms) / 1_000.0).max(0.0)
                }
            };

            let target = snapshot.target_seconds as f64;
            let mut elapsed = current.simulated_elapsed + step_seconds * multiplier;
            let finished = elapsed >= target;
            if finished {
                elapsed = target;
            }

            inner.state = Arc::new(WarpState {
                simulated_elapsed: elapsed,
                last_frame_ms: now,
                finished,
                ..(*current).clone()
            });
            if !finished {
                inner.pending = Some(Shared::schedule_tick(this, generation));
            }
            (multiplier, elapsed, finished)
        };

        debug!(multiplier, simulated_elapsed = elapsed, finished, "Warp frame");
        if let Some(metrics) = &this.metrics {
            metrics.record_frame(multiplier);
            if finished {
                metrics.sessions_finished.inc();
            }
        }
        if finished {
            EventLogger::log_event(
                "warp_finished",
                vec![KeyValue::new("simulated_elapsed", elapsed)],
            );
        }

        this.notify();
    }

    fn notify(&self) {
        let listeners: Vec<Listener> = self.listeners.lock().entries.values().cloned().collect();
        for listener in listeners {
            listener();
        }
    }
}

/// Listener registration returned by [`WarpStore::subscribe`].
pub struct Subscription {
    shared: Weak<Shared>,
    id: Option<u64>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let (Some(id), Some(shared)) = (self.id.take(), self.shared.upgrade()) {
            shared.listeners.lock().entries.remove(&id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}
