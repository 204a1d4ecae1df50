//! ## timewarp-core::scheduler
//! **Per-frame callback scheduling**
//!
//! The store asks for "call me on the next frame" and keeps the returned
//! token so it can cancel. Implementations must never run the callback from
//! inside `schedule_next` itself; the store schedules while holding its state
//! lock.
//!
//! - [`ManualScheduler`]: frames fire only when the caller says so. Used by
//!   tests and deterministic replays.
//! - [`TokioFrameScheduler`]: one sleeping task per frame on a tokio runtime.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub type FrameCallback = Box<dyn FnOnce() + Send + 'static>;

/// Handle identifying one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

pub trait FrameScheduler: Send + Sync {
    /// Queues `callback` for the next frame.
    fn schedule_next(&self, callback: FrameCallback) -> FrameToken;

    /// Best-effort cancellation; a callback that already started is not interrupted.
    fn cancel(&self, token: FrameToken);
}

/// Scheduler whose frames are fired explicitly with [`ManualScheduler::run_frame`].
#[derive(Default)]
pub struct ManualScheduler {
    queue: Mutex<VecDeque<(FrameToken, FrameCallback)>>,
    next_id: AtomicU64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Fires every callback queued before this call. Callbacks scheduled while
    /// the frame runs wait for the next frame. Returns how many fired.
    pub fn run_frame(&self) -> usize {
        let due = std::mem::take(&mut *self.queue.lock());
        let fired = due.len();
        for (_, callback) in due {
            callback();
        }
        fired
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next(&self, callback: FrameCallback) -> FrameToken {
        let token = FrameToken(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.queue.lock().push_back((token, callback));
        token
    }

    fn cancel(&self, token: FrameToken) {
        self.queue.lock().retain(|(t, _)| *t != token);
    }
}

/// Scheduler firing each callback after one frame interval on a tokio runtime.
pub struct TokioFrameScheduler {
    handle: Handle,
    interval: Duration,
    tasks: Arc<Mutex<HashMap<FrameToken, JoinHandle<()>>>>,
    next_id: AtomicU64,
}

impl TokioFrameScheduler {
    /// Binds to the current runtime.
    ///
    /// # Panics
    /// When called outside a tokio runtime.
    pub fn new(frame_hz: u32) -> Self {
        Self::with_handle(Handle::current(), frame_hz)
    }

    pub fn with_handle(handle: Handle, frame_hz: u32) -> Self {
        Self {
            handle,
            interval: Duration::from_secs_f64(1.0 / f64::from(frame_hz.max(1))),
            tasks: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Number of frames scheduled and not yet fired or cancelled.
    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }
}

impl FrameScheduler for TokioFrameScheduler {
    fn schedule_next(&self, callback: FrameCallback) -> FrameToken {
        let token = FrameToken(self.next_id.fetch_add(1, Ordering::Relaxed));
        let interval = self.interval;
        let tasks = Arc::clone(&self.tasks);

        // Hold the map while spawning so the task cannot deregister before it is registered.
        let mut guard = self.tasks.lock();
        let task = self.handle.spawn(async move {
            tokio::time::sleep(interval).await;
            if tasks.lock().remove(&token).is_some() {
                callback();
            }
        });
        guard.insert(token, task);
        token
    }

    fn cancel(&self, token: FrameToken) {
        if let Some(task) = self.tasks.lock().remove(&token) {
            task.abort();
        }
    }
}

impl Drop for TokioFrameScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.lock().drain() {
            task.abort();
        }
    }
}
