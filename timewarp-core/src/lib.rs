//! # timewarp-core
//!
//! Time-warp simulation engine: compresses a reward-accrual period of a day
//! up to a year into a few seconds of wall-clock time.
//!
//! ### Key Submodules:
//! - `ramp`: three-phase speed multiplier as a function of real elapsed time
//! - `projector`: linear reward projection over simulated seconds
//! - `period`: fixed table of warp target durations
//! - `time` / `scheduler`: injectable clock and per-frame callback scheduling
//! - `store`: the warp state container and its frame loop
//! - `adapter`: change-detecting readers and consistent derived views
//! - `format`: HUD-style display helpers

pub mod adapter;
pub mod error;
pub mod format;
pub mod period;
pub mod projector;
pub mod ramp;
pub mod scheduler;
pub mod state;
pub mod store;
pub mod time;

pub mod prelude {
    pub use crate::adapter::{WarpReader, WarpView};
    pub use crate::error::WarpError;
    pub use crate::period::PeriodKey;
    pub use crate::projector::{project, RewardProjector};
    pub use crate::ramp::{speed, SpeedRamp};
    pub use crate::scheduler::{FrameScheduler, FrameToken, ManualScheduler, TokioFrameScheduler};
    pub use crate::state::{WarpSnapshot, WarpState};
    pub use crate::store::{Subscription, WarpSettings, WarpStore};
    pub use crate::time::{Clock, SystemClock, VirtualClock};
}

pub use error::WarpError;
pub use store::WarpStore;
