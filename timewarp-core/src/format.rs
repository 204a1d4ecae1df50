//! HUD formatting helpers.

/// Compact elapsed time: `"3d 4h 5m"`, `"4h 5m 6s"`, `"5m 6s"` or `"6s"`.
pub fn format_elapsed(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let secs = total % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Small amounts get four decimals, anything from 1 upward two.
pub fn format_rewards(rewards: f64) -> String {
    if rewards < 1.0 {
        format!("{rewards:.4}")
    } else {
        format!("{rewards:.2}")
    }
}

/// `elapsed / target` clamped to `[0, 1]`; `0` without a target.
pub fn progress(simulated_elapsed: f64, target_seconds: u64) -> f64 {
    if target_seconds == 0 {
        return 0.0;
    }
    (simulated_elapsed / target_seconds as f64).clamp(0.0, 1.0)
}
