//! ## timewarp-core::projector
//! **Linear reward accrual over simulated time**
//!
//! Rewards accrue at a fixed annual rate proportional to elapsed time over a
//! 365-day year. No compounding and no leap days.

use serde::Serialize;

use crate::period::PeriodKey;

pub const SECONDS_PER_YEAR: f64 = 31_536_000.0;

/// Rate paid by the staking pool unless configured otherwise.
pub const DEFAULT_ANNUAL_RATE_PERCENT: f64 = 10.0;

/// Sample count of a projection curve, including both endpoints.
pub const CURVE_POINTS: usize = 7;

/// Additional reward earned by `principal` at `annual_rate_percent` over
/// `simulated_elapsed_seconds`.
#[inline]
pub fn project(principal: f64, annual_rate_percent: f64, simulated_elapsed_seconds: f64) -> f64 {
    principal * (annual_rate_percent / 100.0) * (simulated_elapsed_seconds / SECONDS_PER_YEAR)
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardProjector {
    pub annual_rate_percent: f64,
}

impl Default for RewardProjector {
    fn default() -> Self {
        Self::new(DEFAULT_ANNUAL_RATE_PERCENT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurvePoint {
    /// Position within the period, 0.0 to 1.0.
    pub fraction: f64,
    pub seconds: f64,
    pub label: String,
    pub principal: f64,
    pub rewards: f64,
    pub total: f64,
}

impl RewardProjector {
    pub fn new(annual_rate_percent: f64) -> Self {
        Self {
            annual_rate_percent,
        }
    }

    #[inline]
    pub fn additional(&self, principal: f64, simulated_elapsed_seconds: f64) -> f64 {
        project(principal, self.annual_rate_percent, simulated_elapsed_seconds)
    }

    /// Static projection for every period of the table, rounded to 6 decimals.
    pub fn project_all(&self, principal: f64) -> Vec<(PeriodKey, f64)> {
        PeriodKey::ALL
            .into_iter()
            .map(|p| (p, round6(self.additional(principal, p.seconds() as f64))))
            .collect()
    }

    /// Evenly spaced samples of accrued rewards across `period`.
    pub fn curve(&self, principal: f64, period: PeriodKey, points: usize) -> Vec<CurvePoint> {
        let points = points.max(2);
        (0..points)
            .map(|i| {
                let fraction = i as f64 / (points - 1) as f64;
                let seconds = period.seconds() as f64 * fraction;
                let rewards = self.additional(principal, seconds);
                CurvePoint {
                    fraction,
                    seconds,
                    label: curve_label(i, period, seconds),
                    principal,
                    rewards: round6(rewards),
                    total: round6(principal + rewards),
                }
            })
            .collect()
    }
}

fn curve_label(index: usize, period: PeriodKey, seconds: f64) -> String {
    if index == 0 {
        return "Now".into();
    }
    match period {
        PeriodKey::Day => format!("{}h", (seconds / 3_600.0).round()),
        PeriodKey::Week => format!("{}d", (seconds / 86_400.0).round()),
        _ => {
            let days = (seconds / 86_400.0).round();
            if days < 30.0 {
                format!("{days}d")
            } else {
                format!("{}mo", (days / 30.0).round())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_year_at_ten_percent() {
        assert!((project(100.0, 10.0, SECONDS_PER_YEAR) - 10.0).abs() < 1e-12);
        assert_eq!(project(100.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn scales_linearly() {
        let half = project(250.0, 8.0, SECONDS_PER_YEAR / 2.0);
        assert!((half - 10.0).abs() < 1e-9);
        assert_eq!(project(0.0, 10.0, SECONDS_PER_YEAR), 0.0);
    }

    #[test]
    fn projections_for_every_period() {
        let all = RewardProjector::default().project_all(365.0);
        assert_eq!(all.len(), PeriodKey::ALL.len());
        assert_eq!(all[0], (PeriodKey::Day, 0.1));
        assert_eq!(all[5], (PeriodKey::Year, 36.5));
    }

    #[test]
    fn curve_endpoints_and_labels() {
        let curve = RewardProjector::default().curve(100.0, PeriodKey::Year, CURVE_POINTS);
        assert_eq!(curve.len(), 7);
        assert_eq!(curve[0].label, "Now");
        assert_eq!(curve[0].rewards, 0.0);
        assert_eq!(curve[6].rewards, 10.0);
        assert_eq!(curve[6].total, 110.0);
        assert_eq!(curve[6].label, "12mo");

        let day = RewardProjector::default().curve(100.0, PeriodKey::Day, CURVE_POINTS);
        assert_eq!(day[1].label, "4h");
        let week = RewardProjector::default().curve(100.0, PeriodKey::Week, CURVE_POINTS);
        assert_eq!(week[6].label, "7d");
    }
}
