//! Fixed table of warp target durations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WarpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodKey {
    #[serde(rename = "1d")]
    Day,
    #[serde(rename = "1w")]
    Week,
    #[serde(rename = "1m")]
    Month,
    #[serde(rename = "3m")]
    Quarter,
    #[serde(rename = "6m")]
    HalfYear,
    #[serde(rename = "1y")]
    Year,
}

impl PeriodKey {
    pub const ALL: [PeriodKey; 6] = [
        PeriodKey::Day,
        PeriodKey::Week,
        PeriodKey::Month,
        PeriodKey::Quarter,
        PeriodKey::HalfYear,
        PeriodKey::Year,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PeriodKey::Day => "1d",
            PeriodKey::Week => "1w",
            PeriodKey::Month => "1m",
            PeriodKey::Quarter => "3m",
            PeriodKey::HalfYear => "6m",
            PeriodKey::Year => "1y",
        }
    }

    /// Simulated duration of the period. Months are 30 days, the year is 365.
    pub fn seconds(self) -> u64 {
        match self {
            PeriodKey::Day => 86_400,
            PeriodKey::Week => 604_800,
            PeriodKey::Month => 2_592_000,
            PeriodKey::Quarter => 7_776_000,
            PeriodKey::HalfYear => 15_552_000,
            PeriodKey::Year => 31_536_000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PeriodKey::Day => "1D",
            PeriodKey::Week => "1W",
            PeriodKey::Month => "1M",
            PeriodKey::Quarter => "3M",
            PeriodKey::HalfYear => "6M",
            PeriodKey::Year => "1Y",
        }
    }

    pub fn full_label(self) -> &'static str {
        match self {
            PeriodKey::Day => "1 Day",
            PeriodKey::Week => "1 Week",
            PeriodKey::Month => "1 Month",
            PeriodKey::Quarter => "3 Months",
            PeriodKey::HalfYear => "6 Months",
            PeriodKey::Year => "1 Year",
        }
    }
}

impl FromStr for PeriodKey {
    type Err = WarpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PeriodKey::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| WarpError::UnknownPeriod(s.to_string()))
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_key() {
        for period in PeriodKey::ALL {
            assert_eq!(period.key().parse::<PeriodKey>().unwrap(), period);
        }
        assert_eq!("1y".parse::<PeriodKey>().unwrap().seconds(), 31_536_000);
        assert_eq!("1d".parse::<PeriodKey>().unwrap().seconds(), 86_400);
    }

    #[test]
    fn unknown_key_is_an_error() {
        assert_eq!(
            "2y".parse::<PeriodKey>(),
            Err(WarpError::UnknownPeriod("2y".into()))
        );
        // Keys are case-sensitive, labels are not keys.
        assert!("1Y".parse::<PeriodKey>().is_err());
    }

    #[test]
    fn table_is_ascending() {
        let secs: Vec<u64> = PeriodKey::ALL.iter().map(|p| p.seconds()).collect();
        assert!(secs.windows(2).all(|w| w[0] < w[1]));
    }
}
