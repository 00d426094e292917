//! Time units used to store and report accumulated durations
//!
//! A region stores its accumulated duration as an integer count of one
//! [`TimeUnit`]. Reading it back in another unit goes through [`cast`], which
//! uses true chronological factors: 1000x between ns/us/ms/s, 60x between
//! s/m and m/h.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Granularity at which a region accumulates its duration
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
    ValueEnum,
)]
pub enum TimeUnit {
    #[serde(rename = "ns")]
    #[value(name = "ns")]
    Nanoseconds,
    #[serde(rename = "us")]
    #[value(name = "us")]
    Microseconds,
    #[default]
    #[serde(rename = "ms")]
    #[value(name = "ms")]
    Milliseconds,
    #[serde(rename = "s")]
    #[value(name = "s")]
    Seconds,
    #[serde(rename = "m")]
    #[value(name = "m")]
    Minutes,
    #[serde(rename = "h")]
    #[value(name = "h")]
    Hours,
}

impl TimeUnit {
    /// Every unit, finest first
    pub const ALL: [TimeUnit; 6] = [
        TimeUnit::Nanoseconds,
        TimeUnit::Microseconds,
        TimeUnit::Milliseconds,
        TimeUnit::Seconds,
        TimeUnit::Minutes,
        TimeUnit::Hours,
    ];

    /// Short suffix printed after a duration ("ns", "us", "ms", "s", "m", "h")
    pub fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "m",
            TimeUnit::Hours => "h",
        }
    }

    /// Length of one tick of this unit in nanoseconds
    pub fn nanos(self) -> u128 {
        match self {
            TimeUnit::Nanoseconds => 1,
            TimeUnit::Microseconds => 1_000,
            TimeUnit::Milliseconds => 1_000_000,
            TimeUnit::Seconds => 1_000_000_000,
            TimeUnit::Minutes => 60 * 1_000_000_000,
            TimeUnit::Hours => 3_600 * 1_000_000_000,
        }
    }

    /// Number of whole ticks of this unit in `duration`, truncating toward zero
    pub fn ticks(self, duration: Duration) -> u64 {
        u64::try_from(duration.as_nanos() / self.nanos()).unwrap_or(u64::MAX)
    }

    /// `ticks` of this unit as a [`Duration`], saturating on overflow
    pub fn to_duration(self, ticks: u64) -> Duration {
        let nanos = u128::from(ticks).saturating_mul(self.nanos());
        let secs = u64::try_from(nanos / 1_000_000_000).unwrap_or(u64::MAX);
        Duration::new(secs, (nanos % 1_000_000_000) as u32)
    }
}

/// Convert `count` ticks of `from` into (possibly fractional) ticks of `to`
///
/// Same-unit casts return the count unchanged.
pub fn cast(count: u64, from: TimeUnit, to: TimeUnit) -> f64 {
    cast_f64(count as f64, from, to)
}

/// Fractional variant of [`cast`], used for averages
pub fn cast_f64(count: f64, from: TimeUnit, to: TimeUnit) -> f64 {
    if from == to {
        return count;
    }
    count * from.nanos() as f64 / to.nanos() as f64
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ns" | "nanosecond" | "nanoseconds" => Ok(TimeUnit::Nanoseconds),
            "us" | "microsecond" | "microseconds" => Ok(TimeUnit::Microseconds),
            "ms" | "millisecond" | "milliseconds" => Ok(TimeUnit::Milliseconds),
            "s" | "second" | "seconds" => Ok(TimeUnit::Seconds),
            "m" | "minute" | "minutes" => Ok(TimeUnit::Minutes),
            "h" | "hour" | "hours" => Ok(TimeUnit::Hours),
            other => Err(format!(
                "unknown time unit '{}' (expected one of ns, us, ms, s, m, h)",
                other
            )),
        }
    }
}
