//! Temporal interval configuration.
//!
//! Tile frames are timestamps quantized to the tile's temporal resolution:
//! frame `n` of a `Day` tile is the `n`-th UTC day since the Unix epoch. The
//! decoder converts the requested absolute window (`min_frame`/`max_frame`
//! milliseconds) into interval-frame space once per decode and sizes every
//! cell's frame series from it.
//!
//! The mapping is pure and monotonic in the timestamp. It returns a
//! fraction and leaves rounding to the caller; the decoder takes the
//! ceiling so a window edge mid-interval never claims the partial frame.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Temporal resolution of a tile's frame axis.
///
/// Wire identifiers (`HOUR`, `DAY`, `10DAYS`, `MONTH`) are accepted by
/// [`FromStr`] and used by the serde representation, so the enum can sit
/// directly in request metadata and config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    /// One frame per UTC hour
    #[serde(rename = "HOUR")]
    Hour,
    /// One frame per UTC day
    #[serde(rename = "DAY")]
    Day,
    /// One frame per ten UTC days
    #[serde(rename = "10DAYS")]
    TenDays,
    /// One frame per calendar month
    #[serde(rename = "MONTH")]
    Month,
}

impl Interval {
    /// Map an epoch-millisecond timestamp to a fractional interval frame.
    ///
    /// Fixed-width intervals divide the timestamp by their span. `Month`
    /// counts whole calendar months since the epoch plus day-of-month
    /// progress as the fraction, so February advances as fast as July
    /// despite having fewer days.
    ///
    /// # Example
    /// ```
    /// use fourwings_lib::interval::Interval;
    ///
    /// assert_eq!(Interval::Day.interval_frame(86_400_000), 1.0);
    /// assert_eq!(Interval::Hour.interval_frame(7_200_000), 2.0);
    /// ```
    pub fn interval_frame(&self, timestamp_ms: i64) -> f64 {
        match self {
            Interval::Hour => timestamp_ms as f64 / MILLIS_PER_HOUR,
            Interval::Day => timestamp_ms as f64 / MILLIS_PER_DAY,
            Interval::TenDays => timestamp_ms as f64 / (10.0 * MILLIS_PER_DAY),
            Interval::Month => {
                // chrono represents any realistic tile timestamp; clamp the
                // pathological rest so the mapping stays total and monotonic.
                let date = Utc
                    .timestamp_millis_opt(timestamp_ms)
                    .single()
                    .unwrap_or_else(|| {
                        if timestamp_ms < 0 {
                            DateTime::<Utc>::MIN_UTC
                        } else {
                            DateTime::<Utc>::MAX_UTC
                        }
                    });

                let months = i64::from(date.year() - 1970) * 12 + i64::from(date.month0());
                let day_progress = f64::from(date.day0())
                    + f64::from(date.num_seconds_from_midnight()) / 86_400.0;

                months as f64 + day_progress / f64::from(days_in_month(date.year(), date.month()))
            }
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Interval::Hour => "HOUR",
            Interval::Day => "DAY",
            Interval::TenDays => "10DAYS",
            Interval::Month => "MONTH",
        };
        write!(f, "{name}")
    }
}

/// Error returned when an interval identifier is not recognized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown interval {0:?}; expected HOUR, DAY, 10DAYS or MONTH")]
pub struct ParseIntervalError(String);

impl FromStr for Interval {
    type Err = ParseIntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HOUR" => Ok(Interval::Hour),
            "DAY" => Ok(Interval::Day),
            "10DAYS" => Ok(Interval::TenDays),
            "MONTH" => Ok(Interval::Month),
            _ => Err(ParseIntervalError(s.to_string())),
        }
    }
}

/// Number of days in a calendar month.
fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(30, |last| last.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_intervals_divide_by_span() {
        assert_eq!(Interval::Hour.interval_frame(0), 0.0);
        assert_eq!(Interval::Hour.interval_frame(5_400_000), 1.5);
        assert_eq!(Interval::Day.interval_frame(86_400_000), 1.0);
        assert_eq!(Interval::TenDays.interval_frame(864_000_000), 1.0);
    }

    #[test]
    fn month_counts_calendar_months_since_epoch() {
        // 1970-01-01 is frame 0; 1970-02-01 is frame 1
        assert_eq!(Interval::Month.interval_frame(0), 0.0);

        let feb_1970 = Utc
            .with_ymd_and_hms(1970, 2, 1, 0, 0, 0)
            .single()
            .unwrap()
            .timestamp_millis();
        assert_eq!(Interval::Month.interval_frame(feb_1970), 1.0);

        let jan_2020 = Utc
            .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
            .single()
            .unwrap()
            .timestamp_millis();
        assert_eq!(Interval::Month.interval_frame(jan_2020), 600.0);
    }

    #[test]
    fn month_fraction_tracks_day_of_month() {
        // Mid-February 2021: 13 of 28 days elapsed
        let mid_feb = Utc
            .with_ymd_and_hms(2021, 2, 14, 0, 0, 0)
            .single()
            .unwrap()
            .timestamp_millis();
        let frame = Interval::Month.interval_frame(mid_feb);
        let months = (2021 - 1970) * 12 + 1;
        assert!((frame - (f64::from(months) + 13.0 / 28.0)).abs() < 1e-9);
    }

    #[test]
    fn month_mapping_is_monotonic() {
        let mut prev = f64::NEG_INFINITY;
        // Sample a few years of day steps
        for day in 0..(4 * 365) {
            let ts = i64::from(day) * 86_400_000;
            let frame = Interval::Month.interval_frame(ts);
            assert!(
                frame >= prev,
                "month frame decreased at day {day}: {prev} -> {frame}"
            );
            prev = frame;
        }
    }

    #[test]
    fn parses_wire_identifiers() {
        assert_eq!("HOUR".parse::<Interval>().unwrap(), Interval::Hour);
        assert_eq!("day".parse::<Interval>().unwrap(), Interval::Day);
        assert_eq!("10DAYS".parse::<Interval>().unwrap(), Interval::TenDays);
        assert_eq!("MONTH".parse::<Interval>().unwrap(), Interval::Month);
        assert!("FORTNIGHT".parse::<Interval>().is_err());
    }

    #[test]
    fn serde_uses_wire_identifiers() {
        assert_eq!(serde_json::to_string(&Interval::TenDays).unwrap(), "\"10DAYS\"");
        let parsed: Interval = serde_json::from_str("\"DAY\"").unwrap();
        assert_eq!(parsed, Interval::Day);
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2020, 2), 29);
        assert_eq!(days_in_month(2021, 2), 28);
        assert_eq!(days_in_month(2021, 12), 31);
    }
}
