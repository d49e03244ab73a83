//! Timestamp helpers shared by the golden and noise generators.
//!
//! Every timestamp sent to the index is a [`SolrDate`]: a UTC instant that
//! renders as `YYYY-MM-DDTHH:MM:SSZ`, the form Solr's `pdate` fields accept.
//!
//! Two producers exist:
//!
//! - [`random_date`] draws a uniformly random instant (to the second) inside
//!   a [`DateWindow`]: from a start year up to now, a single month, or a
//!   single day.
//! - [`relative_to_now`] shifts "now" by a signed number of days, for records
//!   that must satisfy relative predicates ("last week", "this month").
//!
//! "Now" is always passed in by the caller so generation can be pinned to a
//! fixed clock in tests. The CLI passes `Utc::now()`.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use rand::Rng;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Year the default window starts from.
pub const DEFAULT_START_YEAR: i32 = 2020;

/// Rendering used for every timestamp sent to Solr.
pub const SOLR_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("month {0} is outside 1..=12")]
    InvalidMonth(u32),

    #[error("{year}-{month:02}-{day:02} is not a calendar date")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("a day ({0}) was given without a month")]
    DayWithoutMonth(u32),

    #[error("window starting at {start} has no room before {now}")]
    EmptyWindow { start: SolrDate, now: SolrDate },

    #[error("cannot parse '{0}' as a Solr timestamp")]
    Parse(String),
}

/// A UTC instant rendered in Solr's `pdate` text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SolrDate(DateTime<Utc>);

impl SolrDate {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// Build a fixed timestamp, e.g. `SolrDate::at(2023, 12, 31, 23, 59, 59)`.
    pub fn at(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> Result<Self, DateError> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parse `YYYY-MM-DDTHH:MM:SS(.fff)?Z`.
    pub fn parse(text: &str) -> Result<Self, DateError> {
        let body = text
            .strip_suffix('Z')
            .ok_or_else(|| DateError::Parse(text.to_string()))?;
        NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Self(naive.and_utc()))
            .map_err(|_| DateError::Parse(text.to_string()))
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for SolrDate {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl fmt::Display for SolrDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(SOLR_DATE_FORMAT))
    }
}

impl Serialize for SolrDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The span a random timestamp is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    /// January 1st of `year` up to now.
    Since { year: i32 },
    /// The whole calendar month.
    Month { year: i32, month: u32 },
    /// The whole calendar day.
    Day { year: i32, month: u32, day: u32 },
}

impl Default for DateWindow {
    fn default() -> Self {
        DateWindow::Since {
            year: DEFAULT_START_YEAR,
        }
    }
}

impl DateWindow {
    /// Pick the narrowest window the optional month/day allow.
    pub fn narrowed(year: i32, month: Option<u32>, day: Option<u32>) -> Result<Self, DateError> {
        match (month, day) {
            (None, None) => Ok(DateWindow::Since { year }),
            (Some(month), None) => Ok(DateWindow::Month { year, month }),
            (Some(month), Some(day)) => Ok(DateWindow::Day { year, month, day }),
            (None, Some(day)) => Err(DateError::DayWithoutMonth(day)),
        }
    }

    /// Half-open `[start, end)` bounds. Windows never reach past `now`.
    pub fn bounds(&self, now: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>), DateError> {
        let (start, end) = match *self {
            DateWindow::Since { year } => (midnight(year, 1, 1)?, now),
            DateWindow::Month { year, month } => {
                if !(1..=12).contains(&month) {
                    return Err(DateError::InvalidMonth(month));
                }
                let (next_year, next_month) = if month == 12 {
                    (year + 1, 1)
                } else {
                    (year, month + 1)
                };
                (midnight(year, month, 1)?, midnight(next_year, next_month, 1)?)
            }
            DateWindow::Day { year, month, day } => {
                if !(1..=12).contains(&month) {
                    return Err(DateError::InvalidMonth(month));
                }
                let start = midnight(year, month, day)?;
                (start, start + Duration::days(1))
            }
        };

        let end = end.min(now);
        if end <= start {
            return Err(DateError::EmptyWindow {
                start: start.into(),
                now: now.into(),
            });
        }
        Ok((start, end))
    }
}

fn midnight(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>, DateError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .ok_or(DateError::InvalidDate { year, month, day })
}

/// Uniformly random instant, to the second, inside `window`.
pub fn random_date<R: Rng + ?Sized>(
    rng: &mut R,
    window: &DateWindow,
    now: DateTime<Utc>,
) -> Result<SolrDate, DateError> {
    let (start, end) = window.bounds(now)?;
    let span = (end - start).num_seconds().max(1);
    let offset = rng.gen_range(0..span);
    Ok(SolrDate(start + Duration::seconds(offset)))
}

/// `now` shifted by `days` (negative is the past).
pub fn relative_to_now(now: DateTime<Utc>, days: i64) -> SolrDate {
    SolrDate(now + Duration::days(days))
}

/// Between 1 and `max_days` whole days before `now`.
pub fn recent_date<R: Rng + ?Sized>(rng: &mut R, max_days: u32, now: DateTime<Utc>) -> SolrDate {
    let back = rng.gen_range(1..=max_days.max(1));
    relative_to_now(now, -i64::from(back))
}
