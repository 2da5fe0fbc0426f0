//! The zone wire timestamps are expressed in.

use std::fmt;

use chrono::{Local, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{RangeError, Result};
use crate::range::{resolve, DateRangeQuery, NamedRange, ZonedDateRange};
use crate::timestamp::FormattedTimestamp;

/// Either the process-local zone or a named IANA zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    #[default]
    Local,
    Named(Tz),
}

impl Zone {
    /// `"local"` (any case) or an IANA name such as `"America/New_York"`.
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("local") {
            return Ok(Zone::Local);
        }
        name.parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| RangeError::InvalidTimezone(format!("'{name}'")))
    }

    /// Resolve `range` at the wall-clock reading `now` in this zone, or at
    /// the current time when `now` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::InvalidTimestamp`] if `now` falls into a DST
    /// gap of this zone.
    pub fn resolve_at(
        &self,
        range: NamedRange,
        now: Option<FormattedTimestamp>,
    ) -> Result<DateRangeQuery> {
        match self {
            Zone::Local => Ok(resolve(range, &anchor(&Local, now)?)),
            Zone::Named(tz) => Ok(resolve(range, &anchor(tz, now)?)),
        }
    }

    /// Interpret a wire reading as an instant in this zone.
    pub fn instant(&self, timestamp: &FormattedTimestamp) -> Result<chrono::DateTime<Utc>> {
        let instant = match self {
            Zone::Local => timestamp.to_instant(&Local).map(|dt| dt.with_timezone(&Utc)),
            Zone::Named(tz) => timestamp.to_instant(tz).map(|dt| dt.with_timezone(&Utc)),
        };
        instant.ok_or_else(|| gap_error(timestamp, self))
    }

    pub fn with_offset(&self, query: &DateRangeQuery) -> ZonedDateRange {
        match self {
            Zone::Local => query.with_offset(&Local),
            Zone::Named(tz) => query.with_offset(tz),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Local => f.write_str("local"),
            Zone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

fn anchor<T: TimeZone>(tz: &T, now: Option<FormattedTimestamp>) -> Result<chrono::DateTime<T>> {
    match now {
        None => Ok(Utc::now().with_timezone(tz)),
        Some(ts) => ts.to_instant(tz).ok_or_else(|| {
            RangeError::InvalidTimestamp(format!("'{ts}' does not exist in this timezone"))
        }),
    }
}

fn gap_error(timestamp: &FormattedTimestamp, zone: &Zone) -> RangeError {
    RangeError::InvalidTimestamp(format!("'{timestamp}' does not exist in {zone}"))
}
