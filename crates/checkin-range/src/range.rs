//! Named date-range selectors and their resolution to local-time bounds.
//!
//! All functions take the reference "now" as an explicit argument; only
//! [`resolve_now`] reads the system clock. Bounds are computed on the local
//! calendar of `now`'s own zone, so passing a `DateTime<chrono_tz::Tz>` or a
//! `DateTime<chrono::Local>` selects the zone the wire strings describe.
//!
//! # Resolution rules
//!
//! | Range        | start                                | end                       |
//! |--------------|--------------------------------------|---------------------------|
//! | `today`      | local midnight of `now`'s date       | 23:59:59.999 of that date |
//! | `last7days`  | local midnight, 7 days before        | `now`                     |
//! | `last30days` | local midnight, 30 days before       | `now`                     |
//! | `all`        | unbounded                            | unbounded                 |

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Local, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::RangeError;
use crate::timestamp::FormattedTimestamp;

/// Longest DST gap we step across when a local time does not exist.
/// Samoa skipped a whole calendar day in 2011.
const MAX_GAP_MINUTES: i64 = 25 * 60;

// ── NamedRange ──────────────────────────────────────────────────────────────

/// The closed set of filter selectors offered by the records viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedRange {
    /// The current local calendar day.
    #[default]
    Today,
    /// Rolling window starting at local midnight seven days back.
    #[serde(alias = "week")]
    Last7Days,
    /// Rolling window starting at local midnight thirty days back.
    #[serde(alias = "month")]
    Last30Days,
    /// No filtering.
    All,
}

impl NamedRange {
    /// Every selector, in the order the viewer lists them.
    pub const VARIANTS: [NamedRange; 4] = [
        NamedRange::Today,
        NamedRange::Last7Days,
        NamedRange::Last30Days,
        NamedRange::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NamedRange::Today => "today",
            NamedRange::Last7Days => "last7days",
            NamedRange::Last30Days => "last30days",
            NamedRange::All => "all",
        }
    }

    /// Calendar days to step back for rolling windows.
    fn lookback_days(&self) -> Option<u64> {
        match self {
            NamedRange::Last7Days => Some(7),
            NamedRange::Last30Days => Some(30),
            NamedRange::Today | NamedRange::All => None,
        }
    }
}

impl fmt::Display for NamedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamedRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(NamedRange::Today),
            "last7days" | "week" => Ok(NamedRange::Last7Days),
            "last30days" | "month" => Ok(NamedRange::Last30Days),
            "all" => Ok(NamedRange::All),
            other => Err(RangeError::UnknownRange(format!(
                "'{other}' (expected one of: today, last7days, last30days, all)"
            ))),
        }
    }
}

// ── ResolvedRange ───────────────────────────────────────────────────────────

/// Inclusive instant bounds. `None` on a side means unbounded on that side.
///
/// When both bounds are present, `start <= end`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRange<Tz: TimeZone> {
    pub start: Option<DateTime<Tz>>,
    pub end: Option<DateTime<Tz>>,
}

impl<Tz: TimeZone> ResolvedRange<Tz> {
    /// The `all` range.
    pub fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Closed-interval membership: `start <= instant <= end`.
    pub fn contains<Other: TimeZone>(&self, instant: &DateTime<Other>) -> bool {
        let after_start = self.start.as_ref().is_none_or(|start| start <= instant);
        let before_end = self.end.as_ref().is_none_or(|end| instant <= end);
        after_start && before_end
    }

    /// Wire form of both bounds.
    pub fn to_query(&self) -> DateRangeQuery {
        DateRangeQuery {
            start_date: self.start.as_ref().map(FormattedTimestamp::from_instant),
            end_date: self.end.as_ref().map(FormattedTimestamp::from_instant),
        }
    }
}

// ── DateRangeQuery ──────────────────────────────────────────────────────────

/// The `startDate` / `endDate` pair sent to a listing endpoint.
///
/// Serializes with camelCase keys and omits absent bounds, so the `all`
/// range serializes to `{}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<FormattedTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<FormattedTimestamp>,
}

/// The same bounds rendered as RFC 3339 with an explicit UTC offset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonedDateRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl DateRangeQuery {
    pub fn is_unbounded(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }

    /// The listing backend's comparison: both bounds inclusive, evaluated on
    /// local wall-clock readings in the zone that produced them.
    pub fn admits(&self, timestamp: &FormattedTimestamp) -> bool {
        let after_start = self.start_date.is_none_or(|start| start <= *timestamp);
        let before_end = self.end_date.is_none_or(|end| *timestamp <= end);
        after_start && before_end
    }

    /// Zone-qualified rendering for backends that accept explicit offsets.
    /// A bound that cannot be placed in `tz` (DST gap) is dropped.
    pub fn with_offset<Tz: TimeZone>(&self, tz: &Tz) -> ZonedDateRange
    where
        Tz::Offset: fmt::Display,
    {
        ZonedDateRange {
            start_date: self.start_date.and_then(|ts| ts.to_rfc3339_in(tz)),
            end_date: self.end_date.and_then(|ts| ts.to_rfc3339_in(tz)),
        }
    }
}

// ── Resolution ──────────────────────────────────────────────────────────────

/// Resolve `range` against `now` into inclusive instant bounds.
///
/// Never fails: wall-clock times that fall into a DST gap move to the first
/// instant after the gap (start) or the last instant before it (end).
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use chrono_tz::America::New_York;
/// use checkin_range::{resolve_range, NamedRange};
///
/// let now = New_York.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap();
/// let range = resolve_range(NamedRange::Today, &now);
/// assert!(range.contains(&now));
/// ```
pub fn resolve_range<Tz: TimeZone>(range: NamedRange, now: &DateTime<Tz>) -> ResolvedRange<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();

    match range {
        NamedRange::All => ResolvedRange::unbounded(),
        NamedRange::Today => {
            let start = first_instant_at_or_after(&tz, today.and_time(NaiveTime::MIN));
            let end = last_instant_at_or_before(&tz, today.and_time(end_of_day()));
            ResolvedRange {
                start: Some(start.unwrap_or_else(|| now.clone())),
                end: Some(end.unwrap_or_else(|| now.clone())),
            }
        }
        NamedRange::Last7Days | NamedRange::Last30Days => {
            let days = range.lookback_days().unwrap_or_default();
            let start = today
                .checked_sub_days(Days::new(days))
                .and_then(|date| first_instant_at_or_after(&tz, date.and_time(NaiveTime::MIN)))
                .filter(|start| start <= now);
            ResolvedRange {
                start: Some(start.unwrap_or_else(|| now.clone())),
                end: Some(now.clone()),
            }
        }
    }
}

/// Resolve `range` against `now` into its wire form.
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use chrono_tz::America::New_York;
/// use checkin_range::{resolve, NamedRange};
///
/// let now = New_York.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
/// let query = resolve(NamedRange::Last7Days, &now);
/// assert_eq!(query.start_date.unwrap().to_string(), "2025-01-08T00:00:00");
/// assert_eq!(query.end_date.unwrap().to_string(), "2025-01-15T09:00:00");
/// ```
pub fn resolve<Tz: TimeZone>(range: NamedRange, now: &DateTime<Tz>) -> DateRangeQuery {
    let query = resolve_range(range, now).to_query();
    tracing::debug!(
        %range,
        start_date = ?query.start_date.map(|ts| ts.to_string()),
        end_date = ?query.end_date.map(|ts| ts.to_string()),
        "resolved date range"
    );
    query
}

/// [`resolve`] against the process-local clock and zone.
pub fn resolve_now(range: NamedRange) -> DateRangeQuery {
    resolve(range, &Local::now())
}

/// 23:59:59.999, the last millisecond of a local day.
fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

/// Map a wall-clock reading to an instant, stepping forward out of a DST gap.
/// Ambiguous readings take the earliest mapping.
fn first_instant_at_or_after<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    (0..=MAX_GAP_MINUTES).find_map(|minutes| {
        let candidate = naive.checked_add_signed(chrono::Duration::minutes(minutes))?;
        tz.from_local_datetime(&candidate).earliest()
    })
}

/// Map a wall-clock reading to an instant, stepping backward out of a DST gap.
/// Ambiguous readings take the latest mapping.
fn last_instant_at_or_before<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    (0..=MAX_GAP_MINUTES).find_map(|minutes| {
        let candidate = naive.checked_sub_signed(chrono::Duration::minutes(minutes))?;
        tz.from_local_datetime(&candidate).latest()
    })
}

// ── Tests ───────────────────────────────────────────────────────────────────
