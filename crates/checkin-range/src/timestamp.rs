//! The zone-less, second-precision timestamp used on the wire.
//!
//! A [`FormattedTimestamp`] is the local wall-clock reading of an instant,
//! rendered as `YYYY-MM-DDTHH:mm:ss`. It carries no offset: the producer and
//! the listing backend agree on the zone out of band. Conversion from an
//! instant always goes through [`DateTime::naive_local`], never through UTC.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RangeError;

/// `strftime` pattern of the wire format.
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Exact length of a wire timestamp (`2025-01-15T00:00:00`).
const WIRE_LEN: usize = 19;

/// A local wall-clock reading truncated to whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormattedTimestamp(NaiveDateTime);

impl FormattedTimestamp {
    /// Capture the local wall-clock reading of `instant` in its own zone.
    ///
    /// Sub-second precision is truncated, not rounded.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::TimeZone;
    /// use chrono_tz::America::New_York;
    /// use checkin_range::FormattedTimestamp;
    ///
    /// let instant = New_York.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap();
    /// assert_eq!(FormattedTimestamp::from_instant(&instant).to_string(), "2025-01-15T14:30:00");
    /// ```
    pub fn from_instant<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::from_naive(instant.naive_local())
    }

    /// Wrap a wall-clock reading, dropping fractional seconds.
    pub fn from_naive(naive: NaiveDateTime) -> Self {
        Self(naive.with_nanosecond(0).unwrap_or(naive))
    }

    /// The underlying wall-clock reading.
    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Interpret this reading in `tz`.
    ///
    /// Ambiguous readings (a repeated hour) take the earliest mapping.
    /// Returns `None` when the reading falls into a DST gap of `tz`.
    pub fn to_instant<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        tz.from_local_datetime(&self.0).earliest()
    }

    /// Render with the explicit UTC offset `tz` has at this reading,
    /// e.g. `2025-01-15T00:00:00-05:00`.
    pub fn to_rfc3339_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<String>
    where
        Tz::Offset: fmt::Display,
    {
        self.to_instant(tz)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, false))
    }

    /// Shift by whole seconds (negative moves backwards).
    pub fn shifted(&self, seconds: i64) -> Self {
        Self(self.0 + chrono::Duration::seconds(seconds))
    }
}

impl fmt::Display for FormattedTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(WIRE_FORMAT))
    }
}

impl FromStr for FormattedTimestamp {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // chrono accepts unpadded fields, the wire format does not.
        if s.len() != WIRE_LEN {
            return Err(RangeError::InvalidTimestamp(format!(
                "'{s}': expected YYYY-MM-DDTHH:mm:ss"
            )));
        }
        NaiveDateTime::parse_from_str(s, WIRE_FORMAT)
            .map(Self)
            .map_err(|e| RangeError::InvalidTimestamp(format!("'{s}': {e}")))
    }
}

impl From<NaiveDateTime> for FormattedTimestamp {
    fn from(naive: NaiveDateTime) -> Self {
        Self::from_naive(naive)
    }
}

impl Serialize for FormattedTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FormattedTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use chrono_tz::America::New_York;
    use chrono_tz::Asia::Kolkata;

    fn naive(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_format_zero_pads_every_field() {
        let ts = FormattedTimestamp::from_naive(naive(2025, 1, 5, 3, 4, 9));
        assert_eq!(ts.to_string(), "2025-01-05T03:04:09");
    }

    #[test]
    fn test_format_truncates_subseconds() {
        let with_millis = NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap();
        let ts = FormattedTimestamp::from_naive(with_millis);
        assert_eq!(ts.to_string(), "2025-01-15T23:59:59");
    }

    #[test]
    fn test_format_uses_local_wall_clock_not_utc() {
        // 02:00 UTC is still the previous evening in New York (UTC-5 in January)
        let utc = Utc.with_ymd_and_hms(2025, 1, 15, 2, 0, 0).unwrap();
        let local = utc.with_timezone(&New_York);

        assert_eq!(
            FormattedTimestamp::from_instant(&utc).to_string(),
            "2025-01-15T02:00:00"
        );
        assert_eq!(
            FormattedTimestamp::from_instant(&local).to_string(),
            "2025-01-14T21:00:00"
        );
    }

    #[test]
    fn test_format_half_hour_offset() {
        let utc = Utc.with_ymd_and_hms(2025, 1, 15, 20, 0, 0).unwrap();
        let local = utc.with_timezone(&Kolkata);
        assert_eq!(
            FormattedTimestamp::from_instant(&local).to_string(),
            "2025-01-16T01:30:00"
        );
    }

    #[test]
    fn test_parse_valid() {
        let ts: FormattedTimestamp = "2025-01-15T00:00:00".parse().unwrap();
        assert_eq!(ts.naive(), naive(2025, 1, 15, 0, 0, 0));
    }

    #[test]
    fn test_parse_rejects_offset_suffix() {
        assert!("2025-01-15T00:00:00Z".parse::<FormattedTimestamp>().is_err());
        assert!("2025-01-15T00:00:00+01:00"
            .parse::<FormattedTimestamp>()
            .is_err());
    }

    #[test]
    fn test_parse_rejects_fractional_seconds() {
        let err = "2025-01-15T00:00:00.500"
            .parse::<FormattedTimestamp>()
            .unwrap_err()
            .to_string();
        assert!(err.contains("Invalid timestamp"), "got: {err}");
    }

    #[test]
    fn test_parse_rejects_unpadded_fields() {
        assert!("2025-1-5T3:04:09".parse::<FormattedTimestamp>().is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("not-a-timestamp-at-all".parse::<FormattedTimestamp>().is_err());
        assert!("2025-02-30T00:00:00".parse::<FormattedTimestamp>().is_err());
    }

    #[test]
    fn test_round_trip_through_instant() {
        let ts: FormattedTimestamp = "2025-07-04T18:45:12".parse().unwrap();
        let instant = ts.to_instant(&New_York).unwrap();
        assert_eq!(FormattedTimestamp::from_instant(&instant), ts);
    }

    #[test]
    fn test_to_instant_in_dst_gap_is_none() {
        // 2025-03-09 02:30 does not exist in New York
        let ts: FormattedTimestamp = "2025-03-09T02:30:00".parse().unwrap();
        assert!(ts.to_instant(&New_York).is_none());
    }

    #[test]
    fn test_to_rfc3339_in_carries_offset() {
        let ts: FormattedTimestamp = "2025-01-15T00:00:00".parse().unwrap();
        assert_eq!(
            ts.to_rfc3339_in(&New_York).as_deref(),
            Some("2025-01-15T00:00:00-05:00")
        );
    }

    #[test]
    fn test_serde_as_plain_string() {
        let ts: FormattedTimestamp = "2025-01-15T09:00:00".parse().unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2025-01-15T09:00:00\"");
        let back: FormattedTimestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn test_ordering_follows_wall_clock() {
        let a: FormattedTimestamp = "2025-01-15T00:00:00".parse().unwrap();
        let b = a.shifted(1);
        assert!(a < b);
        assert_eq!(b.to_string(), "2025-01-15T00:00:01");
        assert_eq!(a.shifted(-1).to_string(), "2025-01-14T23:59:59");
    }
}
