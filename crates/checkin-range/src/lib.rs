//! # checkin-range
//!
//! Date-range filtering for guard check-in records.
//!
//! The records viewer filters by a named selector (`today`, `last7days`,
//! `last30days`, `all`). This crate turns a selector plus an explicit "now"
//! into inclusive local-time bounds, renders them in the zone-less
//! `YYYY-MM-DDTHH:mm:ss` wire form the listing endpoint expects, and
//! provides the inclusive comparison that endpoint applies.
//!
//! ## Modules
//!
//! - [`range`] — Named selectors → inclusive bounds, boundary inclusion
//! - [`timestamp`] — The `YYYY-MM-DDTHH:mm:ss` wire timestamp
//! - [`zone`] — Process-local or IANA zone selection
//! - [`pagination`] — Page index, page size and column sort state
//! - [`query`] — Listing query strings (`page`, `size`, `sort`, filters, dates)
//! - [`sequence`] — Discarding responses superseded by a later request
//! - [`stats`] — Check-in records and dashboard aggregates
//! - [`config`] — TOML configuration and logging setup
//! - [`error`] — Error types

pub mod config;
pub mod error;
pub mod pagination;
pub mod query;
pub mod range;
pub mod sequence;
pub mod stats;
pub mod timestamp;
pub mod zone;

pub use config::{Config, LogFormat, LoggingConfig};
pub use error::{RangeError, Result};
pub use pagination::{Pagination, Sort, SortDirection, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
pub use query::{CheckInQuery, ParamNames};
pub use range::{
    resolve, resolve_now, resolve_range, DateRangeQuery, NamedRange, ResolvedRange,
    ZonedDateRange,
};
pub use sequence::{RequestSequencer, RequestTicket};
pub use stats::{CheckInRecord, CountBy, DashboardStats};
pub use timestamp::{FormattedTimestamp, WIRE_FORMAT};
pub use zone::Zone;
