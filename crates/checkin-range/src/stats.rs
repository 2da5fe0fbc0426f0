//! Check-in records and the dashboard aggregates computed over them.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::range::DateRangeQuery;
use crate::timestamp::FormattedTimestamp;

/// One check-in, as returned by the records listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRecord {
    pub id: i64,
    pub guard_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard_name: Option<String>,
    pub site_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    pub timestamp: FormattedTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Check-in count for one guard or one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountBy {
    pub id: i64,
    pub name: Option<String>,
    pub count: usize,
}

/// Aggregates shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub distinct_guards: usize,
    pub distinct_sites: usize,
    /// Most active first, ties broken by id.
    pub by_site: Vec<CountBy>,
    pub by_guard: Vec<CountBy>,
    pub first_check_in: Option<FormattedTimestamp>,
    pub last_check_in: Option<FormattedTimestamp>,
}

impl DashboardStats {
    /// Aggregate the records the range admits; the rest are ignored.
    pub fn from_records<'a, I>(records: I, range: &DateRangeQuery) -> Self
    where
        I: IntoIterator<Item = &'a CheckInRecord>,
    {
        let mut stats = DashboardStats::default();
        let mut sites: HashMap<i64, CountBy> = HashMap::new();
        let mut guards: HashMap<i64, CountBy> = HashMap::new();

        for record in records
            .into_iter()
            .filter(|record| range.admits(&record.timestamp))
        {
            stats.total += 1;
            bump(&mut sites, record.site_id, record.site_name.as_deref());
            bump(&mut guards, record.guard_id, record.guard_name.as_deref());

            stats.first_check_in = Some(match stats.first_check_in {
                Some(first) => first.min(record.timestamp),
                None => record.timestamp,
            });
            stats.last_check_in = Some(match stats.last_check_in {
                Some(last) => last.max(record.timestamp),
                None => record.timestamp,
            });
        }

        stats.distinct_sites = sites.len();
        stats.distinct_guards = guards.len();
        stats.by_site = ranked(sites);
        stats.by_guard = ranked(guards);

        tracing::debug!(
            total = stats.total,
            guards = stats.distinct_guards,
            sites = stats.distinct_sites,
            "computed dashboard stats"
        );
        stats
    }

    /// Ids of sites with no check-in among `known_sites`.
    pub fn idle_sites(&self, known_sites: &[i64]) -> BTreeSet<i64> {
        let active: BTreeSet<i64> = self.by_site.iter().map(|c| c.id).collect();
        known_sites
            .iter()
            .copied()
            .filter(|id| !active.contains(id))
            .collect()
    }
}

fn bump(counts: &mut HashMap<i64, CountBy>, id: i64, name: Option<&str>) {
    let entry = counts.entry(id).or_insert_with(|| CountBy {
        id,
        name: None,
        count: 0,
    });
    entry.count += 1;
    if entry.name.is_none() {
        entry.name = name.map(str::to_string);
    }
}

fn ranked(counts: HashMap<i64, CountBy>) -> Vec<CountBy> {
    let mut out: Vec<CountBy> = counts.into_values().collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then(a.id.cmp(&b.id)));
    out
}
