//! Query strings for the check-in records listing endpoint.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::pagination::Pagination;
use crate::range::DateRangeQuery;

/// Names of the date bound query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct ParamNames {
    pub start: String,
    pub end: String,
}

impl Default for ParamNames {
    fn default() -> Self {
        Self {
            start: "startDate".to_string(),
            end: "endDate".to_string(),
        }
    }
}

/// Everything the records viewer sends when it loads a page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckInQuery {
    pub range: DateRangeQuery,
    pub page: Pagination,
    pub guard_id: Option<i64>,
    pub site_id: Option<i64>,
}

impl CheckInQuery {
    pub fn new(range: DateRangeQuery, page: Pagination) -> Self {
        Self {
            range,
            page,
            guard_id: None,
            site_id: None,
        }
    }

    pub fn with_guard(mut self, guard_id: i64) -> Self {
        self.guard_id = Some(guard_id);
        self
    }

    pub fn with_site(mut self, site_id: i64) -> Self {
        self.site_id = Some(site_id);
        self
    }

    /// Ordered key/value pairs. Absent filters and bounds are left out.
    pub fn to_pairs(&self, names: &ParamNames) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.page.to_string()),
            ("size".to_string(), self.page.page_size.to_string()),
        ];
        if let Some(sort) = &self.page.sort {
            pairs.push(("sort".to_string(), sort.to_string()));
        }
        if let Some(guard_id) = self.guard_id {
            pairs.push(("guardId".to_string(), guard_id.to_string()));
        }
        if let Some(site_id) = self.site_id {
            pairs.push(("siteId".to_string(), site_id.to_string()));
        }
        pairs.extend(self.range.to_pairs(names));
        pairs
    }

    /// `application/x-www-form-urlencoded` rendering of [`Self::to_pairs`].
    pub fn to_query_string(&self, names: &ParamNames) -> String {
        encode(self.to_pairs(names))
    }
}

impl DateRangeQuery {
    /// The date bounds alone; empty for the `all` range.
    pub fn to_pairs(&self, names: &ParamNames) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(start) = self.start_date {
            pairs.push((names.start.clone(), start.to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push((names.end.clone(), end.to_string()));
        }
        pairs
    }

    pub fn to_query_string(&self, names: &ParamNames) -> String {
        encode(self.to_pairs(names))
    }
}

fn encode(pairs: Vec<(String, String)>) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
