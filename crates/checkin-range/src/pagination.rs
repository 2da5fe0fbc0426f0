//! Pagination and sorting state for listing tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RangeError;

/// Page size used when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes the tables offer.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 25, 50];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// A sort on one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Renders as `field,asc` / `field,desc`, the form the listing endpoints take.
impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.field, self.direction.as_str())
    }
}

/// Parses `field`, `field,asc` or `field,desc`.
impl FromStr for Sort {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.trim().split_once(',') {
            Some((field, dir)) => {
                let direction = match dir.trim().to_ascii_lowercase().as_str() {
                    "asc" => SortDirection::Asc,
                    "desc" => SortDirection::Desc,
                    other => {
                        return Err(RangeError::InvalidSort(format!(
                            "unknown direction '{other}' in '{s}'"
                        )));
                    }
                };
                (field.trim(), direction)
            }
            None => (s.trim(), SortDirection::Asc),
        };

        if field.is_empty() {
            return Err(RangeError::InvalidSort(format!("empty field in '{s}'")));
        }

        Ok(Sort {
            field: field.to_string(),
            direction,
        })
    }
}

/// Zero-based page index, page size and optional sort.
///
/// Deserialized input goes through [`Pagination::new`], so a zero size is
/// bumped to one there too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PaginationFields")]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
    pub sort: Option<Sort>,
}

#[derive(Deserialize)]
struct PaginationFields {
    #[serde(default)]
    page: usize,
    #[serde(default = "default_page_size")]
    page_size: usize,
    #[serde(default)]
    sort: Option<Sort>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl From<PaginationFields> for Pagination {
    fn from(fields: PaginationFields) -> Self {
        let mut pagination = Pagination::new(fields.page_size);
        pagination.page = fields.page;
        pagination.sort = fields.sort;
        pagination
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// First page, no sort. A zero size is bumped to one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Changing the size invalidates the current index, so go back to page 0.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    /// Column-header click: a new field sorts ascending, the same field
    /// flips to descending, and a second flip clears the sort.
    pub fn toggle_sort(&mut self, field: &str) {
        self.sort = match self.sort.take() {
            Some(sort) if sort.field == field => match sort.direction {
                SortDirection::Asc => Some(Sort::desc(field)),
                SortDirection::Desc => None,
            },
            _ => Some(Sort::asc(field)),
        };
        self.page = 0;
    }

    /// Offset of the first row on the current page.
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.page_size)
    }

    /// A zero `page_size` counts as one.
    pub fn total_pages(&self, total_elements: usize) -> usize {
        total_elements.div_ceil(self.page_size.max(1))
    }

    /// Pull the index back onto the last page after rows disappear.
    pub fn clamp_to(&mut self, total_elements: usize) {
        let last = self.total_pages(total_elements).saturating_sub(1);
        if self.page > last {
            self.page = last;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pagination() {
        let p = Pagination::default();
        assert_eq!(p.page, 0);
        assert_eq!(p.page_size, DEFAULT_PAGE_SIZE);
        assert!(p.sort.is_none());
        assert!(PAGE_SIZE_OPTIONS.contains(&DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn test_zero_page_size_is_bumped() {
        assert_eq!(Pagination::new(0).page_size, 1);
        let mut p = Pagination::default();
        p.set_page_size(0);
        assert_eq!(p.page_size, 1);
    }

    #[test]
    fn test_deserialized_zero_page_size_is_bumped() {
        let mut p: Pagination =
            serde_json::from_str(r#"{"page":3,"page_size":0,"sort":null}"#).unwrap();
        assert_eq!(p.page_size, 1);
        assert_eq!(p.page, 3);
        assert_eq!(p.total_pages(5), 5);
        p.clamp_to(2);
        assert_eq!(p.page, 1);
    }

    #[test]
    fn test_deserialize_fills_missing_fields() {
        let p: Pagination = serde_json::from_str(r#"{"page":2}"#).unwrap();
        assert_eq!(p.page_size, DEFAULT_PAGE_SIZE);
        assert!(p.sort.is_none());
    }

    #[test]
    fn test_zero_page_size_set_directly_does_not_panic() {
        let mut p = Pagination::default();
        p.page_size = 0;
        p.set_page(4);
        assert_eq!(p.total_pages(3), 3);
        p.clamp_to(3);
        assert_eq!(p.page, 2);
    }

    #[test]
    fn test_set_page_size_resets_page() {
        let mut p = Pagination::default();
        p.set_page(4);
        p.set_page_size(25);
        assert_eq!(p.page, 0);
        assert_eq!(p.page_size, 25);
    }

    #[test]
    fn test_toggle_sort_cycle() {
        let mut p = Pagination::default();
        p.toggle_sort("timestamp");
        assert_eq!(p.sort, Some(Sort::asc("timestamp")));
        p.toggle_sort("timestamp");
        assert_eq!(p.sort, Some(Sort::desc("timestamp")));
        p.toggle_sort("timestamp");
        assert_eq!(p.sort, None);
    }

    #[test]
    fn test_toggle_sort_new_field_starts_ascending() {
        let mut p = Pagination::default().with_sort(Sort::desc("timestamp"));
        p.set_page(3);
        p.toggle_sort("guardName");
        assert_eq!(p.sort, Some(Sort::asc("guardName")));
        assert_eq!(p.page, 0);
    }

    #[test]
    fn test_total_pages() {
        let p = Pagination::new(10);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(11), 2);
    }

    #[test]
    fn test_clamp_after_deleting_last_row_of_last_page() {
        let mut p = Pagination::new(10);
        p.set_page(2);
        p.clamp_to(20);
        assert_eq!(p.page, 1);
        p.clamp_to(0);
        assert_eq!(p.page, 0);
    }

    #[test]
    fn test_offset() {
        let mut p = Pagination::new(25);
        p.set_page(2);
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn test_sort_display_and_parse() {
        assert_eq!(Sort::desc("timestamp").to_string(), "timestamp,desc");
        assert_eq!("name".parse::<Sort>().unwrap(), Sort::asc("name"));
        assert_eq!(
            "timestamp, DESC".parse::<Sort>().unwrap(),
            Sort::desc("timestamp")
        );
    }

    #[test]
    fn test_sort_parse_errors() {
        let err = "timestamp,sideways"
            .parse::<Sort>()
            .unwrap_err()
            .to_string();
        assert!(err.contains("Invalid sort"), "got: {err}");
        assert!(",asc".parse::<Sort>().is_err());
    }
}
