//! Sort specification and the shared record comparator
//!
//! Every ordering the engine produces (network pages re-sorted by an adapter,
//! cache queries, seeded fallback data) goes through [`sort_records`], so the
//! same `(query, SortSpec)` pair always yields the same order regardless of
//! where the records came from.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::record::ListRecord;

/// Field a listing is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// The record's numeric magnitude (AUM, market cap); missing sorts as 0
    Metric,
    /// Display name, compared case-insensitively
    Name,
    /// Report/update date, compared lexically; missing sorts as ""
    Date,
}

impl SortField {
    /// All sortable fields in display order
    pub const ALL: [SortField; 3] = [SortField::Metric, SortField::Name, SortField::Date];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            SortField::Metric => "Metric",
            SortField::Name => "Name",
            SortField::Date => "Date",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortField::Metric => write!(f, "metric"),
            SortField::Name => write!(f, "name"),
            SortField::Date => write!(f, "date"),
        }
    }
}

impl FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" | "aum" | "market_cap" => Ok(SortField::Metric),
            "name" => Ok(SortField::Name),
            "date" | "report_date" => Ok(SortField::Date),
            other => Err(DomainError::InvalidSortField(other.to_string())),
        }
    }
}

/// Direction of an ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ascending"),
            SortDirection::Descending => write!(f, "descending"),
        }
    }
}

/// A field + direction pair governing record ordering
///
/// Defaults to `{ metric, descending }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn ascending(field: SortField) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: SortField) -> Self {
        Self::new(field, SortDirection::Descending)
    }

    /// Same field, opposite direction
    pub fn toggled(self) -> Self {
        Self::new(self.field, self.direction.reversed())
    }

    /// Serializes the spec into the signed sort-key string used by the
    /// remote API, e.g. `-aum` for descending AUM or `name` for ascending.
    pub fn wire_value<R: ListRecord>(&self) -> String {
        let key = R::sort_key(self.field);
        match self.direction {
            SortDirection::Ascending => key.to_string(),
            SortDirection::Descending => format!("-{key}"),
        }
    }

    /// Compares two records under this spec
    ///
    /// Descending compares the operands swapped rather than reversing a
    /// sorted output, so equal keys keep their input order in both
    /// directions.
    pub fn compare<R: ListRecord>(&self, a: &R, b: &R) -> Ordering {
        match self.direction {
            SortDirection::Ascending => compare_field(self.field, a, b),
            SortDirection::Descending => compare_field(self.field, b, a),
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::descending(SortField::Metric)
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction)
    }
}

fn compare_field<R: ListRecord>(field: SortField, a: &R, b: &R) -> Ordering {
    match field {
        SortField::Metric => {
            let ma = a.metric().unwrap_or(0.0);
            let mb = b.metric().unwrap_or(0.0);
            ma.total_cmp(&mb)
        }
        SortField::Name => a
            .display_name()
            .to_lowercase()
            .cmp(&b.display_name().to_lowercase()),
        SortField::Date => a
            .report_date()
            .unwrap_or("")
            .cmp(b.report_date().unwrap_or("")),
    }
}

/// Sorts records in place, stably, under `spec`
pub fn sort_records<R: ListRecord>(records: &mut [R], spec: SortSpec) {
    records.sort_by(|a, b| spec.compare(a, b));
}

/// Case-insensitive substring match against the display name
///
/// An empty (or whitespace-only) query matches every record.
pub fn matches_query<R: ListRecord>(record: &R, query: &str) -> bool {
    let needle = query.trim();
    if needle.is_empty() {
        return true;
    }
    record
        .display_name()
        .to_lowercase()
        .contains(&needle.to_lowercase())
}

/// Filters `records` by `query` and orders the survivors by `spec`
pub fn filter_and_sort<'a, R, I>(records: I, query: &str, spec: SortSpec) -> Vec<R>
where
    R: ListRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut out: Vec<R> = records
        .into_iter()
        .filter(|r| matches_query(*r, query))
        .cloned()
        .collect();
    sort_records(&mut out, spec);
    out
}
