//! Institutional filer record (ownership listing)

use serde::{Deserialize, Serialize};

use super::format;
use super::record::ListRecord;
use super::sort::SortField;

/// An institutional filer as returned by the ownership API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filer {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub name: String,
    #[serde(default, rename = "type")]
    pub filer_type: Option<String>,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub orientation: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub date_of_latest_report: Option<String>,
    #[serde(default)]
    pub date_of_prior_report: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub external_id1: Option<String>,
    #[serde(default)]
    pub external_id2: Option<String>,
    /// Assets under management
    #[serde(default)]
    pub aum: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

impl Filer {
    /// Creates a minimal active filer; remaining fields default to `None`
    pub fn new(id: impl Into<String>, name: impl Into<String>, aum: Option<f64>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            name: name.into(),
            filer_type: None,
            address_line1: None,
            address_line2: None,
            city: None,
            country: None,
            phone: None,
            style: None,
            orientation: None,
            website: None,
            date_of_latest_report: None,
            date_of_prior_report: None,
            is_active: true,
            external_id1: None,
            external_id2: None,
            aum,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    pub fn with_latest_report(mut self, date: impl Into<String>) -> Self {
        self.date_of_latest_report = Some(date.into());
        self
    }

    /// AUM with a magnitude suffix, e.g. `$2B`
    pub fn formatted_aum(&self) -> String {
        format::compact_currency(self.aum)
    }

    /// Latest report date as `Feb 7, 2025`
    pub fn formatted_date(&self) -> String {
        format::report_date(self.date_of_latest_report.as_deref())
    }

    /// `city, country` when either is known
    pub fn location(&self) -> Option<String> {
        match (self.city.as_deref(), self.country.as_deref()) {
            (Some(city), Some(country)) => Some(format!("{city}, {country}")),
            (Some(city), None) => Some(city.to_string()),
            (None, Some(country)) => Some(country.to_string()),
            (None, None) => None,
        }
    }
}

impl ListRecord for Filer {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn metric(&self) -> Option<f64> {
        self.aum
    }

    fn report_date(&self) -> Option<&str> {
        self.date_of_latest_report.as_deref()
    }

    fn sort_key(field: SortField) -> &'static str {
        match field {
            SortField::Metric => "aum",
            SortField::Name => "name",
            SortField::Date => "dateOfLatestReport",
        }
    }
}
