//! Security master record (security listing)

use serde::{Deserialize, Serialize};

use super::format;
use super::record::ListRecord;
use super::sort::SortField;

/// A classification attached to a security (sector, industry, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub id: i64,
    #[serde(rename = "type")]
    pub classification_type: String,
    pub sub_type: String,
    pub name: String,
    pub code: String,
    pub effective_from: String,
    #[serde(default)]
    pub effective_to: Option<String>,
}

/// Latest end-of-day price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestPrice {
    pub trade_date: String,
    pub close_full_adj: f64,
    pub total_return: f64,
}

/// Latest market capitalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestMarketCap {
    pub local_currency_consolidated_market_value: f64,
}

/// A listed security as returned by the security search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    pub id: String,
    pub short_name: String,
    pub long_name: String,
    pub ticker: String,
    pub asset_class: String,
    pub currency: String,
    #[serde(default)]
    pub classifications: Vec<Classification>,
    #[serde(default)]
    pub latest_price: Option<LatestPrice>,
    #[serde(default)]
    pub latest_mkt_cap: Option<LatestMarketCap>,
    pub is_active: bool,
}

impl Security {
    /// Name of the `Sector` classification, or `Unknown`
    pub fn sector_name(&self) -> &str {
        self.classifications
            .iter()
            .find(|c| c.sub_type == "Sector")
            .map(|c| c.name.as_str())
            .unwrap_or("Unknown")
    }

    pub fn market_cap(&self) -> Option<f64> {
        self.latest_mkt_cap
            .as_ref()
            .map(|m| m.local_currency_consolidated_market_value)
    }

    pub fn formatted_market_cap(&self) -> String {
        format::compact_market_cap(self.market_cap())
    }

    pub fn formatted_price(&self) -> String {
        format::price(self.latest_price.as_ref().map(|p| p.close_full_adj))
    }

    pub fn formatted_return(&self) -> String {
        format::percent(self.latest_price.as_ref().map(|p| p.total_return))
    }
}

impl ListRecord for Security {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.short_name
    }

    fn metric(&self) -> Option<f64> {
        self.market_cap()
    }

    fn report_date(&self) -> Option<&str> {
        self.latest_price.as_ref().map(|p| p.trade_date.as_str())
    }

    fn sort_key(field: SortField) -> &'static str {
        match field {
            SortField::Metric => "marketCap",
            SortField::Name => "shortName",
            SortField::Date => "tradeDate",
        }
    }
}
