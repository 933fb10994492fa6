//! Built-in seeded dataset
//!
//! Shown when the remote source cannot be reached and the session cache is
//! still empty. The records are stored in the API's natural order and are
//! always passed through the same filter/sort path as cached data.

use super::filer::Filer;

#[allow(clippy::too_many_arguments)]
fn seeded_filer(
    id: &str,
    name: &str,
    address: (Option<&str>, Option<&str>),
    city: &str,
    country: &str,
    latest_report: &str,
    external_id: &str,
    aum: f64,
    created_at: &str,
    updated_at: &str,
) -> Filer {
    let mut filer = Filer::new(id, name, Some(aum)).with_latest_report(latest_report);
    filer.address_line1 = address.0.map(str::to_string);
    filer.address_line2 = address.1.map(str::to_string);
    filer.city = Some(city.to_string());
    filer.country = Some(country.to_string());
    filer.external_id1 = Some(external_id.to_string());
    filer.created_at = created_at.to_string();
    filer.updated_at = updated_at.to_string();
    filer
}

/// Six institutional filers used as offline fallback data
pub fn seed_filers() -> Vec<Filer> {
    vec![
        seeded_filer(
            "160da621-16a4-4723-aebc-19bfc147d2c9",
            "BERKSHIRE ASSET MANAGEMENT LLC/PA",
            (Some("46 public square"), None),
            "wilkes barre",
            "PA",
            "2025-02-07",
            "0000949012",
            2_114_721_910.0,
            "2025-03-27T06:00:22.780407Z",
            "2025-03-27T06:00:22.780407Z",
        ),
        seeded_filer(
            "3cc6876f-6567-4d66-9b9b-3eaed4bdd959",
            "Berkshire Money Management, Inc.",
            (Some("161 main st"), None),
            "dalton",
            "MA",
            "2025-01-27",
            "0001535172",
            919_761_993.0,
            "2025-03-27T06:00:22.780725Z",
            "2025-03-27T06:00:22.780725Z",
        ),
        seeded_filer(
            "f82c03b6-0d22-4ff9-b47d-ede30a9d1f54",
            "Berkshire Bank",
            (Some("99 north street"), None),
            "pittsfield",
            "MA",
            "2025-01-22",
            "0001831984",
            430_024_549.0,
            "2025-03-27T06:00:23.931566Z",
            "2025-03-27T06:00:23.931567Z",
        ),
        seeded_filer(
            "ddc4f807-e500-4c6a-9b68-e21a31b68376",
            "BERKSHIRE CAPITAL HOLDINGS INC",
            (Some("475 milan drive"), Some("suite 103")),
            "san jose",
            "CA",
            "2025-02-11",
            "0001133742",
            276_741_085.0,
            "2025-03-27T06:00:22.78053Z",
            "2025-03-27T06:00:22.780531Z",
        ),
        seeded_filer(
            "5e53f227-a6dc-48a3-87c8-4551c58583cf",
            "Berkshire Partners LLC",
            (Some("200 clarendon street"), Some("35th floor")),
            "boston",
            "MA",
            "2025-02-14",
            "0001312988",
            35_298_551.0,
            "2025-03-27T06:00:22.780579Z",
            "2025-03-27T06:00:22.780579Z",
        ),
        seeded_filer(
            "1918b5d3-49d6-4543-9335-bcd3c1238731",
            "BERKSHIRE HATHAWAY INC",
            (None, None),
            "omaha",
            "NE",
            "2025-02-14",
            "0001067983",
            0.0,
            "2025-03-27T06:00:22.780494Z",
            "2025-03-27T06:00:22.780494Z",
        ),
    ]
}
