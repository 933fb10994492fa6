//! Listing commands - Browse filers and securities
//!
//! Provides the `hummingbird filers` and `hummingbird securities` commands
//! which:
//! 1. Probe reachability of the configured API host once
//! 2. Load the first page, or run a name search when `--query` is given
//! 3. Optionally keep paging until the listing is exhausted (`--all`)
//! 4. Print the listing along with where the data came from
//!
//! When the network is unavailable (or `--offline` is given) the listing is
//! served from built-in data.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use hummingbird_api::{OwnershipClient, PageFetcher, SecurityClient, SecuritySearchOptions};
use hummingbird_core::config::Config;
use hummingbird_core::domain::{
    seed_filers, Filer, ListRecord, ListingSnapshot, NetworkStatus, Security, SortDirection,
    SortField, SortSpec, SyncPhase,
};
use hummingbird_core::ports::IPageSource;
use hummingbird_sync::{
    probe_once, ControllerSettings, PathUpdate, ReachabilityMonitor, SyncController, SyncOutcome,
};
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::output::{fit, get_formatter, OutputFormat, OutputFormatter};
use crate::session::{EnvTokenProvider, TOKEN_ENV};

/// Arguments shared by every listing command
#[derive(Debug, Args)]
pub struct ListingArgs {
    /// Case-insensitive name filter
    #[arg(short, long)]
    pub query: Option<String>,

    /// Sort field: metric, name or date
    #[arg(short, long)]
    pub sort: Option<SortField>,

    /// Sort ascending instead of descending
    #[arg(long)]
    pub ascending: bool,

    /// Keep fetching until every page is loaded
    #[arg(long)]
    pub all: bool,

    /// Never touch the network; show built-in data
    #[arg(long)]
    pub offline: bool,
}

impl ListingArgs {
    /// Sort requested on the command line, falling back to `default`
    pub fn sort_spec(&self, default: SortSpec) -> SortSpec {
        if self.sort.is_none() && !self.ascending {
            return default;
        }
        let direction = if self.ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        };
        SortSpec::new(self.sort.unwrap_or(default.field), direction)
    }
}

/// List institutional filers
#[derive(Debug, Args)]
pub struct FilersCommand {
    #[command(flatten)]
    pub listing: ListingArgs,
}

impl FilersCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        let client = OwnershipClient::new(config.api.ownership_url(), config.api.request_timeout())
            .context("Failed to create ownership API client")?;
        let source: Arc<dyn IPageSource<Filer>> = Arc::new(PageFetcher::new(client));

        let view = ListingView {
            title: "Filers",
            header: format!("{}  {:>8}  {}", fit("NAME", 44), "AUM", "LATEST REPORT"),
            row: filer_row,
        };
        run_listing(&self.listing, source, seed_filers(), config, format, &view).await
    }
}

/// List securities
#[derive(Debug, Args)]
pub struct SecuritiesCommand {
    #[command(flatten)]
    pub listing: ListingArgs,

    /// Only securities with an active listing
    #[arg(long)]
    pub listed_only: bool,

    /// Only primary listings
    #[arg(long)]
    pub primary_only: bool,
}

impl SecuritiesCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        let client =
            SecurityClient::new(config.api.securities_url(), config.api.request_timeout())
                .context("Failed to create security API client")?
                .with_options(SecuritySearchOptions {
                    listed_only: self.listed_only,
                    primary_only: self.primary_only,
                });
        let source: Arc<dyn IPageSource<Security>> = Arc::new(PageFetcher::new(client));

        let view = ListingView {
            title: "Securities",
            header: format!(
                "{}  {}  {:>9}  {:>10}  {:>8}  {}",
                fit("TICKER", 8),
                fit("NAME", 28),
                "MKT CAP",
                "PRICE",
                "RETURN",
                "SECTOR"
            ),
            row: security_row,
        };
        // No built-in security data exists; offline shows whatever is cached
        run_listing(&self.listing, source, Vec::new(), config, format, &view).await
    }
}

fn filer_row(filer: &Filer) -> String {
    format!(
        "{}  {:>8}  {}",
        fit(&filer.name, 44),
        filer.formatted_aum(),
        filer.formatted_date()
    )
}

fn security_row(security: &Security) -> String {
    format!(
        "{}  {}  {:>9}  {:>10}  {:>8}  {}",
        fit(&security.ticker, 8),
        fit(&security.short_name, 28),
        security.formatted_market_cap(),
        security.formatted_price(),
        security.formatted_return(),
        security.sector_name()
    )
}

/// How a listing of `R` is printed in human mode
struct ListingView<R> {
    title: &'static str,
    header: String,
    row: fn(&R) -> String,
}

async fn run_listing<R>(
    args: &ListingArgs,
    source: Arc<dyn IPageSource<R>>,
    seed: Vec<R>,
    config: &Config,
    format: OutputFormat,
    view: &ListingView<R>,
) -> Result<()>
where
    R: ListRecord + Serialize,
{
    let formatter = get_formatter(format);

    let monitor = if args.offline {
        ReachabilityMonitor::fixed(NetworkStatus::Unknown)
    } else {
        observe_reachability(&config.api.base_url, config.api.request_timeout()).await
    };

    let mut settings = ControllerSettings::from(&config.sync);
    settings.default_sort = args.sort_spec(settings.default_sort);

    let tokens = EnvTokenProvider::default();
    if !args.offline && !tokens.is_present() {
        formatter.warn(&format!("{TOKEN_ENV} is not set; requests will not be authenticated"));
    }

    let controller = SyncController::new(source, Arc::new(tokens), monitor, seed, settings);

    if args.offline {
        controller.set_offline_mode(true).await;
    }
    match args.query.as_deref().map(str::trim) {
        Some(query) if !query.is_empty() => {
            info!(query, "Searching");
            controller.search(query).await;
        }
        _ if !args.offline => {
            controller.load().await;
        }
        _ => {}
    }

    if args.all {
        load_all(&controller).await;
    }

    render(&controller.snapshot(), view, format, &*formatter)
}

/// Probes the API host once and feeds the result to a new monitor
///
/// An unparseable base URL leaves the status unknown so the fetch itself
/// reports the configuration problem.
async fn observe_reachability(base_url: &str, timeout: Duration) -> ReachabilityMonitor {
    let (tx, rx) = ReachabilityMonitor::channel();
    let monitor = ReachabilityMonitor::spawn(rx);

    let Ok(url) = Url::parse(base_url) else {
        return monitor;
    };
    let (Some(host), Some(port)) = (url.host_str(), url.port_or_known_default()) else {
        return monitor;
    };

    let addr = tokio::net::lookup_host((host, port))
        .await
        .ok()
        .and_then(|mut addrs| addrs.next());
    let update = match addr {
        Some(addr) => probe_once(addr, timeout).await,
        None => {
            debug!(host, "Could not resolve API host");
            PathUpdate::Unsatisfied
        }
    };

    if tx.send(update).await.is_ok() {
        let mut status = monitor.subscribe();
        if let Err(e) = status.wait_for(|s| *s != NetworkStatus::Unknown).await {
            debug!(error = %e, "Reachability monitor stopped early");
        };
    }
    monitor
}

/// Pages until the listing is exhausted or a page fails to advance it
async fn load_all<R: ListRecord>(controller: &SyncController<R>) {
    let state = controller.subscribe();
    loop {
        let before = state.borrow().current_page;
        if controller.load_more().await != SyncOutcome::Applied {
            break;
        }
        if state.borrow().current_page == before {
            break;
        }
    }
}

fn render<R>(
    snapshot: &ListingSnapshot<R>,
    view: &ListingView<R>,
    format: OutputFormat,
    formatter: &dyn OutputFormatter,
) -> Result<()>
where
    R: ListRecord + Serialize,
{
    if format.is_json() {
        let json = serde_json::to_value(snapshot).context("Failed to serialize listing")?;
        formatter.print_json(&json);
        return Ok(());
    }

    let filter = if snapshot.query.is_empty() {
        String::new()
    } else {
        format!(" matching \"{}\"", snapshot.query)
    };
    formatter.heading(&format!(
        "{}{} - {} shown of {} (page {}/{}, sort: {}, source: {})",
        view.title,
        filter,
        snapshot.records.len(),
        snapshot.total_items,
        snapshot.current_page,
        snapshot.total_pages,
        snapshot.sort,
        snapshot.provenance
    ));

    if snapshot.phase == SyncPhase::Offline {
        formatter.notice("Offline: showing data available without the network");
    } else if snapshot.reduced_trust {
        formatter.warn("The API rejected the credentials; showing built-in data");
    } else if snapshot.is_fallback_data {
        formatter.warn("The server could not be reached; showing data available offline");
    }
    if let Some(message) = &snapshot.error_message {
        formatter.error(message);
    }
    if let Some(notice) = &snapshot.notice {
        formatter.notice(notice);
    }

    if !snapshot.records.is_empty() {
        formatter.line("");
        formatter.line(&view.header);
        for record in &snapshot.records {
            formatter.line(&(view.row)(record));
        }
    }

    if snapshot.has_more {
        formatter.line("");
        formatter.notice("More results available; pass --all to fetch every page");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(sort: Option<SortField>, ascending: bool) -> ListingArgs {
        ListingArgs {
            query: None,
            sort,
            ascending,
            all: false,
            offline: false,
        }
    }

    #[test]
    fn test_sort_spec_defaults_to_config() {
        let default = SortSpec::descending(SortField::Date);
        assert_eq!(args(None, false).sort_spec(default), default);
    }

    #[test]
    fn test_sort_spec_field_only_is_descending() {
        let spec = args(Some(SortField::Name), false).sort_spec(SortSpec::default());
        assert_eq!(spec, SortSpec::descending(SortField::Name));
    }

    #[test]
    fn test_sort_spec_ascending_keeps_default_field() {
        let spec = args(None, true).sort_spec(SortSpec::default());
        assert_eq!(spec, SortSpec::ascending(SortField::Metric));
    }

    #[test]
    fn test_filer_row_formats_columns() {
        let filer = Filer::new("f1", "Berkshire Bank", Some(35_298_551.0))
            .with_latest_report("2025-01-10");
        let row = filer_row(&filer);
        assert!(row.starts_with("Berkshire Bank "));
        assert!(row.contains("$35M"));
        assert!(row.ends_with("Jan 10, 2025"));
    }

    #[tokio::test]
    async fn test_offline_listing_uses_seed_without_network() {
        let config = Config::default();
        let client = OwnershipClient::new("http://127.0.0.1:9", Duration::from_millis(50)).unwrap();
        let source: Arc<dyn IPageSource<Filer>> = Arc::new(PageFetcher::new(client));
        let controller = SyncController::new(
            source,
            Arc::new(EnvTokenProvider::new("HUMMINGBIRD_TEST_TOKEN_OFFLINE")),
            ReachabilityMonitor::fixed(NetworkStatus::Unknown),
            seed_filers(),
            ControllerSettings::from(&config.sync),
        );

        controller.set_offline_mode(true).await;
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, SyncPhase::Offline);
        assert_eq!(snapshot.records.len(), 6);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["phase"], "offline");
        assert_eq!(json["provenance"], "seed");
        assert_eq!(json["records"].as_array().unwrap().len(), 6);
    }
}
