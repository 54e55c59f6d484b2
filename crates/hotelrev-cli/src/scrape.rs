//! Scrape command handlers: fetch, clean, and persist hotels and reviews.
//!
//! A hotel whose first page cannot be fetched is reported and not stored.
//! In a region run, per-hotel failures are logged and skipped so one bad
//! hotel does not abort the rest.

use std::time::Duration;

use clap::{Args, Subcommand};
use hotelrev_core::{AppConfig, ReviewRecord};
use hotelrev_db::SearchKind;
use hotelrev_scraper::{
    clean, parse_rating, summarize, AnyTransport, HotelScraper, HttpTransport, Pacing,
    PageFetcher, PageSource, RetryPolicy, ScrapeOptions,
};
use sqlx::SqlitePool;

use crate::query::print_summary;
use crate::AppContext;

type Scraper = HotelScraper<PageFetcher<AnyTransport>>;

/// Sub-commands available under `scrape`.
#[derive(Debug, Subcommand)]
pub enum ScrapeCommands {
    /// Scrape one hotel's detail page and its review pages
    Hotel {
        /// Hotel detail-page URL
        url: String,
        /// Maximum pages to fetch, including the first (0 = no limit)
        #[arg(long)]
        max_pages: Option<usize>,
        #[command(flatten)]
        fetch: FetchArgs,
    },
    /// Scrape every hotel listed on a region page
    Region {
        /// Region listing URL
        url: String,
        /// Maximum hotels to take from the listing
        #[arg(long, default_value = "10")]
        max_hotels: usize,
        /// Maximum pages to fetch per hotel (0 = no limit)
        #[arg(long)]
        max_pages_per_hotel: Option<usize>,
        #[command(flatten)]
        fetch: FetchArgs,
    },
}

/// Transport options shared by the scrape sub-commands.
#[derive(Debug, Clone, Default, Args)]
pub struct FetchArgs {
    /// Render pages in headless Chromium instead of plain HTTP
    #[arg(long)]
    pub browser: bool,
    /// Route requests through the proxies in `HOTELREV_PROXIES`
    #[arg(long)]
    pub proxies: bool,
}

/// What was stored for one scraped hotel.
#[derive(Debug, Clone)]
pub(crate) struct StoredScrape {
    pub(crate) hotel_id: i64,
    pub(crate) hotel_name: String,
    pub(crate) reviews: Vec<ReviewRecord>,
    pub(crate) reviews_inserted: u64,
    pub(crate) pages_fetched: usize,
    pub(crate) pages_failed: usize,
}

/// Outcome of a region batch: hotels stored and hotel URLs that failed.
#[derive(Debug, Default)]
pub(crate) struct RegionScrape {
    pub(crate) stored: Vec<StoredScrape>,
    pub(crate) failed: Vec<String>,
}

impl RegionScrape {
    pub(crate) fn reviews_inserted(&self) -> u64 {
        self.stored.iter().map(|s| s.reviews_inserted).sum()
    }

    /// Every cleaned review across the stored hotels, in scrape order.
    pub(crate) fn all_reviews(&self) -> Vec<ReviewRecord> {
        self.stored
            .iter()
            .flat_map(|s| s.reviews.iter().cloned())
            .collect()
    }
}

/// Scrape a single hotel and store the result.
///
/// # Errors
///
/// Returns an error if the fetcher cannot be built, the first page cannot be
/// fetched, or the database writes fail.
pub(crate) async fn run_scrape_hotel(
    ctx: &AppContext,
    url: &str,
    max_pages: Option<usize>,
    fetch: &FetchArgs,
) -> anyhow::Result<()> {
    hotelrev_db::record_search(&ctx.pool, url, SearchKind::Hotel).await?;

    let scraper = build_scraper(&ctx.config, fetch).await?;
    let result = scrape_and_store(&ctx.pool, &scraper, url, max_pages).await;
    scraper.source().close().await;

    let stored = result?;
    print_stored(&stored);
    println!();
    print_summary(&summarize(&stored.reviews));
    Ok(())
}

/// Scrape up to `max_hotels` hotels listed on a region page.
///
/// # Errors
///
/// Returns an error if the fetcher cannot be built or the search cannot be
/// recorded. Per-hotel failures are logged and counted, not propagated.
pub(crate) async fn run_scrape_region(
    ctx: &AppContext,
    region_url: &str,
    max_hotels: usize,
    max_pages_per_hotel: Option<usize>,
    fetch: &FetchArgs,
) -> anyhow::Result<()> {
    hotelrev_db::record_search(&ctx.pool, region_url, SearchKind::Region).await?;

    let scraper = build_scraper(&ctx.config, fetch).await?;
    let hotel_urls = scraper.hotel_urls(region_url, max_hotels).await;

    if hotel_urls.is_empty() {
        println!("no hotels found on {region_url}");
        scraper.source().close().await;
        return Ok(());
    }

    let region = scrape_hotels(&ctx.pool, &scraper, &hotel_urls, max_pages_per_hotel).await;
    scraper.source().close().await;

    for stored in &region.stored {
        print_stored(stored);
    }
    println!(
        "region complete: {}/{} hotels stored, {} failed, {} new reviews",
        region.stored.len(),
        hotel_urls.len(),
        region.failed.len(),
        region.reviews_inserted()
    );
    println!();
    print_summary(&summarize(&region.all_reviews()));
    Ok(())
}

/// Scrapes and stores each hotel in turn. A hotel that fails is logged and
/// recorded in [`RegionScrape::failed`]; the rest still run.
pub(crate) async fn scrape_hotels<P: PageSource>(
    pool: &SqlitePool,
    scraper: &HotelScraper<P>,
    hotel_urls: &[String],
    max_pages: Option<usize>,
) -> RegionScrape {
    let hotel_count = hotel_urls.len();
    let mut region = RegionScrape::default();

    for (index, hotel_url) in hotel_urls.iter().enumerate() {
        tracing::info!(
            hotel = index + 1,
            of = hotel_count,
            url = %hotel_url,
            "scraping hotel"
        );
        match scrape_and_store(pool, scraper, hotel_url, max_pages).await {
            Ok(stored) => region.stored.push(stored),
            Err(e) => {
                tracing::error!(url = %hotel_url, error = %e, "hotel scrape failed");
                region.failed.push(hotel_url.clone());
            }
        }
    }

    region
}

/// Scrapes one hotel, cleans its reviews, and persists hotel and reviews.
/// A degraded scrape (first page unavailable) is an error and stores nothing.
pub(crate) async fn scrape_and_store<P: PageSource>(
    pool: &SqlitePool,
    scraper: &HotelScraper<P>,
    url: &str,
    max_pages: Option<usize>,
) -> anyhow::Result<StoredScrape> {
    let scrape = scraper.scrape_hotel(url, max_pages).await;
    if let Some(error) = &scrape.error {
        anyhow::bail!("failed to scrape {url}: {error}");
    }

    let reviews = clean(scrape.reviews);
    let rating = parse_rating(&scrape.hotel.rating_text);
    let hotel_id = hotelrev_db::upsert_hotel(pool, &scrape.hotel, rating).await?;
    let reviews_inserted = hotelrev_db::insert_reviews(pool, hotel_id, &reviews).await?;

    tracing::info!(
        hotel_id,
        hotel = %scrape.hotel.name,
        scraped = reviews.len(),
        inserted = reviews_inserted,
        "stored hotel scrape"
    );

    Ok(StoredScrape {
        hotel_id,
        hotel_name: scrape.hotel.name,
        reviews,
        reviews_inserted,
        pages_fetched: scrape.pages_fetched,
        pages_failed: scrape.pages_failed,
    })
}

fn print_stored(stored: &StoredScrape) {
    println!(
        "hotel {} ({}): {} reviews scraped, {} new, {} page(s) fetched, {} failed",
        stored.hotel_id,
        stored.hotel_name,
        stored.reviews.len(),
        stored.reviews_inserted,
        stored.pages_fetched,
        stored.pages_failed
    );
}

async fn build_scraper(config: &AppConfig, fetch: &FetchArgs) -> anyhow::Result<Scraper> {
    let proxies = proxies_for(config, fetch.proxies);
    let transport = if fetch.browser {
        browser_transport(config, proxies).await?
    } else {
        let http = HttpTransport::new(
            Duration::from_secs(config.scraper_request_timeout_secs),
            proxies,
        )
        .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;
        AnyTransport::Http(http)
    };

    let retry = RetryPolicy::new(
        config.scraper_max_attempts,
        Duration::from_secs(config.scraper_backoff_min_secs),
        Duration::from_secs(config.scraper_backoff_max_secs),
    );
    let pacing = Pacing::new(
        Duration::from_millis(config.scraper_pacing_min_ms),
        Duration::from_millis(config.scraper_pacing_max_ms),
    );

    Ok(HotelScraper::new(
        PageFetcher::new(transport, retry, pacing),
        scrape_options(config),
    ))
}

/// The proxy list to use, or an empty slice for direct connections.
pub(crate) fn proxies_for(config: &AppConfig, requested: bool) -> &[String] {
    if !(requested || config.use_proxies) {
        return &[];
    }
    if config.proxies.is_empty() {
        tracing::warn!("proxy use requested but HOTELREV_PROXIES is empty; connecting directly");
    }
    &config.proxies
}

pub(crate) fn scrape_options(config: &AppConfig) -> ScrapeOptions {
    ScrapeOptions {
        page_size: config.scraper_page_size,
        max_pages_cap: config.scraper_max_pages_cap,
        site_origin: config.site_origin.clone(),
    }
}

#[cfg(feature = "browser")]
async fn browser_transport(config: &AppConfig, proxies: &[String]) -> anyhow::Result<AnyTransport> {
    use hotelrev_scraper::fetch::{BrowserTransport, ChromiumSession};
    use hotelrev_scraper::identity::{random_proxy, random_user_agent};

    let session = ChromiumSession::launch(random_user_agent(), random_proxy(proxies))
        .await
        .map_err(|e| anyhow::anyhow!("failed to launch browser: {e}"))?;
    Ok(AnyTransport::Browser(BrowserTransport::new(
        session,
        Duration::from_secs(config.scraper_browser_wait_secs),
    )))
}

#[cfg(not(feature = "browser"))]
#[allow(clippy::unused_async)]
async fn browser_transport(
    _config: &AppConfig,
    _proxies: &[String],
) -> anyhow::Result<AnyTransport> {
    anyhow::bail!("--browser requires hotelrev-cli built with the `browser` feature")
}

#[cfg(test)]
#[path = "scrape_test.rs"]
mod tests;
