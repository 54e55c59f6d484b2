//! Hotel and region scrape pipelines over a [`PageSource`].

use hotelrev_core::{HotelRecord, RawReview};
use scraper::Html;

use crate::extract::{extract_hotel_info, extract_reviews};
use crate::fetch::PageSource;
use crate::pagination::{page_urls, DEFAULT_PAGE_SIZE, MAX_PAGES_CAP};
use crate::region::{extract_hotel_urls, DEFAULT_ORIGIN};

/// Pagination and link-resolution settings for a scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeOptions {
    pub page_size: u32,
    pub max_pages_cap: usize,
    pub site_origin: String,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages_cap: MAX_PAGES_CAP,
            site_origin: DEFAULT_ORIGIN.to_string(),
        }
    }
}

/// Outcome of scraping one hotel.
///
/// A failure on the first page is not an `Err`: it produces an unknown hotel
/// with no reviews and `error` set, so region runs can carry on.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelScrape {
    pub hotel: HotelRecord,
    pub reviews: Vec<RawReview>,
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub error: Option<String>,
}

impl HotelScrape {
    fn failed(url: &str, error: String) -> Self {
        Self {
            hotel: HotelRecord::unknown(url),
            reviews: Vec::new(),
            pages_fetched: 0,
            pages_failed: 1,
            error: Some(error),
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

pub struct HotelScraper<P> {
    source: P,
    options: ScrapeOptions,
}

impl<P: PageSource> HotelScraper<P> {
    pub fn new(source: P, options: ScrapeOptions) -> Self {
        Self { source, options }
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    /// Scrapes hotel metadata and reviews, fetching pages sequentially.
    ///
    /// `max_pages` caps the pages fetched including the first; `None` or
    /// `Some(0)` means as many as the review count implies (still bounded by
    /// the page cap). Pages after the first that fail are logged and skipped.
    pub async fn scrape_hotel(&self, url: &str, max_pages: Option<usize>) -> HotelScrape {
        let first_page = match self.source.fetch_page(url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::error!(url, error = %e, "failed to fetch first hotel page");
                return HotelScrape::failed(url, e.to_string());
            }
        };

        let (hotel, mut reviews) = parse_detail_page(&first_page, url);
        tracing::info!(
            hotel = %hotel.name,
            location = %hotel.location,
            reviews = reviews.len(),
            total_reviews = hotel.total_review_count,
            "extracted first page"
        );

        let remaining = page_urls(
            url,
            hotel.total_review_count,
            self.options.page_size,
            self.options.max_pages_cap,
            max_pages,
        );

        let mut pages_fetched = 1;
        let mut pages_failed = 0;
        for page_url in remaining.iter().skip(1) {
            match self.source.fetch_page(page_url).await {
                Ok(html) => {
                    let page_reviews = parse_review_page(&html);
                    tracing::info!(url = %page_url, reviews = page_reviews.len(), "extracted page");
                    reviews.extend(page_reviews);
                    pages_fetched += 1;
                }
                Err(e) => {
                    tracing::warn!(url = %page_url, error = %e, "skipping review page");
                    pages_failed += 1;
                }
            }
        }

        if reviews.is_empty() {
            tracing::warn!(hotel = %hotel.name, "no reviews found");
        } else {
            tracing::info!(hotel = %hotel.name, reviews = reviews.len(), "hotel scrape complete");
        }

        HotelScrape {
            hotel,
            reviews,
            pages_fetched,
            pages_failed,
            error: None,
        }
    }

    /// Lists hotel URLs on a region page. A fetch failure yields an empty list.
    pub async fn hotel_urls(&self, region_url: &str, max_hotels: usize) -> Vec<String> {
        tracing::info!(region_url, max_hotels, "collecting hotels from region");
        match self.source.fetch_page(region_url).await {
            Ok(html) => {
                let urls = extract_hotel_urls(&html, &self.options.site_origin, max_hotels);
                tracing::info!(region_url, found = urls.len(), "collected hotel URLs");
                urls
            }
            Err(e) => {
                tracing::error!(region_url, error = %e, "failed to fetch region page");
                Vec::new()
            }
        }
    }
}

fn parse_detail_page(html: &str, url: &str) -> (HotelRecord, Vec<RawReview>) {
    let document = Html::parse_document(html);
    (extract_hotel_info(&document, url), extract_reviews(&document))
}

fn parse_review_page(html: &str) -> Vec<RawReview> {
    extract_reviews(&Html::parse_document(html))
}
