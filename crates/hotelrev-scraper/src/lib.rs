pub mod error;
pub mod extract;
pub mod fetch;
pub mod identity;
pub mod normalize;
pub mod pagination;
pub mod region;
pub mod retry;
pub mod scrape;
pub mod summary;

pub use error::ScraperError;
pub use fetch::{AnyTransport, HttpTransport, Pacing, PageFetcher, PageSource, Transport};
pub use normalize::{clean, parse_rating, parse_review_date, sentiment};
pub use pagination::page_urls;
pub use region::extract_hotel_urls;
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
pub use scrape::{HotelScrape, HotelScraper, ScrapeOptions};
pub use summary::summarize;
