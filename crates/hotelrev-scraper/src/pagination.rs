//! Offset-based review pagination.
//!
//! Review listings are paged by inserting an offset after the `Reviews-`
//! marker in the hotel URL:
//!
//! ```text
//! .../Hotel_Review-g1-d2-Reviews-Grand_Hotel.html          (page 1)
//! .../Hotel_Review-g1-d2-Reviews-or10-Grand_Hotel.html     (page 2)
//! .../Hotel_Review-g1-d2-Reviews-or20-Grand_Hotel.html     (page 3)
//! ```

/// Reviews shown per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Hard ceiling on pages generated for one hotel.
pub const MAX_PAGES_CAP: usize = 50;

const MARKER: &str = "Reviews-";

/// Builds the listing URLs for a hotel, base URL first.
///
/// The page count is `ceil(total_reviews / page_size)` clamped to
/// `max_pages_cap`, then truncated to `limit` when one is given (`Some(0)`
/// means no limit). A URL without the `Reviews-` marker, or a zero page size,
/// yields just the base URL.
#[must_use]
pub fn page_urls(
    base_url: &str,
    total_reviews: u32,
    page_size: u32,
    max_pages_cap: usize,
    limit: Option<usize>,
) -> Vec<String> {
    let Some((prefix, suffix)) = base_url.split_once(MARKER) else {
        tracing::warn!(base_url, "no pagination marker in URL, using single page");
        return vec![base_url.to_string()];
    };
    if page_size == 0 {
        tracing::warn!(base_url, "page size is zero, using single page");
        return vec![base_url.to_string()];
    }

    let page_count = usize::try_from(total_reviews.div_ceil(page_size))
        .unwrap_or(usize::MAX)
        .min(max_pages_cap);

    let mut urls = Vec::with_capacity(page_count.max(1));
    urls.push(base_url.to_string());
    for page in 1..page_count {
        let offset = u64::from(page_size) * page as u64;
        urls.push(format!("{prefix}{MARKER}or{offset}-{suffix}"));
    }

    if let Some(limit) = limit.filter(|l| *l > 0) {
        urls.truncate(limit);
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str =
        "https://www.tripadvisor.com/Hotel_Review-g60763-d93589-Reviews-Grand_Hotel-New_York.html";

    #[test]
    fn ninety_five_reviews_make_ten_pages() {
        let urls = page_urls(BASE, 95, 10, MAX_PAGES_CAP, None);
        assert_eq!(urls.len(), 10);
        assert_eq!(urls[0], BASE);
        assert_eq!(
            urls[1],
            "https://www.tripadvisor.com/Hotel_Review-g60763-d93589-Reviews-or10-Grand_Hotel-New_York.html"
        );
        assert_eq!(
            urls[9],
            "https://www.tripadvisor.com/Hotel_Review-g60763-d93589-Reviews-or90-Grand_Hotel-New_York.html"
        );
    }

    #[test]
    fn page_count_is_capped() {
        let urls = page_urls(BASE, 1000, 10, MAX_PAGES_CAP, None);
        assert_eq!(urls.len(), 50);
        assert!(urls[49].contains("Reviews-or490-"));
    }

    #[test]
    fn caller_limit_truncates() {
        let urls = page_urls(BASE, 1000, 10, MAX_PAGES_CAP, Some(3));
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[0], BASE);
    }

    #[test]
    fn zero_limit_means_unlimited() {
        let urls = page_urls(BASE, 95, 10, MAX_PAGES_CAP, Some(0));
        assert_eq!(urls.len(), 10);
    }

    #[test]
    fn missing_marker_yields_base_only() {
        let url = "https://www.tripadvisor.com/Hotels-g60763-New_York.html";
        assert_eq!(page_urls(url, 500, 10, MAX_PAGES_CAP, None), vec![url]);
    }

    #[test]
    fn zero_reviews_still_includes_base() {
        assert_eq!(page_urls(BASE, 0, 10, MAX_PAGES_CAP, None), vec![BASE]);
    }

    #[test]
    fn zero_page_size_yields_base_only() {
        assert_eq!(page_urls(BASE, 95, 0, MAX_PAGES_CAP, None), vec![BASE]);
    }

    #[test]
    fn exact_multiple_does_not_add_extra_page() {
        assert_eq!(page_urls(BASE, 20, 10, MAX_PAGES_CAP, None).len(), 2);
    }
}
