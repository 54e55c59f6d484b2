//! Hotel link discovery on region listing pages.

use reqwest::Url;
use scraper::{ElementRef, Html};

use crate::extract::parse_selector;

/// Default site origin that relative hotel links resolve against.
pub const DEFAULT_ORIGIN: &str = "https://www.tripadvisor.com";

/// Collects up to `max_hotels` hotel detail URLs from a region page.
///
/// Link locators are tried in order (`a.property_title`, `a.review_count`,
/// first link inside `div.listing_title`); the first that matches anything is
/// used. Root-relative hrefs are joined to `origin`; absolute URLs are kept
/// only when they share its scheme and host.
#[must_use]
pub fn extract_hotel_urls(html: &str, origin: &str, max_hotels: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let links = hotel_links(&document);
    if links.is_empty() {
        tracing::warn!("no hotel links found on region page");
        return Vec::new();
    }

    let origin_url = Url::parse(origin).ok();
    let origin = origin.trim_end_matches('/');

    let mut urls: Vec<String> = links
        .into_iter()
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| resolve(href, origin, origin_url.as_ref()))
        .collect();
    urls.truncate(max_hotels);
    urls
}

fn hotel_links(document: &Html) -> Vec<ElementRef<'_>> {
    for selector in ["a.property_title", "a.review_count"] {
        let Some(parsed) = parse_selector(selector) else {
            continue;
        };
        let found: Vec<ElementRef<'_>> = document.select(&parsed).collect();
        if !found.is_empty() {
            return found;
        }
    }

    let (Some(title), Some(anchor)) = (
        parse_selector("div.listing_title"),
        parse_selector("a"),
    ) else {
        return Vec::new();
    };
    document
        .select(&title)
        .filter_map(|div| div.select(&anchor).next())
        .collect()
}

fn resolve(href: &str, origin: &str, origin_url: Option<&Url>) -> Option<String> {
    if href.starts_with('/') && !href.starts_with("//") {
        return Some(format!("{origin}{href}"));
    }

    let absolute = Url::parse(href).ok()?;
    let origin_url = origin_url?;
    let same_origin = absolute.scheme() == origin_url.scheme()
        && absolute.host_str() == origin_url.host_str()
        && absolute.port_or_known_default() == origin_url.port_or_known_default();
    same_origin.then(|| absolute.to_string())
}
