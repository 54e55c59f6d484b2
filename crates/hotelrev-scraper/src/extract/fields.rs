//! Field table for hotel detail pages.

use hotelrev_core::{HotelRecord, RawReview, NOT_AVAILABLE};
use scraper::{ElementRef, Html};

use super::{extract, parse_selector, FieldSpec, Locator, SplitSide};

/// Shared class set for the header spans; the first usually carries the
/// review count and the second the address.
const HEADER_SPAN: &str = "span.biGQs._P.pZUbB.KxBGd";
const REVIEWER_DATE_BLOCK: &str = "div.tVWyV._Z.o.S4.H3.Ci";
const WROTE_A_REVIEW: &str = "wrote a review";

/// Review container selectors, primary first.
const REVIEW_CONTAINERS: &[&str] = &["div.YibKl.MC.R2.Gi.z.Z.BB.pBbQr", "div.review-container"];

pub const HOTEL_NAME: FieldSpec = FieldSpec {
    name: "hotel_name",
    locators: &[Locator::Text("h1#HEADING"), Locator::Text("h1.QdLfr.b.d.Pn")],
    default: NOT_AVAILABLE,
};

pub const HOTEL_LOCATION: FieldSpec = FieldSpec {
    name: "hotel_location",
    locators: &[Locator::NthText(HEADER_SPAN, 1), Locator::Text("div.AYHFM")],
    default: NOT_AVAILABLE,
};

pub const HOTEL_RATING: FieldSpec = FieldSpec {
    name: "hotel_rating",
    locators: &[Locator::Text("div.grdwI.P"), Locator::Text("span.uwJeR.P")],
    default: NOT_AVAILABLE,
};

pub const TOTAL_REVIEWS: FieldSpec = FieldSpec {
    name: "total_reviews",
    locators: &[Locator::Containing(HEADER_SPAN, "reviews")],
    default: "0",
};

pub const REVIEW_TITLE: FieldSpec = FieldSpec {
    name: "review_title",
    locators: &[Locator::Text("span.JbGkU.Cj"), Locator::Text("span.noQuotes")],
    default: NOT_AVAILABLE,
};

pub const REVIEW_CONTENT: FieldSpec = FieldSpec {
    name: "review_content",
    locators: &[
        Locator::Text("span.orRIx.Ci._a.C"),
        Locator::Text("p.partial_entry"),
    ],
    default: NOT_AVAILABLE,
};

pub const REVIEWER_NAME: FieldSpec = FieldSpec {
    name: "reviewer_name",
    locators: &[
        Locator::Split {
            selector: REVIEWER_DATE_BLOCK,
            marker: WROTE_A_REVIEW,
            side: SplitSide::Before,
        },
        Locator::Text("div.info_text.pointer_cursor"),
    ],
    default: NOT_AVAILABLE,
};

pub const REVIEW_DATE: FieldSpec = FieldSpec {
    name: "review_date",
    locators: &[
        Locator::Split {
            selector: REVIEWER_DATE_BLOCK,
            marker: WROTE_A_REVIEW,
            side: SplitSide::After,
        },
        Locator::Stripped {
            selector: "span.ratingDate",
            remove: "Reviewed",
        },
    ],
    default: NOT_AVAILABLE,
};

pub const REVIEW_RATING: FieldSpec = FieldSpec {
    name: "review_rating",
    locators: &[
        Locator::Prefix("div.kmMXA._T.Gi title", 3),
        Locator::ClassScaled {
            selector: "span.ui_bubble_rating",
            prefix: "bubble_",
            divisor: 10.0,
        },
    ],
    default: NOT_AVAILABLE,
};

/// Extracts hotel metadata from a parsed detail page.
#[must_use]
pub fn extract_hotel_info(document: &Html, source_url: &str) -> HotelRecord {
    let root = document.root_element();
    HotelRecord {
        name: extract(root, &HOTEL_NAME),
        location: extract(root, &HOTEL_LOCATION),
        rating_text: extract(root, &HOTEL_RATING),
        total_review_count: parse_review_count(&extract(root, &TOTAL_REVIEWS)),
        source_url: source_url.to_string(),
    }
}

/// Review container elements in document order, from the first container
/// selector that matches anything.
#[must_use]
pub fn review_containers(document: &Html) -> Vec<ElementRef<'_>> {
    for selector in REVIEW_CONTAINERS {
        let Some(parsed) = parse_selector(selector) else {
            continue;
        };
        let found: Vec<ElementRef<'_>> = document.select(&parsed).collect();
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

/// Extracts every review on a parsed page, in document order.
#[must_use]
pub fn extract_reviews(document: &Html) -> Vec<RawReview> {
    let containers = review_containers(document);
    if containers.is_empty() {
        tracing::warn!("no review containers found");
        return Vec::new();
    }

    containers
        .into_iter()
        .map(|container| RawReview {
            title: Some(extract(container, &REVIEW_TITLE)),
            content: Some(extract(container, &REVIEW_CONTENT)),
            reviewer_name: Some(extract(container, &REVIEWER_NAME)),
            date_text: Some(extract(container, &REVIEW_DATE)),
            rating_text: Some(extract(container, &REVIEW_RATING)),
        })
        .collect()
}

/// `"1,234 reviews"` → 1234. Anything unparseable is 0.
fn parse_review_count(text: &str) -> u32 {
    text.split_whitespace()
        .next()
        .map(|token| token.replace(',', ""))
        .and_then(|digits| digits.parse::<u32>().ok())
        .unwrap_or(0)
}
