//! Selector-driven field extraction.
//!
//! Every field is described by a [`FieldSpec`]: an ordered list of
//! [`Locator`]s and a default. The first locator that yields a non-empty
//! value wins; if none does, the miss is logged and the default returned.
//! Extraction never fails.

mod fields;

use scraper::{ElementRef, Selector};

pub use fields::{
    extract_hotel_info, extract_reviews, review_containers, HOTEL_LOCATION, HOTEL_NAME,
    HOTEL_RATING, REVIEWER_NAME, REVIEW_CONTENT, REVIEW_DATE, REVIEW_RATING, REVIEW_TITLE,
    TOTAL_REVIEWS,
};

/// Which half of a split element text to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitSide {
    Before,
    After,
}

/// One way of locating a value inside a scope element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Locator {
    /// Trimmed text of the first match.
    Text(&'static str),
    /// Trimmed text of the n-th match (0-based).
    NthText(&'static str, usize),
    /// Text of the first match, only if it contains the marker
    /// (case-insensitive).
    Containing(&'static str, &'static str),
    /// Text of the first match split on a literal marker; the marker must be
    /// present.
    Split {
        selector: &'static str,
        marker: &'static str,
        side: SplitSide,
    },
    /// Text of the first match with every occurrence of `remove` deleted.
    Stripped {
        selector: &'static str,
        remove: &'static str,
    },
    /// Number encoded in a class token, e.g. `bubble_45` with divisor 10
    /// reads as `4.5`.
    ClassScaled {
        selector: &'static str,
        prefix: &'static str,
        divisor: f64,
    },
    /// First `n` characters of the first match's text, trimmed.
    Prefix(&'static str, usize),
}

/// A named field: locators tried in order, then the default.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub locators: &'static [Locator],
    pub default: &'static str,
}

/// Resolves `field` within `scope`, falling back to the field default.
#[must_use]
pub fn extract(scope: ElementRef<'_>, field: &FieldSpec) -> String {
    for locator in field.locators {
        if let Some(value) = apply(scope, locator) {
            return value;
        }
    }
    tracing::warn!(field = field.name, "no locator matched, using default");
    field.default.to_string()
}

/// Evaluates a single locator. `None` means "no usable value here".
pub(crate) fn apply(scope: ElementRef<'_>, locator: &Locator) -> Option<String> {
    let value = match *locator {
        Locator::Text(sel) => text_of(select_nth(scope, sel, 0)?),
        Locator::NthText(sel, n) => text_of(select_nth(scope, sel, n)?),
        Locator::Containing(sel, marker) => {
            let text = text_of(select_nth(scope, sel, 0)?);
            if !text.to_lowercase().contains(&marker.to_lowercase()) {
                return None;
            }
            text
        }
        Locator::Split {
            selector,
            marker,
            side,
        } => {
            let text = raw_text(select_nth(scope, selector, 0)?);
            let (before, after) = text.split_once(marker)?;
            match side {
                SplitSide::Before => before.trim().to_string(),
                SplitSide::After => after.trim().to_string(),
            }
        }
        Locator::Stripped { selector, remove } => raw_text(select_nth(scope, selector, 0)?)
            .replace(remove, "")
            .trim()
            .to_string(),
        Locator::ClassScaled {
            selector,
            prefix,
            divisor,
        } => {
            let el = select_nth(scope, selector, 0)?;
            let raw = el
                .value()
                .classes()
                .filter_map(|class| class.strip_prefix(prefix))
                .find_map(|suffix| suffix.parse::<u32>().ok())?;
            (f64::from(raw) / divisor).to_string()
        }
        Locator::Prefix(sel, n) => raw_text(select_nth(scope, sel, 0)?)
            .chars()
            .take(n)
            .collect::<String>()
            .trim()
            .to_string(),
    };

    (!value.is_empty()).then_some(value)
}

/// Parses `selector`, logging and returning `None` if it is malformed.
pub(crate) fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::warn!(selector, error = %e, "invalid CSS selector, skipping");
            None
        }
    }
}

fn select_nth<'a>(scope: ElementRef<'a>, selector: &str, n: usize) -> Option<ElementRef<'a>> {
    let selector = parse_selector(selector)?;
    scope.select(&selector).nth(n)
}

fn raw_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

fn text_of(el: ElementRef<'_>) -> String {
    raw_text(el).trim().to_string()
}

#[cfg(test)]
#[path = "../extract_test.rs"]
mod tests;
