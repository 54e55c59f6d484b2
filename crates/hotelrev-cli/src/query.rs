//! Read-path and maintenance command handlers over the review store.

use hotelrev_core::SummaryStatistics;
use hotelrev_db::{DbError, ReviewRow};
use hotelrev_scraper::{clean, summarize};
use sqlx::SqlitePool;

/// Truncate `text` to `max` characters, appending `...` when cut.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

/// List stored hotels, optionally filtered by location.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_hotels(pool: &SqlitePool, location: Option<&str>) -> anyhow::Result<()> {
    let hotels = hotelrev_db::query_hotels(pool, location).await?;

    if hotels.is_empty() {
        println!(
            "no hotels found{}; run `scrape hotel` first",
            location
                .map(|l| format!(" matching location \"{l}\""))
                .unwrap_or_default()
        );
        return Ok(());
    }

    println!(
        "{:<6}{:<40}{:<30}{:<8}REVIEWS",
        "ID", "NAME", "LOCATION", "RATING"
    );
    for hotel in &hotels {
        let rating = hotel
            .rating
            .map_or_else(|| hotel.rating_text.clone(), |r| format!("{r:.1}"));
        println!(
            "{:<6}{:<40}{:<30}{:<8}{}",
            hotel.id,
            truncate(&hotel.name, 36),
            truncate(&hotel.location, 26),
            rating,
            hotel.total_reviews
        );
    }

    Ok(())
}

/// Print a hotel's stored reviews followed by their summary statistics.
///
/// # Errors
///
/// Returns an error if the hotel does not exist or a query fails.
pub(crate) async fn run_reviews(pool: &SqlitePool, hotel_id: i64) -> anyhow::Result<()> {
    let hotel = hotelrev_db::get_hotel(pool, hotel_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("hotel {hotel_id} not found; see `hotels`"))?;

    let rows = hotelrev_db::query_reviews_by_hotel(pool, hotel_id).await?;
    let reviews = clean(rows.into_iter().map(ReviewRow::into_raw_review).collect());
    let summary = summarize(&reviews);

    println!("Hotel: {} ({})", hotel.name, hotel.location);
    println!("Source: {}", hotel.url);
    println!();

    if reviews.is_empty() {
        println!("no reviews stored for this hotel");
        return Ok(());
    }

    println!("{:<12}{:<8}{:<10}{:<24}TITLE", "DATE", "RATING", "SENTIMENT", "REVIEWER");
    for review in &reviews {
        let date = review
            .date
            .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string());
        let rating = review
            .rating
            .map_or_else(|| "-".to_string(), |r| format!("{r:.1}"));
        println!(
            "{:<12}{:<8}{:<10}{:<24}{}",
            date,
            rating,
            review.sentiment,
            truncate(&review.reviewer_name, 22),
            truncate(&review.title, 50)
        );
    }

    println!();
    print_summary(&summary);

    Ok(())
}

/// Print total, average rating, sentiment counts and monthly counts.
pub(crate) fn print_summary(summary: &SummaryStatistics) {
    println!("Total reviews: {}", summary.total_count);
    println!("Average rating: {:.2}", summary.average_rating);
    for (sentiment, count) in &summary.sentiment_counts {
        println!("  {sentiment}: {count}");
    }
    if !summary.reviews_by_month.is_empty() {
        println!("By month:");
        for (month, count) in &summary.reviews_by_month {
            println!("  {month}: {count}");
        }
    }
}

/// Show the most recent searches.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_history(pool: &SqlitePool, limit: u32) -> anyhow::Result<()> {
    let entries = hotelrev_db::list_search_history(pool, limit).await?;

    if entries.is_empty() {
        println!("search history is empty");
        return Ok(());
    }

    println!("{:<6}{:<21}{:<8}URL", "ID", "SEARCHED AT", "KIND");
    for entry in &entries {
        println!(
            "{:<6}{:<21}{:<8}{}",
            entry.id,
            entry.searched_at.format("%Y-%m-%d %H:%M:%S"),
            entry.search_kind,
            entry.url
        );
    }

    Ok(())
}

/// Delete every search history entry.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub(crate) async fn run_history_clear(pool: &SqlitePool) -> anyhow::Result<()> {
    let removed = hotelrev_db::clear_search_history(pool).await?;
    println!("cleared {removed} history entries");
    Ok(())
}

/// Delete a hotel and its reviews.
///
/// # Errors
///
/// Returns an error if the hotel does not exist or the delete fails.
pub(crate) async fn run_delete_hotel(pool: &SqlitePool, hotel_id: i64) -> anyhow::Result<()> {
    match hotelrev_db::delete_hotel(pool, hotel_id).await {
        Ok(reviews_removed) => {
            println!("deleted hotel {hotel_id} and {reviews_removed} review(s)");
            Ok(())
        }
        Err(DbError::NotFound) => anyhow::bail!("hotel {hotel_id} not found; see `hotels`"),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Grand Hotel", 20), "Grand Hotel");
    }

    #[test]
    fn truncate_cuts_on_char_boundary() {
        assert_eq!(truncate("Hôtel Plaza Athénée", 5), "Hôtel...");
    }
}
