//! JSON export of a stored hotel with its cleaned reviews and summary.

use std::path::Path;

use chrono::NaiveDateTime;
use hotelrev_core::{ReviewRecord, SummaryStatistics};
use hotelrev_db::{HotelRow, ReviewRow};
use hotelrev_scraper::{clean, summarize};
use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Serialize)]
pub(crate) struct ExportedHotel {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) location: String,
    pub(crate) rating: Option<f64>,
    pub(crate) rating_text: String,
    pub(crate) total_reviews: i64,
    pub(crate) url: String,
    pub(crate) updated_at: NaiveDateTime,
}

impl From<HotelRow> for ExportedHotel {
    fn from(row: HotelRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            location: row.location,
            rating: row.rating,
            rating_text: row.rating_text,
            total_reviews: row.total_reviews,
            url: row.url,
            updated_at: row.updated_at,
        }
    }
}

/// Top-level export document: `{hotel, reviews, summary}`.
#[derive(Debug, Serialize)]
pub(crate) struct HotelExport {
    pub(crate) hotel: ExportedHotel,
    pub(crate) reviews: Vec<ReviewRecord>,
    pub(crate) summary: SummaryStatistics,
}

pub(crate) fn build_export(hotel: HotelRow, rows: Vec<ReviewRow>) -> HotelExport {
    let reviews = clean(rows.into_iter().map(ReviewRow::into_raw_review).collect());
    let summary = summarize(&reviews);
    HotelExport {
        hotel: hotel.into(),
        reviews,
        summary,
    }
}

/// Write `export` as pretty-printed JSON, creating parent directories.
pub(crate) fn write_export(export: &HotelExport, output: &Path) -> anyhow::Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(export)?;
    std::fs::write(output, json)?;
    Ok(())
}

/// Export a hotel to a JSON file.
///
/// # Errors
///
/// Returns an error if the hotel does not exist, a query fails, or the file
/// cannot be written.
pub(crate) async fn run_export(
    pool: &SqlitePool,
    hotel_id: i64,
    output: &Path,
) -> anyhow::Result<()> {
    let hotel = hotelrev_db::get_hotel(pool, hotel_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("hotel {hotel_id} not found; see `hotels`"))?;
    let rows = hotelrev_db::query_reviews_by_hotel(pool, hotel_id).await?;

    let export = build_export(hotel, rows);
    write_export(&export, output)?;

    tracing::info!(hotel_id, path = %output.display(), "wrote export");
    println!(
        "exported {} review(s) for {} to {}",
        export.reviews.len(),
        export.hotel.name,
        output.display()
    );
    Ok(())
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
