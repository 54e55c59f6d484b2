use hotelrev_core::{ReviewRecord, SummaryStatistics};

/// Aggregates a cleaned review set. An empty set yields a zeroed summary.
#[must_use]
pub fn summarize(records: &[ReviewRecord]) -> SummaryStatistics {
    let mut summary = SummaryStatistics {
        total_count: records.len(),
        ..SummaryStatistics::default()
    };

    let mut rating_sum = 0.0;
    let mut rated = 0u32;
    for record in records {
        if let Some(rating) = record.rating {
            rating_sum += rating;
            rated += 1;
        }
        *summary.sentiment_counts.entry(record.sentiment).or_insert(0) += 1;
        if let Some(date) = record.date {
            *summary
                .reviews_by_month
                .entry(date.format("%Y-%m").to_string())
                .or_insert(0) += 1;
        }
    }

    if rated > 0 {
        summary.average_rating = rating_sum / f64::from(rated);
    }
    summary
}
