use super::*;

fn raw(reviewer: &str, date: &str, content: &str, rating: &str) -> RawReview {
    RawReview {
        title: Some("Title".to_string()),
        content: Some(content.to_string()),
        reviewer_name: Some(reviewer.to_string()),
        date_text: Some(date.to_string()),
        rating_text: Some(rating.to_string()),
    }
}

#[test]
fn clean_drops_duplicates_keeping_first() {
    let mut first = raw("A", "2024-01", "c1", "5");
    first.title = Some("first".to_string());
    let mut dup = raw("A", "2024-01", "c1", "1");
    dup.title = Some("second".to_string());

    let cleaned = clean(vec![first, dup, raw("B", "2024-01", "c2", "3")]);
    assert_eq!(cleaned.len(), 2);
    assert_eq!(cleaned[0].title, "first");
    assert_eq!(cleaned[0].rating, Some(5.0));
    assert_eq!(cleaned[1].reviewer_name, "B");
}

#[test]
fn clean_keeps_reviews_differing_only_in_content() {
    let cleaned = clean(vec![
        raw("A", "Jan 2024", "c1", "5"),
        raw("A", "Jan 2024", "c2", "5"),
    ]);
    assert_eq!(cleaned.len(), 2);
}

#[test]
fn clean_fills_sentinels_for_missing_and_blank_fields() {
    let cleaned = clean(vec![RawReview {
        title: None,
        content: Some("   ".to_string()),
        reviewer_name: None,
        date_text: None,
        rating_text: None,
    }]);
    let record = &cleaned[0];
    assert_eq!(record.title, "No Title");
    assert_eq!(record.content, "No Content");
    assert_eq!(record.reviewer_name, "Anonymous");
    assert_eq!(record.date, None);
    assert_eq!(record.rating, None);
    assert_eq!(record.sentiment, Sentiment::Unknown);
}

#[test]
fn clean_coerces_unreadable_values_to_none() {
    let cleaned = clean(vec![raw("A", "N/A", "c", "N/A")]);
    assert_eq!(cleaned[0].date, None);
    assert_eq!(cleaned[0].date_text.as_deref(), Some("N/A"));
    assert_eq!(cleaned[0].rating, None);
    assert_eq!(cleaned[0].sentiment, Sentiment::Unknown);
}

#[test]
fn clean_attaches_sentiment_and_preserves_order() {
    let cleaned = clean(vec![
        raw("A", "2024-01-15", "c1", "4.5"),
        raw("B", "2024-02-15", "c2", "3"),
        raw("C", "2024-03-15", "c3", "2"),
    ]);
    let labels: Vec<Sentiment> = cleaned.iter().map(|r| r.sentiment).collect();
    assert_eq!(
        labels,
        vec![Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative]
    );
}

#[test]
fn clean_empty_input_is_empty() {
    assert!(clean(Vec::new()).is_empty());
}

#[test]
fn parse_rating_accepts_plain_numbers() {
    assert_eq!(parse_rating("4.5"), Some(4.5));
    assert_eq!(parse_rating(" 5 "), Some(5.0));
    assert_eq!(parse_rating("0"), Some(0.0));
}

#[test]
fn parse_rating_reads_leading_number_from_text() {
    assert_eq!(parse_rating("4.0 of 5 bubbles"), Some(4.0));
    assert_eq!(parse_rating("Rated 3.5"), Some(3.5));
}

#[test]
fn parse_rating_rejects_out_of_range_and_garbage() {
    assert_eq!(parse_rating("N/A"), None);
    assert_eq!(parse_rating(""), None);
    assert_eq!(parse_rating("45"), None);
    assert_eq!(parse_rating("-1"), None);
    assert_eq!(parse_rating("NaN"), None);
}

#[test]
fn parse_review_date_handles_day_precision_formats() {
    let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    assert_eq!(parse_review_date("2024-01-15"), Some(expected));
    assert_eq!(parse_review_date("January 15, 2024"), Some(expected));
    assert_eq!(parse_review_date("Jan 15, 2024"), Some(expected));
    assert_eq!(parse_review_date("15 January 2024"), Some(expected));
}

#[test]
fn parse_review_date_handles_month_precision_formats() {
    let expected = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    assert_eq!(parse_review_date("Jan 2024"), Some(expected));
    assert_eq!(parse_review_date("January 2024"), Some(expected));
    assert_eq!(parse_review_date("2024-01"), Some(expected));
}

#[test]
fn parse_review_date_rejects_garbage() {
    assert_eq!(parse_review_date("N/A"), None);
    assert_eq!(parse_review_date(""), None);
    assert_eq!(parse_review_date("yesterday"), None);
}

#[test]
fn sentiment_matches_thresholds() {
    assert_eq!(sentiment(Some(4.0)), Sentiment::Positive);
    assert_eq!(sentiment(Some(3.5)), Sentiment::Neutral);
    assert_eq!(sentiment(Some(2.9)), Sentiment::Negative);
    assert_eq!(sentiment(None), Sentiment::Unknown);
}
