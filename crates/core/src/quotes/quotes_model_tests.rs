//! Tests for quote domain models.

#[cfg(test)]
mod tests {
    use crate::errors::ValidationError;
    use crate::quotes::{CreateQuoteRequest, Quote, QuoteFilter};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_validate_trims_both_fields() {
        let mut request = CreateQuoteRequest::new("  A  ", "\t Q \n");
        request.validate().unwrap();
        assert_eq!(request.author, "A");
        assert_eq!(request.quote, "Q");

        let new_quote = request.into_new_quote();
        assert_eq!(new_quote.author, "A");
        assert_eq!(new_quote.text, "Q");
    }

    #[test]
    fn test_validate_requires_author() {
        let mut request = CreateQuoteRequest::new("   ", "Some quote");
        let err = request.validate().unwrap_err();
        assert_eq!(err, ValidationError::AuthorRequired);
        assert_eq!(err.to_string(), "author is required");
    }

    #[test]
    fn test_validate_requires_quote() {
        let mut request = CreateQuoteRequest::new("Confucius", "");
        let err = request.validate().unwrap_err();
        assert_eq!(err.to_string(), "quote is required");
    }

    #[test]
    fn test_validate_reports_first_failure_only() {
        // Both empty: author check runs first.
        let mut request = CreateQuoteRequest::new("", "");
        assert_eq!(
            request.validate().unwrap_err(),
            ValidationError::AuthorRequired
        );

        // Author too long and quote empty: emptiness wins over length.
        let mut request = CreateQuoteRequest::new("a".repeat(150), " ");
        assert_eq!(
            request.validate().unwrap_err(),
            ValidationError::QuoteRequired
        );

        // Both too long: author length is reported.
        let mut request = CreateQuoteRequest::new("a".repeat(101), "q".repeat(1001));
        assert_eq!(
            request.validate().unwrap_err().to_string(),
            "author must be less than 100 characters"
        );
    }

    #[test]
    fn test_validate_length_boundaries() {
        let mut request = CreateQuoteRequest::new("a".repeat(100), "q".repeat(1000));
        assert!(request.validate().is_ok());

        let mut request = CreateQuoteRequest::new("Author", "q".repeat(1001));
        assert_eq!(
            request.validate().unwrap_err().to_string(),
            "quote must be less than 1000 characters"
        );
    }

    #[test]
    fn test_validate_counts_characters_not_bytes() {
        // 100 two-byte characters is still within the author limit.
        let mut request = CreateQuoteRequest::new("é".repeat(100), "Q");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_length_is_checked_after_trim() {
        let padded = format!("   {}   ", "a".repeat(100));
        let mut request = CreateQuoteRequest::new(padded, "Q");
        assert!(request.validate().is_ok());
        assert_eq!(request.author.len(), 100);
    }

    #[test]
    fn test_create_request_missing_fields_deserialize_empty() {
        let request: CreateQuoteRequest = serde_json::from_value(json!({"author": "A"})).unwrap();
        assert_eq!(request.author, "A");
        assert_eq!(request.quote, "");
    }

    #[test]
    fn test_quote_serializes_text_as_quote_field() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let quote = Quote {
            id: 7,
            author: "Confucius".to_string(),
            text: "Life is simple...".to_string(),
            created_at: ts,
            updated_at: ts,
        };

        let value = serde_json::to_value(&quote).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["quote"], "Life is simple...");
        assert_eq!(value["created_at"], "2024-05-01T12:30:00Z");
        assert!(value.get("text").is_none());
    }

    #[test]
    fn test_filter_defaults() {
        let filter = QuoteFilter::default();
        assert_eq!(filter.author, None);
        assert_eq!(filter.limit, 100);
        assert_eq!(filter.offset, 0);
    }

    #[test]
    fn test_filter_normalized_limits() {
        assert_eq!(QuoteFilter::default().with_limit(0).normalized().limit, 100);
        assert_eq!(QuoteFilter::default().with_limit(-3).normalized().limit, 100);
        assert_eq!(QuoteFilter::default().with_limit(1).normalized().limit, 1);
        assert_eq!(
            QuoteFilter::default().with_limit(1000).normalized().limit,
            1000
        );
        assert_eq!(
            QuoteFilter::default().with_limit(5000).normalized().limit,
            1000
        );
    }

    #[test]
    fn test_filter_normalized_offset_and_author() {
        let filter = QuoteFilter::by_author("  Conf ").with_offset(-5).normalized();
        assert_eq!(filter.author.as_deref(), Some("Conf"));
        assert_eq!(filter.offset, 0);

        let filter = QuoteFilter::by_author("   ").normalized();
        assert_eq!(filter.author, None);
    }
}
