use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use quotes_core::quotes::{self as core_quotes, QuoteFilter};

/// Uniform response wrapper: exactly one of `data` or `error` is present.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(error.into()),
            message: None,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct Quote {
    pub id: i64,
    pub author: String,
    pub quote: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<core_quotes::Quote> for Quote {
    fn from(q: core_quotes::Quote) -> Self {
        Self {
            id: q.id,
            author: q.author,
            quote: q.text,
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
#[serde(default)]
pub struct NewQuote {
    pub author: String,
    pub quote: String,
}

impl From<NewQuote> for core_quotes::CreateQuoteRequest {
    fn from(q: NewQuote) -> Self {
        core_quotes::CreateQuoteRequest::new(q.author, q.quote)
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct DeleteConfirmation {
    pub message: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub database: String,
    pub uptime: String,
}

/// Raw listing parameters. Values that do not parse are ignored rather than rejected.
#[derive(Deserialize, IntoParams, Debug, Clone, Default)]
#[into_params(parameter_in = Query)]
pub struct QuoteListParams {
    /// Case-insensitive author substring.
    pub author: Option<String>,
    /// Page size; values that are not positive integers are ignored.
    pub limit: Option<String>,
    /// Rows to skip; values that are not non-negative integers are ignored.
    pub offset: Option<String>,
}

impl QuoteListParams {
    pub fn into_filter(self) -> QuoteFilter {
        let mut filter = QuoteFilter {
            author: self.author,
            ..QuoteFilter::default()
        };
        if let Some(limit) = parse_number(self.limit).filter(|limit| *limit > 0) {
            filter.limit = limit;
        }
        if let Some(offset) = parse_number(self.offset).filter(|offset| *offset >= 0) {
            filter.offset = offset;
        }
        filter
    }
}

fn parse_number(raw: Option<String>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}
